//! Console report routed through the `log` facade.

use layerfig_config::export::{log_config_to_logger, render_config};
use layerfig_config::{EnvironmentProvider, ResolveOptions, configurable, load};
use log::{Level, LevelFilter, Log, Metadata, Record};
use pretty_assertions::assert_eq;
use std::sync::Mutex;
use tempfile::TempDir;

configurable! {
    pub struct MailerConfig {
        pub smtp_host: String = "mail.local", env = "SMTP_HOST";
        pub smtp_password: String = "hunter22", env = "SMTP_PASSWORD";
    }
}

struct CaptureLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("layerfig_config::export")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.lines
                .lock()
                .expect("lock")
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    lines: Mutex::new(Vec::new()),
};

#[test]
fn report_lines_are_logged_at_info_with_secrets_masked() {
    log::set_logger(&LOGGER).expect("logger");
    log::set_max_level(LevelFilter::Info);

    let temp = TempDir::new().expect("tmp");
    let options = ResolveOptions::new()
        .with_search_root(temp.path())
        .with_environment(EnvironmentProvider::from_pairs([("SMTP_HOST", "smtp.example")]));
    let config: MailerConfig = load(&options).expect("load");

    log_config_to_logger(&config);

    let captured = LOGGER.lines.lock().expect("lock").clone();
    let expected: Vec<(Level, String)> = render_config(&config)
        .lines()
        .map(|line| (Level::Info, line.to_string()))
        .collect();
    assert_eq!(captured, expected);
    assert_eq!(
        expected.iter().map(|(_, line)| line.as_str()).collect::<Vec<_>>(),
        [
            "### Configuration Start ###",
            "#| smtp_host : smtp.example",
            "#| smtp_password : [Masked - Length: 8]",
            "### Configuration End ###",
        ]
    );
}
