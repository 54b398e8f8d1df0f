//! Command-line front end: resolves the sample service configuration,
//! prints it with secrets redacted and optionally writes its reference docs.

use anyhow::Context;
use clap::Parser;
use layerfig::config::export::{
    Descriptions, log_config, log_config_to_logger, write_example_file, write_markdown_file,
};
use layerfig::config::{ConfigSchema, ReadMode, ResolveOptions, resolve_into};
use layerfig::{configurable, init_logging};
use log::{debug, info};
use std::io;
use std::path::PathBuf;

configurable! {
    /// Settings of the sample service this binary resolves.
    pub struct ServiceConfig {
        pub service_name: String = "layerfig-demo", env = "SERVICE_NAME", required = "true";
        pub listen_port: i64 = "8080", env = "LISTEN_PORT";
        pub request_timeout_secs: f64 = "2.5", env = "REQUEST_TIMEOUT_SECS";
        pub debug_mode: bool = "false", env = "DEBUG_MODE";
        pub database_password: String = "", env = "DATABASE_PASSWORD";
    }
}

fn descriptions() -> Descriptions {
    [
        ("service_name", "Name reported in logs and health checks."),
        ("listen_port", "TCP port the service binds to."),
        ("request_timeout_secs", "Upstream request timeout in seconds."),
        ("debug_mode", "Enable verbose diagnostics."),
        ("database_password", "Password for the primary database."),
    ]
    .into_iter()
    .map(|(name, text)| (name.to_string(), text.to_string()))
    .collect()
}

/// Command-line options for the layerfig binary.
#[derive(Parser, Debug)]
#[command(name = "layerfig", version, about = "Resolve and inspect layered configuration")]
struct Cli {
    /// Source order: env-only, yaml-only, env-yaml or yaml-env
    #[arg(long, default_value = "env-yaml")]
    mode: ReadMode,
    /// Config file to read instead of probing ./config.y(a)ml and ./config/config.y(a)ml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory used for config file discovery and the .env file
    #[arg(long)]
    root: Option<PathBuf>,
    /// Do not load a .env file into the environment
    #[arg(long)]
    no_dotenv: bool,
    /// Send the configuration report to the logger instead of stdout
    #[arg(long)]
    log: bool,
    /// Write a markdown reference table to this path
    #[arg(long)]
    markdown: Option<PathBuf>,
    /// Write a commented example config file to this path
    #[arg(long)]
    example: Option<PathBuf>,
}

impl Cli {
    fn resolve_options(&self) -> ResolveOptions {
        let mut options = ResolveOptions::new().with_read_mode(self.mode);
        if let Some(path) = &self.config {
            options = options.with_file(path);
        }
        if let Some(root) = &self.root {
            options = options.with_search_root(root);
        }
        if self.no_dotenv {
            options = options.without_dotenv();
        }
        options
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    info!(
        "starting layerfig (mode={}, config_set={}, root_set={})",
        cli.mode,
        cli.config.is_some(),
        cli.root.is_some()
    );

    let mut config = ServiceConfig::default();
    let resolution = resolve_into(&mut config, &cli.resolve_options())
        .context("failed to resolve configuration")?;
    if let Some(path) = &resolution.file_path {
        debug!("config file applied: {}", path.display());
    }

    if cli.log {
        log_config_to_logger(&config);
    } else {
        log_config(&config, &mut io::stdout().lock()).context("failed to print configuration")?;
    }

    let schema = ConfigSchema::of::<ServiceConfig>().context("invalid configuration schema")?;
    if let Some(path) = &cli.markdown {
        write_markdown_file(&schema, &descriptions(), path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = &cli.example {
        write_example_file(&schema, &descriptions(), None, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}
