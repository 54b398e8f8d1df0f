//! End-to-end resolution into `configurable!` records.

use layerfig_config::{
    ConfigError, ConfigSchema, Configurable, EnvironmentProvider, FieldSpec, FieldValue, ReadMode,
    ResolveOptions, Source, configurable, load, resolve_into, resolve_schema,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

configurable! {
    /// Service settings used across these tests.
    #[derive(PartialEq)]
    pub struct ServiceConfig {
        pub name: String = "defaultStr", env = "NAME", required = "true";
        pub count: i64 = "42";
        pub ratio: f64 = "0.25", env = "SERVICE_RATIO";
        pub verbose: bool = "false", env = "SERVICE_VERBOSE";
        pub api_secret: String = "", env = "SERVICE_API_SECRET";
    }
}

fn options(root: &TempDir, env: &[(&str, &str)]) -> ResolveOptions {
    ResolveOptions::new()
        .with_search_root(root.path())
        .with_environment(EnvironmentProvider::from_pairs(env.iter().copied()))
}

#[test]
fn macro_table_matches_declaration() {
    let schema = ConfigSchema::of::<ServiceConfig>().expect("schema");
    let name = schema.field("name").expect("name");
    assert_eq!(name.source_key, "NAME");
    assert!(name.required);
    assert_eq!(schema.field("count").expect("count").source_key, "count");
    assert_eq!(ServiceConfig::fields().len(), 5);
}

#[test]
fn defaults_populate_record() {
    let temp = TempDir::new().expect("tmp");
    let config: ServiceConfig = load(&options(&temp, &[])).expect("load");
    assert_eq!(
        config,
        ServiceConfig {
            name: "defaultStr".to_string(),
            count: 42,
            ratio: 0.25,
            verbose: false,
            api_secret: String::new(),
        }
    );
}

#[test]
fn environment_overrides_defaults() {
    let temp = TempDir::new().expect("tmp");
    let env = [("NAME", " svc "), ("count", "0x10"), ("SERVICE_VERBOSE", "T")];
    let config: ServiceConfig = load(&options(&temp, &env)).expect("load");
    assert_eq!(config.name, "svc");
    assert_eq!(config.count, 16);
    assert!(config.verbose);
}

#[test]
fn failed_resolution_leaves_record_untouched() {
    let temp = TempDir::new().expect("tmp");
    let mut config = ServiceConfig {
        name: "keep".to_string(),
        count: 1,
        ratio: 1.0,
        verbose: true,
        api_secret: "s".to_string(),
    };
    let before = config.clone();

    let err = resolve_into(&mut config, &options(&temp, &[("SERVICE_RATIO", "lots")])).unwrap_err();
    assert!(matches!(err, ConfigError::Coercion { .. }));
    assert_eq!(config, before);

    let err = resolve_into(
        &mut config,
        &options(&temp, &[("NAME", "")]).with_read_mode(ReadMode::EnvOnly),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::RequiredFieldEmpty { .. }));
    assert_eq!(config, before);
}

#[test]
fn successful_resolution_reports_provenance() {
    let temp = TempDir::new().expect("tmp");
    fs::write(temp.path().join("config.yml"), "ratio: 0.75\n").expect("write");
    let mut config = ServiceConfig::default();

    let resolution =
        resolve_into(&mut config, &options(&temp, &[("NAME", "svc")])).expect("resolve");
    assert_eq!(config.ratio, 0.75);
    assert_eq!(resolution.record.source_of("ratio"), Some(Source::File));
    assert_eq!(resolution.record.source_of("name"), Some(Source::Environment));
    assert_eq!(resolution.record.source_of("count"), Some(Source::Defaults));
    assert_eq!(config.value("ratio"), Some(FieldValue::Float(0.75)));
}

const SCENARIO: &[FieldSpec] = &[
    FieldSpec::new("Name", "String")
        .default_text("defaultStr")
        .env("NAME")
        .required("true"),
    FieldSpec::new("Count", "i64").default_text("42"),
];

#[test]
fn scenario_defaults_only() {
    let temp = TempDir::new().expect("tmp");
    let schema = ConfigSchema::from_specs(SCENARIO).expect("schema");
    let record = resolve_schema(&schema, &options(&temp, &[])).expect("resolve").record;
    assert_eq!(
        record.get("Name"),
        Some(&FieldValue::Text("defaultStr".to_string()))
    );
    assert_eq!(record.get("Count"), Some(&FieldValue::Integer(42)));
}

#[test]
fn scenario_empty_required_env_fails() {
    let temp = TempDir::new().expect("tmp");
    let schema = ConfigSchema::from_specs(SCENARIO).expect("schema");
    let err = resolve_schema(
        &schema,
        &options(&temp, &[("NAME", "")]).with_read_mode(ReadMode::EnvOnly),
    )
    .unwrap_err();
    match err {
        ConfigError::RequiredFieldEmpty { field } => assert_eq!(field, "Name"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scenario_file_then_env_reads_file_count() {
    let temp = TempDir::new().expect("tmp");
    fs::write(temp.path().join("config.yml"), "Count: 1000\n").expect("write");
    let schema = ConfigSchema::from_specs(SCENARIO).expect("schema");
    let record = resolve_schema(
        &schema,
        &options(&temp, &[]).with_read_mode(ReadMode::FileThenEnv),
    )
    .expect("resolve")
    .record;
    assert_eq!(record.get("Count"), Some(&FieldValue::Integer(1000)));
}

#[test]
fn unsupported_table_kind_fails_before_reading_sources() {
    let schema = ConfigSchema::from_specs(&[
        FieldSpec::new("Name", "String"),
        FieldSpec::new("NonValidType", "Option<String>"),
    ]);
    assert!(matches!(
        schema,
        Err(ConfigError::UnsupportedFieldType { .. })
    ));
}
