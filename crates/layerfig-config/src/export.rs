//! Read-only views over a schema and its values: the redacting console
//! report, the markdown reference table and the commented example file.

use crate::coerce::{FieldValue, encode};
use crate::{ConfigError, ConfigSchema, Configurable, FieldDescriptor, ResolvedRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Name suffixes (case-insensitive) whose values are never printed.
pub const SENSITIVE_SUFFIXES: &[&str] = &["PASSWORD", "TOKEN", "API_KEY", "SECRET"];

/// Per-field descriptions keyed by field name.
pub type Descriptions = HashMap<String, String>;

const REPORT_START: &str = "### Configuration Start ###";
const REPORT_END: &str = "### Configuration End ###";

/// Whether a field's value must be redacted.
pub fn should_be_masked(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    SENSITIVE_SUFFIXES
        .iter()
        .any(|suffix| upper.ends_with(suffix))
}

/// Placeholder revealing only the value's length.
pub fn masked(value: &str) -> String {
    format!("[Masked - Length: {}]", value.len())
}

fn unavailable(descriptor: &FieldDescriptor) -> String {
    format!(" - unavailable {} value - ", descriptor.kind)
}

fn report_lines(
    schema: &ConfigSchema,
    value_of: impl Fn(&str) -> Option<FieldValue>,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(schema.len() + 2);
    lines.push(REPORT_START.to_string());
    for descriptor in schema.fields() {
        let rendered = match value_of(&descriptor.name) {
            Some(value) if should_be_masked(&descriptor.name) => masked(&encode(&value)),
            Some(value) => encode(&value),
            None => unavailable(descriptor),
        };
        lines.push(format!("#| {} : {rendered}", descriptor.name));
    }
    lines.push(REPORT_END.to_string());
    lines
}

/// Render the console report for a resolved record.
pub fn render_report(schema: &ConfigSchema, record: &ResolvedRecord) -> String {
    let mut out = report_lines(schema, |name| record.get(name).cloned()).join("\n");
    out.push('\n');
    out
}

/// Render the console report for a populated record.
///
/// A record whose field table cannot be extracted produces a one-line
/// diagnostic instead of an error.
pub fn render_config<T: Configurable>(config: &T) -> String {
    let lines = match ConfigSchema::of::<T>() {
        Ok(schema) => report_lines(&schema, |name| config.value(name)),
        Err(err) => vec![format!("#| invalid configuration record: {err}")],
    };
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Write the console report for a populated record to `out`.
pub fn log_config<T: Configurable>(config: &T, out: &mut impl Write) -> io::Result<()> {
    out.write_all(render_config(config).as_bytes())
}

/// Emit the console report through the `log` facade, one record per line at
/// info level.
pub fn log_config_to_logger<T: Configurable>(config: &T) {
    for line in render_config(config).lines() {
        info!("{line}");
    }
}

fn required_label(descriptor: &FieldDescriptor) -> &'static str {
    if descriptor.required { "yes" } else { "no" }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Render a markdown reference table of every field.
pub fn render_markdown(
    schema: &ConfigSchema,
    descriptions: &Descriptions,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str("# Default Configuration\n");
    out.push_str(&format!(
        "*Generated {}*\n\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    out.push_str("| YAML Key | ENV Key | Type | Required | Default | Description |\n");
    out.push_str("|---|---|---|---|---|---|\n");

    for descriptor in schema.fields() {
        let description = descriptions
            .get(&descriptor.name)
            .map(String::as_str)
            .unwrap_or_default();
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            descriptor.name,
            descriptor.source_key,
            descriptor.kind,
            required_label(descriptor),
            escape_cell(&descriptor.default_text),
            escape_cell(description),
        ));
    }
    out
}

/// Render a commented example config file.
///
/// Values are the declared defaults, or the resolved values when `values` is
/// given. Sensitive fields always show their declared default.
pub fn render_example_yaml(
    schema: &ConfigSchema,
    descriptions: &Descriptions,
    values: Option<&ResolvedRecord>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str(
        "# Autogenerated example config file. Please provide your own values here.\n",
    );
    out.push_str(&format!(
        "# Generated {}\n\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));

    for descriptor in schema.fields() {
        let description = descriptions
            .get(&descriptor.name)
            .map(String::as_str)
            .unwrap_or_default();
        let requirement = if descriptor.required {
            "required"
        } else {
            "optional"
        };
        let value = values
            .filter(|_| !should_be_masked(&descriptor.name))
            .and_then(|record| record.get(&descriptor.name))
            .map(yaml_scalar)
            .unwrap_or_else(|| descriptor.default_text.clone());

        out.push_str(&format!(
            "# {} [{} - {requirement}] - {description}\n",
            descriptor.name, descriptor.kind
        ));
        out.push_str(&format!("{}: {value}\n\n", descriptor.name));
    }
    out
}

fn yaml_scalar(value: &FieldValue) -> String {
    match serde_yaml::to_string(value) {
        Ok(rendered) => rendered.trim_end().to_string(),
        Err(_) => encode(value),
    }
}

fn write_document(path: &Path, contents: &str) -> Result<(), ConfigError> {
    fs::write(path, contents).map_err(|source| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Write the markdown reference table to `path`.
pub fn write_markdown_file(
    schema: &ConfigSchema,
    descriptions: &Descriptions,
    path: impl AsRef<Path>,
) -> Result<(), ConfigError> {
    write_document(
        path.as_ref(),
        &render_markdown(schema, descriptions, Utc::now()),
    )
}

/// Write the commented example config file to `path`.
pub fn write_example_file(
    schema: &ConfigSchema,
    descriptions: &Descriptions,
    values: Option<&ResolvedRecord>,
    path: impl AsRef<Path>,
) -> Result<(), ConfigError> {
    write_document(
        path.as_ref(),
        &render_example_yaml(schema, descriptions, values, Utc::now()),
    )
}
