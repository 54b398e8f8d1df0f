//! Multi-source resolution engine.
//!
//! Seeds raw values from defaults, overlays the environment and the config
//! file in the order selected by [`ReadMode`], coerces every field to its
//! declared kind, validates required fields and only then commits into the
//! caller's record.

mod merge;
mod utils;


use crate::coerce::{FieldKind, FieldValue, decode};
use crate::sources::{EnvironmentProvider, FileProvider, Source, default_values, load_dotenv};
use crate::{ConfigError, ConfigSchema, Configurable};
use log::{debug, info};
use merge::RawState;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Default dotenv file, resolved against the search root.
const DEFAULT_DOTENV_FILE: &str = ".env";

/// Which sources are read, and which one wins on conflict.
///
/// Defaults are always applied first regardless of the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Environment only.
    EnvOnly,
    /// Config file only.
    FileOnly,
    /// Environment, then the config file (file wins).
    #[default]
    EnvThenFile,
    /// Config file, then the environment (environment wins).
    FileThenEnv,
}

impl ReadMode {
    /// Providers to query after defaults, lowest precedence first.
    pub fn precedence(self) -> &'static [Source] {
        match self {
            ReadMode::EnvOnly => &[Source::Environment],
            ReadMode::FileOnly => &[Source::File],
            ReadMode::EnvThenFile => &[Source::Environment, Source::File],
            ReadMode::FileThenEnv => &[Source::File, Source::Environment],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReadMode::EnvOnly => "env-only",
            ReadMode::FileOnly => "yaml-only",
            ReadMode::EnvThenFile => "env-yaml",
            ReadMode::FileThenEnv => "yaml-env",
        }
    }
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown read mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid read mode {0} (expected env-only, yaml-only, env-yaml or yaml-env)")]
pub struct ParseReadModeError(String);

impl FromStr for ReadMode {
    type Err = ParseReadModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "env-only" => Ok(ReadMode::EnvOnly),
            "yaml-only" | "file-only" => Ok(ReadMode::FileOnly),
            "env-yaml" | "env-file" => Ok(ReadMode::EnvThenFile),
            "yaml-env" | "file-env" => Ok(ReadMode::FileThenEnv),
            _ => Err(ParseReadModeError(value.to_string())),
        }
    }
}

/// Options controlling a single resolution call.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Source order; defaults to [`ReadMode::EnvThenFile`].
    pub read_mode: ReadMode,
    /// Explicit config file; when unset the conventional candidates are probed.
    pub file_path: Option<PathBuf>,
    /// Replacement defaults keyed by field name.
    pub defaults: Option<HashMap<String, String>>,
    /// Directory for file discovery and relative paths (defaults to the cwd).
    pub search_root: Option<PathBuf>,
    /// Environment to read from.
    pub environment: EnvironmentProvider,
    /// Dotenv file loaded before reading the process environment.
    pub dotenv_path: Option<PathBuf>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            read_mode: ReadMode::default(),
            file_path: None,
            defaults: None,
            search_root: None,
            environment: EnvironmentProvider::process(),
            dotenv_path: Some(PathBuf::from(DEFAULT_DOTENV_FILE)),
        }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read_mode(mut self, read_mode: ReadMode) -> Self {
        self.read_mode = read_mode;
        self
    }

    /// Read this file instead of probing the conventional locations.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Replace the declared defaults with `defaults` (not merged).
    pub fn with_defaults<K, V>(mut self, defaults: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.defaults = Some(
            defaults
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_root = Some(root.into());
        self
    }

    /// Read from `environment` instead of the process environment.
    ///
    /// The dotenv bootstrap only applies to the process environment.
    pub fn with_environment(mut self, environment: EnvironmentProvider) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_dotenv(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = Some(path.into());
        self
    }

    pub fn without_dotenv(mut self) -> Self {
        self.dotenv_path = None;
        self
    }

    /// Reject contradictory options before any source is read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyFilePath);
        }
        if self.read_mode == ReadMode::EnvOnly {
            return Err(ConfigError::ConflictingOptions(format!(
                "config file {} cannot be used with read mode {}",
                path.display(),
                self.read_mode
            )));
        }
        Ok(())
    }
}

/// One resolved field.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub name: String,
    pub value: FieldValue,
    /// Source of the winning raw value; `None` when no source had one and
    /// the kind's zero value was used.
    pub source: Option<Source>,
}

/// Typed values for every schema field, in schema order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedRecord {
    fields: Vec<ResolvedField>,
}

impl ResolvedRecord {
    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(|field| &field.value)
    }

    pub fn source_of(&self, name: &str) -> Option<Source> {
        self.field(name).and_then(|field| field.source)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl Serialize for ResolvedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub record: ResolvedRecord,
    pub read_mode: ReadMode,
    /// Config file that was applied, if any.
    pub file_path: Option<PathBuf>,
}

/// Resolve a schema without committing into a record.
pub fn resolve_schema(
    schema: &ConfigSchema,
    options: &ResolveOptions,
) -> Result<Resolution, ConfigError> {
    options.validate()?;
    info!(
        "resolving config (fields={}, read_mode={})",
        schema.len(),
        options.read_mode
    );

    let mut state = RawState::seed(default_values(schema, options.defaults.as_ref()));
    let root = utils::search_root(options.search_root.as_deref())?;
    let mut file_path = None;

    for source in options.read_mode.precedence() {
        match source {
            Source::Environment => {
                if options.environment.is_process() {
                    if let Some(dotenv) = &options.dotenv_path {
                        load_dotenv(&root.join(dotenv));
                    }
                }
                let applied = state.overlay(schema, options.environment.collect(schema), *source);
                debug!("applied environment values (fields={applied})");
            }
            Source::File => {
                let provider = FileProvider::new(options.file_path.clone(), &root);
                if let Some(loaded) = provider.load()? {
                    let applied = state.overlay(schema, loaded.values, *source);
                    debug!(
                        "applied config file values (path={}, fields={applied})",
                        loaded.path.display()
                    );
                    file_path = Some(loaded.path);
                }
            }
            // Seeded before the loop.
            Source::Defaults => {}
        }
    }

    let record = coerce_fields(schema, &state)?;
    check_required(schema, &record)?;
    info!("config resolved (fields={})", record.len());

    Ok(Resolution {
        record,
        read_mode: options.read_mode,
        file_path,
    })
}

/// Resolve `target`'s schema and commit every field into it.
///
/// The record is only modified when resolution succeeds as a whole.
pub fn resolve_into<T>(target: &mut T, options: &ResolveOptions) -> Result<Resolution, ConfigError>
where
    T: Configurable + Clone,
{
    let schema = ConfigSchema::of::<T>()?;
    let resolution = resolve_schema(&schema, options)?;

    let mut staged = target.clone();
    for field in resolution.record.fields() {
        staged.apply(&field.name, field.value.clone())?;
    }
    *target = staged;

    Ok(resolution)
}

/// Build a fresh record of type `T` from the configured sources.
pub fn load<T>(options: &ResolveOptions) -> Result<T, ConfigError>
where
    T: Configurable + Clone + Default,
{
    let mut config = T::default();
    resolve_into(&mut config, options)?;
    Ok(config)
}

fn coerce_fields(schema: &ConfigSchema, state: &RawState) -> Result<ResolvedRecord, ConfigError> {
    let mut fields = Vec::with_capacity(schema.len());
    for descriptor in schema.fields() {
        let (value, source) = match state.get(&descriptor.name) {
            Some((raw, source)) => {
                let value = decode(raw.trim(), descriptor.kind).map_err(|err| {
                    ConfigError::Coercion {
                        field: descriptor.name.clone(),
                        raw: err.raw,
                        kind: err.kind,
                    }
                })?;
                (value, Some(source))
            }
            None => (zero_value(descriptor.kind), None),
        };
        fields.push(ResolvedField {
            name: descriptor.name.clone(),
            value,
            source,
        });
    }
    Ok(ResolvedRecord { fields })
}

/// Only text fields can be empty; numeric and boolean zero values are valid.
fn check_required(schema: &ConfigSchema, record: &ResolvedRecord) -> Result<(), ConfigError> {
    for descriptor in schema.fields() {
        if !descriptor.required || descriptor.kind != FieldKind::Text {
            continue;
        }
        let empty = record
            .get(&descriptor.name)
            .and_then(FieldValue::as_text)
            .is_none_or(str::is_empty);
        if empty {
            return Err(ConfigError::RequiredFieldEmpty {
                field: descriptor.name.clone(),
            });
        }
    }
    Ok(())
}

fn zero_value(kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::Text => FieldValue::Text(String::new()),
        FieldKind::Integer => FieldValue::Integer(0),
        FieldKind::Float => FieldValue::Float(0.0),
        FieldKind::Boolean => FieldValue::Boolean(false),
    }
}
