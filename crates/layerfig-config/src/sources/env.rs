//! Environment provider and dotenv bootstrap.

use super::RawValueSet;
use crate::ConfigSchema;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;

/// Reads field values from environment variables.
///
/// The process environment is used unless a snapshot was supplied with
/// [`EnvironmentProvider::from_pairs`].
#[derive(Debug, Clone, Default)]
pub struct EnvironmentProvider {
    snapshot: Option<HashMap<String, String>>,
}

impl EnvironmentProvider {
    /// Provider backed by the live process environment.
    pub fn process() -> Self {
        Self { snapshot: None }
    }

    /// Provider backed by a fixed set of variables.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            snapshot: Some(
                pairs
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    /// Whether lookups hit the process environment.
    pub fn is_process(&self) -> bool {
        self.snapshot.is_none()
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match &self.snapshot {
            Some(snapshot) => snapshot.get(key).cloned(),
            None => std::env::var_os(key).map(|value| value.to_string_lossy().into_owned()),
        }
    }

    /// Collect values for every field whose source key is set.
    ///
    /// Results are keyed by field name, not by the variable name.
    pub fn collect(&self, schema: &ConfigSchema) -> RawValueSet {
        schema
            .fields()
            .iter()
            .filter_map(|field| {
                self.lookup(&field.source_key)
                    .map(|value| (field.name.clone(), value.trim().to_string()))
            })
            .collect()
    }
}

/// Load a dotenv file into the process environment.
///
/// Variables that are already set are kept. A missing file is not an error;
/// a malformed one is reported and skipped. Returns whether a file was
/// loaded.
pub fn load_dotenv(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("loaded dotenv file: {}", path.display());
            true
        }
        Err(err) if err.not_found() => {
            debug!("no dotenv file at {}", path.display());
            false
        }
        Err(err) => {
            warn!("skipping dotenv file {}: {err}", path.display());
            false
        }
    }
}
