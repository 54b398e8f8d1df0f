//! Raw value providers: compiled-in defaults, the process environment and
//! a flat YAML file.
//!
//! Each provider produces a [`RawValueSet`] keyed by field name. A key that
//! is missing means the provider has no opinion; an empty string is an
//! explicit empty value.

mod defaults;
mod env;
mod file;

pub(crate) use defaults::default_values;
pub use env::{EnvironmentProvider, load_dotenv};
pub use file::{DEFAULT_FILE_CANDIDATES, FileProvider, LoadedFile, parse_flat_yaml};

use std::collections::HashMap;
use std::fmt;

/// Raw text per field name, produced by a single provider.
pub type RawValueSet = HashMap<String, String>;

/// Origin of a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Compiled-in defaults, or the caller's replacement defaults.
    Defaults,
    /// Process environment (after the optional dotenv bootstrap).
    Environment,
    /// Structured config file.
    File,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Defaults => "defaults",
            Source::Environment => "env",
            Source::File => "file",
        };
        f.write_str(name)
    }
}
