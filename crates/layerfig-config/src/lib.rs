//! Typed configuration records resolved from layered sources.
//!
//! A record declares its fields once (name, scalar kind, default, env key,
//! required flag). Resolution seeds every field from its default, overlays
//! the environment and an optional flat YAML file in the order chosen by
//! [`ReadMode`], coerces each value and validates required fields before
//! committing into the record.

mod coerce;
mod error;
pub mod export;
mod loader;
mod macros;
mod schema;
mod sources;

/// Scalar kinds, typed values and the text codec.
pub use coerce::{CoercionError, FieldKind, FieldValue, decode, encode, parse_bool};
/// Public error type returned by schema extraction, resolution and export.
pub use error::ConfigError;
/// Resolution engine entry points and options.
pub use loader::{
    ParseReadModeError, ReadMode, Resolution, ResolveOptions, ResolvedField, ResolvedRecord, load,
    resolve_into, resolve_schema,
};
/// Schema declaration and extraction.
pub use schema::{
    ConfigSchema, Configurable, FieldDescriptor, FieldSpec, ScalarField, assign_scalar,
};
/// Raw value providers.
pub use sources::{
    DEFAULT_FILE_CANDIDATES, EnvironmentProvider, FileProvider, LoadedFile, RawValueSet, Source,
    load_dotenv, parse_flat_yaml,
};
