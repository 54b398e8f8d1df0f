//! Error types for schema extraction, resolution and export.

use crate::FieldKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while extracting a schema, resolving or exporting config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The record exposes no field table to resolve into.
    #[error("config target must not be empty: no fields declared")]
    NilTarget,
    /// The record's field table does not describe a valid record.
    #[error("config target is not a valid record: {reason}")]
    InvalidTarget { reason: String },
    /// A declared field uses a type outside the supported scalar kinds.
    #[error("invalid type {kind} on field {field} (allowed: string, i64, f64, bool)")]
    UnsupportedFieldType { field: String, kind: String },
    /// Resolution options contradict each other.
    #[error("conflicting options: {0}")]
    ConflictingOptions(String),
    /// A file source was requested with an empty path.
    #[error("the config file path cannot be empty")]
    EmptyFilePath,
    /// Raw text did not match the field's scalar grammar.
    #[error("unable to write value {raw:?} to field {field}: cannot use {raw} as {kind}")]
    Coercion {
        field: String,
        raw: String,
        kind: FieldKind,
    },
    /// Reading the config file failed.
    #[error("failed to read config file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config file exists but is not a flat key/value document.
    #[error("failed to parse config file {}: {message}", .path.display())]
    FileParse { path: PathBuf, message: String },
    /// A required text field resolved to an empty string.
    #[error("missing required fields: required field {field} has length 0")]
    RequiredFieldEmpty { field: String },
    /// Writing a generated document failed.
    #[error("unable to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
