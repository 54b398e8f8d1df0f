//! Conversion between raw text and the four supported scalar kinds.
//!
//! Decoding follows the usual text grammars: booleans accept `true`/`false`,
//! `t`/`f` and `1`/`0` in any case, integers accept an optional sign and a
//! `0x`/`0o`/`0b` (or legacy leading `0` octal) prefix with `_` separators,
//! floats accept decimal and scientific notation.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Scalar kind of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
}

impl FieldKind {
    /// Parse a declared type name into a kind.
    ///
    /// Returns `None` for anything outside the supported scalars.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name.trim() {
            "String" | "string" | "str" | "text" => Some(Self::Text),
            "i64" | "int64" | "integer" => Some(Self::Integer),
            "f64" | "float64" | "float" => Some(Self::Float),
            "bool" | "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// Short type label used in errors and generated documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Integer => "i64",
            Self::Float => "f64",
            Self::Boolean => "bool",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded, typed field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
            Self::Float(_) => FieldKind::Float,
            Self::Boolean(_) => FieldKind::Boolean,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

/// Raw text that does not match the grammar of the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot use {raw} as {kind}")]
pub struct CoercionError {
    pub raw: String,
    pub kind: FieldKind,
}

/// Decode raw text into a typed value of `kind`.
pub fn decode(raw: &str, kind: FieldKind) -> Result<FieldValue, CoercionError> {
    let value = match kind {
        FieldKind::Text => Some(FieldValue::Text(raw.to_string())),
        FieldKind::Boolean => parse_bool(raw).map(FieldValue::Boolean),
        FieldKind::Integer => parse_int(raw).map(FieldValue::Integer),
        FieldKind::Float => parse_float(raw).map(FieldValue::Float),
    };
    value.ok_or_else(|| CoercionError {
        raw: raw.to_string(),
        kind,
    })
}

/// Render a typed value back to its canonical text form.
pub fn encode(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(value) => value.clone(),
        FieldValue::Integer(value) => value.to_string(),
        // `Display` for f64 is the shortest round-trip form without an exponent.
        FieldValue::Float(value) => value.to_string(),
        FieldValue::Boolean(value) => value.to_string(),
    }
}

/// Parse the boolean grammar; `None` for anything else.
///
/// Matching is case-insensitive in every position, so `tRuE` is accepted.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    let (negative, unsigned) = match raw.as_bytes().first()? {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits, prefixed) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest, true)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest, true)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest, true)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..], true)
    } else {
        (10, lower.as_str(), false)
    };

    let digits = strip_separators(digits, prefixed)?;
    // Reject a second sign hidden behind the prefix ("0x-1").
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let signed = if negative {
        format!("-{digits}")
    } else {
        digits
    };
    i64::from_str_radix(&signed, radix).ok()
}

/// Remove `_` digit separators. A separator must be followed by a digit and
/// preceded by a digit or a base prefix (`0x_1F`, `0_17`).
fn strip_separators(digits: &str, prefixed: bool) -> Option<String> {
    if !digits.contains('_') {
        return Some(digits.to_string());
    }
    if (digits.starts_with('_') && !prefixed) || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    Some(digits.replace('_', ""))
}

fn parse_float(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok()
}
