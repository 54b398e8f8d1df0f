//! Field schema extraction from a record's declarative field table.

use crate::coerce::{FieldKind, FieldValue, parse_bool};
use crate::ConfigError;
use std::collections::HashSet;

/// One row of a record's declarative field table.
///
/// `kind` is the declared type name (`String`, `i64`, `f64`, `bool`, or one
/// of their aliases). `env` overrides the environment variable name and
/// `required` is parsed with the boolean grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: &'static str,
    pub default: &'static str,
    pub env: Option<&'static str>,
    pub required: Option<&'static str>,
}

impl FieldSpec {
    /// Start a row with no default, no env override and not required.
    pub const fn new(name: &'static str, kind: &'static str) -> Self {
        Self {
            name,
            kind,
            default: "",
            env: None,
            required: None,
        }
    }

    pub const fn default_text(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }

    pub const fn env(mut self, env: &'static str) -> Self {
        self.env = Some(env);
        self
    }

    pub const fn required(mut self, required: &'static str) -> Self {
        self.required = Some(required);
        self
    }
}

/// Extracted description of a single configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Canonical name; merge key across every source and the file key.
    pub name: String,
    pub kind: FieldKind,
    /// Environment variable name; equals `name` when not overridden.
    pub source_key: String,
    /// Declared default (trimmed).
    pub default_text: String,
    pub required: bool,
}

/// Ordered field descriptors for one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSchema {
    fields: Vec<FieldDescriptor>,
}

impl ConfigSchema {
    /// Build the schema of a `Configurable` record.
    pub fn of<T: Configurable>() -> Result<Self, ConfigError> {
        Self::from_specs(T::fields())
    }

    /// Build a schema from a declarative field table, in declaration order.
    pub fn from_specs(specs: &[FieldSpec]) -> Result<Self, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::NilTarget);
        }

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(specs.len());
        for spec in specs {
            if !is_identifier(spec.name) {
                return Err(ConfigError::InvalidTarget {
                    reason: format!("field name {:?} is not an identifier", spec.name),
                });
            }
            if !seen.insert(spec.name) {
                return Err(ConfigError::InvalidTarget {
                    reason: format!("field {} is declared twice", spec.name),
                });
            }
            let kind = FieldKind::from_type_name(spec.kind).ok_or_else(|| {
                ConfigError::UnsupportedFieldType {
                    field: spec.name.to_string(),
                    kind: spec.kind.to_string(),
                }
            })?;

            let source_key = match spec.env.map(str::trim) {
                Some(env) if !env.is_empty() => env.to_string(),
                _ => spec.name.to_string(),
            };
            let required = spec
                .required
                .and_then(|flag| parse_bool(flag.trim()))
                .unwrap_or(false);

            fields.push(FieldDescriptor {
                name: spec.name.to_string(),
                kind,
                source_key,
                default_text: spec.default.trim().to_string(),
                required,
            });
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A record that can be populated by the resolver.
///
/// Implementations describe their fields once through [`Configurable::fields`]
/// and accept typed values by field name. The [`configurable!`](crate::configurable)
/// macro generates all three methods.
pub trait Configurable {
    /// Declarative field table, in declaration order.
    fn fields() -> &'static [FieldSpec];

    /// Store a resolved value into the named field.
    fn apply(&mut self, name: &str, value: FieldValue) -> Result<(), ConfigError>;

    /// Read the current value of the named field.
    fn value(&self, name: &str) -> Option<FieldValue>;
}

/// Conversion between a Rust field type and [`FieldValue`].
pub trait ScalarField: Sized {
    const KIND: FieldKind;

    fn from_value(value: FieldValue) -> Option<Self>;

    fn to_value(&self) -> FieldValue;
}

impl ScalarField for String {
    const KIND: FieldKind = FieldKind::Text;

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl ScalarField for i64 {
    const KIND: FieldKind = FieldKind::Integer;

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Integer(value) => Some(value),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl ScalarField for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(value) => Some(value),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl ScalarField for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Boolean(value) => Some(value),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

/// Assign `value` to a typed field, rejecting a kind mismatch.
pub fn assign_scalar<T: ScalarField>(
    slot: &mut T,
    name: &str,
    value: FieldValue,
) -> Result<(), ConfigError> {
    let kind = value.kind();
    *slot = T::from_value(value).ok_or_else(|| ConfigError::InvalidTarget {
        reason: format!("field {name} expects {} but got {kind}", T::KIND),
    })?;
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
