//! Defaults provider.

use super::RawValueSet;
use crate::ConfigSchema;
use log::warn;
use std::collections::HashMap;

/// Seed values for every resolution.
///
/// With no replacement map, every field receives its declared default.
/// A replacement map is used instead of the declared defaults as a whole:
/// fields it does not name get no default at all, and keys that match no
/// field are ignored.
pub(crate) fn default_values(
    schema: &ConfigSchema,
    replacement: Option<&HashMap<String, String>>,
) -> RawValueSet {
    let Some(replacement) = replacement else {
        return schema
            .fields()
            .iter()
            .map(|field| (field.name.clone(), field.default_text.clone()))
            .collect();
    };

    for key in replacement.keys() {
        if schema.field(key).is_none() {
            warn!("ignoring replacement default for unknown field {key}");
        }
    }

    schema
        .fields()
        .iter()
        .filter_map(|field| {
            replacement
                .get(&field.name)
                .map(|value| (field.name.clone(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldSpec;
    use pretty_assertions::assert_eq;

    fn schema() -> ConfigSchema {
        ConfigSchema::from_specs(&[
            FieldSpec::new("Name", "String").default_text("defaultStr"),
            FieldSpec::new("Count", "i64").default_text("42"),
        ])
        .expect("schema")
    }

    #[test]
    fn declared_defaults_cover_every_field() {
        let values = default_values(&schema(), None);
        assert_eq!(values.len(), 2);
        assert_eq!(values["Name"], "defaultStr");
        assert_eq!(values["Count"], "42");
    }

    #[test]
    fn replacement_map_replaces_instead_of_merging() {
        let replacement = HashMap::from([
            ("Count".to_string(), " 999 ".to_string()),
            ("Unknown".to_string(), "x".to_string()),
        ]);
        let values = default_values(&schema(), Some(&replacement));
        assert_eq!(values, HashMap::from([("Count".to_string(), "999".to_string())]));
    }
}
