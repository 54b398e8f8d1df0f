//! Running raw state across provider overlays.

use crate::ConfigSchema;
use crate::sources::{RawValueSet, Source};
use std::collections::HashMap;

/// Raw text per field name, with the source that last set it.
#[derive(Debug, Default)]
pub(super) struct RawState {
    values: HashMap<String, (String, Source)>,
}

impl RawState {
    /// Start from the defaults provider's output.
    pub(super) fn seed(defaults: RawValueSet) -> Self {
        Self {
            values: defaults
                .into_iter()
                .map(|(name, raw)| (name, (raw, Source::Defaults)))
                .collect(),
        }
    }

    /// Overwrite same-named entries with `overlay`; keys that name no field
    /// are dropped. Returns how many fields were set.
    pub(super) fn overlay(
        &mut self,
        schema: &ConfigSchema,
        overlay: RawValueSet,
        source: Source,
    ) -> usize {
        let mut applied = 0;
        for (name, raw) in overlay {
            if schema.field(&name).is_none() {
                continue;
            }
            self.values.insert(name, (raw, source));
            applied += 1;
        }
        applied
    }

    pub(super) fn get(&self, name: &str) -> Option<(&str, Source)> {
        self.values
            .get(name)
            .map(|(raw, source)| (raw.as_str(), *source))
    }
}
