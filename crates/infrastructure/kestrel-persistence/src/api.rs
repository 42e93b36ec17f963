use kestrel_core::UiPreferences;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PREFERENCES_FILENAME: &str = "ui-preferences.json";

/// Version 1 allowed the `"none"` grouping criterion and a bare string
/// accent color. Version 2 is the current shape.
pub const CURRENT_SCHEMA: u32 = 2;

/// Records written before versioning was introduced carry no
/// `schemaVersion` and are treated as this version.
pub const UNVERSIONED_SCHEMA: u32 = 1;

/// On-disk envelope: the schema version next to the flattened payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    #[serde(default = "unversioned")]
    pub schema_version: u32,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

fn unversioned() -> u32 {
    UNVERSIONED_SCHEMA
}

/// Result of reading a stored record, already normalized to the current schema.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPreferences {
    pub preferences: UiPreferences,
    pub found_schema: u32,
}

impl LoadedPreferences {
    pub fn was_migrated(&self) -> bool {
        self.found_schema < CURRENT_SCHEMA
    }
}
