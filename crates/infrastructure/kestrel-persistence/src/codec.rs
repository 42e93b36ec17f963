use kestrel_core::UiPreferences;
use serde_json::Value;

use crate::api::{PersistedRecord, CURRENT_SCHEMA, UNVERSIONED_SCHEMA};
use crate::StorageError;

const SCHEMA_VERSION_KEY: &str = "schemaVersion";

pub fn encode_record(prefs: &UiPreferences) -> Result<Vec<u8>, StorageError> {
    let payload = match serde_json::to_value(prefs)? {
        Value::Object(map) => map,
        _ => return Err(StorageError::Corrupt),
    };
    let record = PersistedRecord {
        schema_version: CURRENT_SCHEMA,
        payload,
    };
    Ok(serde_json::to_vec_pretty(&record)?)
}

/// Parses raw bytes into an envelope. Only input that is not a JSON object
/// is reported as [`StorageError::Corrupt`]; a `schemaVersion` of the wrong
/// type reads as unversioned.
pub fn decode_record(bytes: &[u8]) -> Result<PersistedRecord, StorageError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|_| StorageError::Corrupt)?;
    let Value::Object(mut payload) = value else {
        return Err(StorageError::Corrupt);
    };

    let schema_version = match payload.remove(SCHEMA_VERSION_KEY) {
        None => UNVERSIONED_SCHEMA,
        Some(raw) => raw
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unreadable schemaVersion, treating record as unversioned");
                UNVERSIONED_SCHEMA
            }),
    };
    Ok(PersistedRecord {
        schema_version,
        payload,
    })
}
