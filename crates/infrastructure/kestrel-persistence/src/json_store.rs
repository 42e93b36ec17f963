use camino::{Utf8Path, Utf8PathBuf};
use kestrel_core::UiPreferences;
use std::fs;

use crate::atomic::atomic_write;
use crate::api::{LoadedPreferences, PREFERENCES_FILENAME};
use crate::codec::{decode_record, encode_record};
use crate::maintenance::quarantine_corrupt_file;
use crate::migrate::migrate_record;
use crate::StorageError;

/// Stores the preferences record as a single JSON file.
///
/// The store performs no caching; callers hold the in-memory state and hand
/// a snapshot to [`JsonPreferencesStore::save`] after each change.
#[derive(Debug, Clone)]
pub struct JsonPreferencesStore {
    path: Utf8PathBuf,
}

impl JsonPreferencesStore {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Utf8Path) -> Self {
        Self::new(dir.join(PREFERENCES_FILENAME))
    }

    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::in_dir(&crate::paths::default_data_dir()?))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Reads and migrates the stored record. `Ok(None)` means nothing has
    /// been stored yet. A corrupt file is quarantined before
    /// [`StorageError::Corrupt`] is returned.
    pub fn load(&self) -> Result<Option<LoadedPreferences>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match decode_record(&bytes) {
            Ok(record) => Ok(Some(migrate_record(record))),
            Err(StorageError::Corrupt) => {
                quarantine_or_warn(&self.path);
                Err(StorageError::Corrupt)
            }
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, prefs: &UiPreferences) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = encode_record(prefs)?;
        atomic_write(&self.path, &bytes)
    }
}

/// Returns whether the file was moved aside. A failed move is logged and
/// otherwise ignored; the caller still reports the record as corrupt.
fn quarantine_or_warn(path: &Utf8Path) -> bool {
    match quarantine_corrupt_file(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(%path, "failed to quarantine corrupt preferences: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_quarantine_is_reported_not_raised() {
        // procfs entries cannot be renamed, even by root.
        assert!(!quarantine_or_warn(Utf8Path::new("/proc/self/status")));
    }

    #[test]
    fn quarantine_moves_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let path = root.join(PREFERENCES_FILENAME);
        fs::write(&path, b"{").unwrap();
        assert!(quarantine_or_warn(&path));
        assert!(!path.exists());
    }
}
