use camino::{Utf8Path, Utf8PathBuf};
use kestrel_core::LauncherConfig;
use std::fs;

use crate::atomic::atomic_write;
use crate::StorageError;

pub const CONFIG_FILENAME: &str = "launcher-config.json";

/// Launcher configuration kept as a JSON document.
///
/// Fields missing from the file take their defaults; the loaded value is
/// always normalized.
#[derive(Debug, Clone)]
pub struct JsonConfigFile {
    path: Utf8PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Utf8Path) -> Self {
        Self::new(dir.join(CONFIG_FILENAME))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn load(&self) -> Result<LauncherConfig, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LauncherConfig::default())
            }
            Err(e) => return Err(e.into()),
        };
        let config: LauncherConfig = serde_json::from_str(&content)?;
        Ok(config.normalized())
    }

    pub fn save(&self, config: &LauncherConfig) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(config)?;
        atomic_write(&self.path, &json)
    }
}
