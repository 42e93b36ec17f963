use camino::Utf8PathBuf;
use directories::ProjectDirs;

use crate::StorageError;

const QUALIFIER: &str = "com";
const ORG: &str = "kestrel";
const APP: &str = "launcher";

/// Platform data directory for kestrel, e.g. `~/.local/share/launcher` on Linux.
pub fn default_data_dir() -> Result<Utf8PathBuf, StorageError> {
    let dirs = ProjectDirs::from(QUALIFIER, ORG, APP).ok_or(StorageError::NoDataDir)?;
    Utf8PathBuf::from_path_buf(dirs.data_dir().to_path_buf()).map_err(|_| StorageError::NoDataDir)
}
