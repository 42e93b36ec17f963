#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("preferences record is not valid JSON or not an object")]
    Corrupt,
    #[error("could not determine a data directory for this platform")]
    NoDataDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    Corrupt,
    NoDataDir,
    Io,
    Codec,
}

impl StorageError {
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            StorageError::Corrupt => StorageErrorKind::Corrupt,
            StorageError::NoDataDir => StorageErrorKind::NoDataDir,
            StorageError::Io(_) => StorageErrorKind::Io,
            StorageError::Serde(_) => StorageErrorKind::Codec,
        }
    }
}
