use std::fmt;

#[derive(Debug)]
pub enum StorageError {
    ConnectionFailed,
    MigrationFailed,
    WriteFailed,
    ReadFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionFailed => write!(f, "Storage connection failed"),
            StorageError::MigrationFailed => write!(f, "Storage schema migration failed"),
            StorageError::WriteFailed => write!(f, "Storage write failed"),
            StorageError::ReadFailed => write!(f, "Storage read failed"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Errors raised by the capture pipeline's collaborators.
///
/// Stream and persistence failures never surface past the pipeline (they
/// degrade to log lines), so only the tab-metadata lookup carries a typed
/// error across a boundary.
#[derive(Debug)]
pub enum CaptureError {
    TabLookupFailed(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::TabLookupFailed(e) => write!(f, "Tab title lookup failed: {}", e),
        }
    }
}

impl std::error::Error for CaptureError {}

#[derive(Debug)]
pub enum ExportError {
    InProgress,
    SaveFailed(std::io::Error),
    StorageError(StorageError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::InProgress => write!(f, "An export is already in progress"),
            ExportError::SaveFailed(e) => write!(f, "File save failed: {}", e),
            ExportError::StorageError(e) => write!(f, "Export storage error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::SaveFailed(err)
    }
}
