use async_trait::async_trait;

use crate::error_handling::types::ExportError;

/// The file-export mechanism.
///
/// Given a byte payload and a filename, durably writes a file visible to
/// the user outside the process. Failure is per-call and must not abort a
/// batch of exports.
#[async_trait]
pub trait Exporter: Send + Sync {
    async fn save(&self, payload: &[u8], filename: &str) -> Result<(), ExportError>;
}
