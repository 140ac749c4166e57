//! PdfStore Trait
//!
//! This module defines the `PdfStore` trait, the interface every capture
//! storage backend implements.
//!
//! Implementors are responsible for:
//! - Persisting completed captures and assigning each a record id
//! - Returning all stored records in insertion order
//! - Removing all stored records after an export
//!
//! All methods return a `Result` to handle potential storage errors.

use async_trait::async_trait;

use crate::error_handling::types::StorageError;
use crate::storage::types::{CapturedPdf, NewCapture};

/// Interface for capture storage backends.
///
/// Backends are injected as `Arc<dyn PdfStore>` into both the capture path
/// (which only appends) and the export path (which reads and clears).
#[async_trait]
pub trait PdfStore: Send + Sync {
    /// Persists one completed capture. The backend assigns the record id.
    async fn append(&self, capture: NewCapture) -> Result<(), StorageError>;

    /// Retrieves every stored record in insertion order.
    async fn read_all(&self) -> Result<Vec<CapturedPdf>, StorageError>;

    /// Removes every stored record.
    async fn clear_all(&self) -> Result<(), StorageError>;
}
