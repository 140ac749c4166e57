//! Shared record types used by storage backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel display name used when no usable tab title was available.
pub const UNTITLED: &str = "untitled";

/// A captured PDF document as persisted by a `PdfStore` backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedPdf {
    /// Record identifier, assigned by the store on append.
    pub id: i64,
    /// Complete reassembled document body.
    pub payload: Vec<u8>,
    /// URL the response was served from.
    pub source_url: String,
    /// Filesystem-safe name derived from the originating tab title, if any.
    pub display_name: Option<String>,
    /// When reassembly of the capture finished.
    pub captured_at: DateTime<Utc>,
}

/// The transient form handed from the capture pipeline to the store.
///
/// Carries no id: record identifiers are assigned by the backend, never by
/// the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCapture {
    pub payload: Vec<u8>,
    pub source_url: String,
    pub display_name: Option<String>,
    pub captured_at: DateTime<Utc>,
}
