//! Capture pipeline
//!
//! Observes response bodies flowing through the host process, classifies
//! them at header time, forwards every chunk downstream untouched, and
//! reassembles matched bodies into complete PDF payloads for storage.
//!
//! Components:
//! - `types`: header metadata, body stream events, and the per-response
//!   reassembly state machine.
//! - `interceptor`: the async pump driving one state machine per response.
//! - `naming`: filename sanitization and best-effort tab title derivation.

pub mod interceptor;
pub mod naming;
pub mod types;

pub use interceptor::ResponseInterceptor;
pub use naming::{derive_display_name, sanitize_filename, TabTitleSource};
pub use types::{BodyEvent, CaptureState, ResponseCapture, ResponseMetadata, PDF_MEDIA_TYPE};
