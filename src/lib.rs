//! Capture-and-export pipeline for PDF responses.
//!
//! A host process feeds observed responses into the [`capture`] pipeline,
//! which classifies them at header time, forwards every body chunk to its
//! original consumer untouched, reassembles matched bodies, and persists
//! each completed document through a [`storage`] backend. Outstanding
//! writes are tracked in [`tracking`] so the [`export`] trigger can wait
//! for every capture issued before it fired, save all stored documents as
//! files, and clear the store.

pub mod capture;
pub mod error_handling;
pub mod export;
pub mod storage;
pub mod tracking;

pub use capture::{ResponseInterceptor, TabTitleSource};
pub use export::{ExportTrigger, Exporter, FileExporter};
pub use storage::{CapturedPdf, MemoryStore, NewCapture, PdfStore, SqliteStore};
pub use tracking::InFlightTracker;
