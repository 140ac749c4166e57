//! Storage subsystem
//!
//! This module provides abstractions and implementations for persisting
//! captured PDF documents between capture time and export time.
//!
//! Components:
//! - `store_trait`: the PdfStore trait defining a uniform API.
//! - `types`: shared record types used by storage backends.
//! - `sqlite_store`: SQLite implementation using sqlx, with versioned schema.
//! - `memory_store`: in-process implementation for embedding and tests.

pub mod memory_store;
pub mod sqlite_store;
pub mod store_trait;
pub mod types;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;
pub use store_trait::PdfStore;
pub use types::{CapturedPdf, NewCapture, UNTITLED};
