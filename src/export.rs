//! Export subsystem
//!
//! Turns stored captures into user-visible files on an external signal.
//!
//! Components:
//! - `exporter`: the Exporter trait over the file-export mechanism.
//! - `file_exporter`: directory-backed implementation using tokio::fs.
//! - `trigger`: the export orchestration (barrier, read, save, clear).

pub mod exporter;
pub mod file_exporter;
pub mod trigger;

pub use exporter::Exporter;
pub use file_exporter::FileExporter;
pub use trigger::ExportTrigger;
