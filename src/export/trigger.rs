//! Export orchestration.
//!
//! A single external user signal drives one pass: wait for every capture
//! write issued so far to settle, read the store, save each record as a
//! file, then clear the store. Per-record export failures are logged and
//! the batch continues; the clear afterward is unconditional, so failed
//! records are purged along with exported ones rather than queued for
//! retry.

use std::sync::Arc;

use log::{error, info};
use tokio::sync::Mutex;

use crate::error_handling::types::ExportError;
use crate::export::exporter::Exporter;
use crate::storage::store_trait::PdfStore;
use crate::storage::types::UNTITLED;
use crate::tracking::in_flight::InFlightTracker;

pub struct ExportTrigger {
    tracker: Arc<InFlightTracker>,
    store: Arc<dyn PdfStore>,
    exporter: Arc<dyn Exporter>,
    // Single-flight guard: the trigger source is assumed not to re-enter,
    // but a second signal mid-pass is rejected rather than interleaved.
    running: Mutex<()>,
}

impl ExportTrigger {
    pub fn new(
        tracker: Arc<InFlightTracker>,
        store: Arc<dyn PdfStore>,
        exporter: Arc<dyn Exporter>,
    ) -> Self {
        Self {
            tracker,
            store,
            exporter,
            running: Mutex::new(()),
        }
    }

    /// Runs one export pass and returns how many records were saved.
    ///
    /// Waits on the tracker barrier first, so every capture that started
    /// persisting before this call is either stored or failed by the time
    /// the store is read. An empty store is a no-op: nothing is cleared.
    pub async fn run(&self) -> Result<usize, ExportError> {
        let _running = self
            .running
            .try_lock()
            .map_err(|_| ExportError::InProgress)?;

        self.tracker.barrier().await;

        let records = self
            .store
            .read_all()
            .await
            .map_err(ExportError::StorageError)?;
        if records.is_empty() {
            info!("no captures to export");
            return Ok(0);
        }

        let total = records.len();
        let mut exported = 0usize;
        for record in records {
            let name = record.display_name.as_deref().unwrap_or(UNTITLED);
            let filename = format!("{}.pdf", name);
            match self.exporter.save(&record.payload, &filename).await {
                Ok(()) => {
                    info!(
                        "exported capture {} from {} as {}",
                        record.id, record.source_url, filename
                    );
                    exported += 1;
                }
                // One failed record must not abort the batch.
                Err(e) => error!("export of capture {} ({}) failed: {}", record.id, filename, e),
            }
        }

        self.store
            .clear_all()
            .await
            .map_err(ExportError::StorageError)?;
        info!("export finished: {}/{} saved, store cleared", exported, total);
        Ok(exported)
    }
}
