use std::sync::Mutex;

use async_trait::async_trait;
use log::debug;

use crate::error_handling::types::StorageError;
use crate::storage::store_trait::PdfStore;
use crate::storage::types::{CapturedPdf, NewCapture};

/// In-process `PdfStore` backend.
///
/// Holds records in memory for hosts that do not need captures to survive a
/// restart. Also the backend of choice in tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    records: Vec<CapturedPdf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PdfStore for MemoryStore {
    async fn append(&self, capture: NewCapture) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        debug!("MemoryStore append id={} from {}", id, capture.source_url);
        inner.records.push(CapturedPdf {
            id,
            payload: capture.payload,
            source_url: capture.source_url,
            display_name: capture.display_name,
            captured_at: capture.captured_at,
        });
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<CapturedPdf>, StorageError> {
        Ok(self.inner.lock().unwrap().records.clone())
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        self.inner.lock().unwrap().records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn ids_keep_increasing_across_clear() {
        let store = MemoryStore::new();
        let capture = NewCapture {
            payload: b"pdf".to_vec(),
            source_url: "https://example.org/doc.pdf".into(),
            display_name: None,
            captured_at: Utc::now(),
        };
        store.append(capture.clone()).await.unwrap();
        store.clear_all().await.unwrap();
        store.append(capture).await.unwrap();
        let all = store.read_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 2);
    }
}
