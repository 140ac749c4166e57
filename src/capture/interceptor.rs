//! Streaming response-body interception.
//!
//! `ResponseInterceptor` sits on the host's response-observation feed. For
//! every response it decides once, at header time, whether the declared
//! content type is a PDF. Matched bodies are reassembled chunk by chunk
//! while every event is forwarded to the original destination unmodified
//! and in arrival order; non-matching bodies are forwarded untouched with
//! no capture state at all.
//!
//! On stream end the assembled payload is persisted through the injected
//! `PdfStore`. The pending write is registered with the `InFlightTracker`
//! before it settles and unregistered on settlement regardless of outcome,
//! so a later export barrier cannot miss it and a failed write cannot leave
//! the tracker inconsistent.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info, trace, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::capture::naming::{derive_display_name, TabTitleSource};
use crate::capture::types::{
    BodyEvent, CaptureState, ResponseCapture, ResponseMetadata, PDF_MEDIA_TYPE,
};
use crate::storage::store_trait::PdfStore;
use crate::storage::types::NewCapture;
use crate::tracking::in_flight::InFlightTracker;

/// Classifies responses and drives one capture per matched body stream.
pub struct ResponseInterceptor {
    store: Arc<dyn PdfStore>,
    tracker: Arc<InFlightTracker>,
    tabs: Option<Arc<dyn TabTitleSource>>,
}

impl ResponseInterceptor {
    pub fn new(store: Arc<dyn PdfStore>, tracker: Arc<InFlightTracker>) -> Self {
        Self {
            store,
            tracker,
            tabs: None,
        }
    }

    /// Enables best-effort display-name derivation from tab titles.
    pub fn with_tab_titles(mut self, tabs: Arc<dyn TabTitleSource>) -> Self {
        self.tabs = Some(tabs);
        self
    }

    /// Header-time classification.
    ///
    /// A response is of interest iff its declared content type, lowercased,
    /// begins with the PDF media type. The decision is made once and never
    /// revisited mid-stream; a missing header means not of interest.
    pub fn matches(meta: &ResponseMetadata) -> bool {
        meta.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().starts_with(PDF_MEDIA_TYPE))
            .unwrap_or(false)
    }

    /// Attaches to one response's body stream.
    ///
    /// Events read from `body_rx` are sent to `downstream` verbatim, in
    /// order, before any local bookkeeping. For matched responses the
    /// chunks are also reassembled and persisted on stream end; a stream
    /// error discards the buffer and persists nothing.
    pub fn observe(
        self: &Arc<Self>,
        meta: ResponseMetadata,
        body_rx: mpsc::Receiver<BodyEvent>,
        downstream: mpsc::Sender<BodyEvent>,
    ) -> JoinHandle<()> {
        if Self::matches(&meta) {
            let this = Arc::clone(self);
            tokio::spawn(async move { this.pump_and_capture(meta, body_rx, downstream).await })
        } else {
            debug!(
                "[{}] not a PDF response ({:?}); passing through",
                meta.request_id, meta.content_type
            );
            tokio::spawn(Self::pump_only(meta, body_rx, downstream))
        }
    }

    /// Pass-through for responses that are not of interest.
    async fn pump_only(
        meta: ResponseMetadata,
        mut body_rx: mpsc::Receiver<BodyEvent>,
        downstream: mpsc::Sender<BodyEvent>,
    ) {
        while let Some(event) = body_rx.recv().await {
            if downstream.send(event).await.is_err() {
                trace!("[{}] downstream closed", meta.request_id);
                break;
            }
        }
    }

    async fn pump_and_capture(
        &self,
        meta: ResponseMetadata,
        mut body_rx: mpsc::Receiver<BodyEvent>,
        downstream: mpsc::Sender<BodyEvent>,
    ) {
        info!("[{}] capturing PDF response from {}", meta.request_id, meta.url);
        let mut capture = ResponseCapture::new(meta.request_id.clone());
        while let Some(event) = body_rx.recv().await {
            // Forward first: delivery to the original consumer is never
            // delayed or altered by the capture.
            if downstream.send(event.clone()).await.is_err() {
                trace!("[{}] downstream closed; capture continues", meta.request_id);
            }
            if let Some(payload) = capture.on_event(event) {
                self.persist(&meta, payload).await;
                return;
            }
            if capture.state() == CaptureState::Aborted {
                return;
            }
        }
        if capture.state() == CaptureState::Buffering {
            warn!(
                "[{}] body stream closed without an end signal; discarding {} buffered bytes",
                meta.request_id,
                capture.buffered_bytes()
            );
        }
    }

    /// Hands a completed payload to the store under tracker protection.
    async fn persist(&self, meta: &ResponseMetadata, payload: Vec<u8>) {
        // The guard must cover the whole suspension, including the title
        // lookup, so an export barrier issued from here on waits for us.
        let _guard = self.tracker.register();
        let display_name = self.lookup_display_name(meta).await;
        let record = NewCapture {
            payload,
            source_url: meta.url.clone(),
            display_name,
            captured_at: Utc::now(),
        };
        match self.store.append(record).await {
            Ok(()) => info!("[{}] stored PDF from {}", meta.request_id, meta.url),
            // The artifact is lost; there is no retry.
            Err(e) => error!("[{}] failed to store PDF from {}: {}", meta.request_id, meta.url, e),
        }
    }

    async fn lookup_display_name(&self, meta: &ResponseMetadata) -> Option<String> {
        let tabs = self.tabs.as_ref()?;
        let tab_id = meta.tab_id?;
        match tabs.title(tab_id).await {
            Ok(title) => Some(derive_display_name(&title)),
            Err(e) => {
                warn!("[{}] {}; falling back to default name", meta.request_id, e);
                None
            }
        }
    }
}
