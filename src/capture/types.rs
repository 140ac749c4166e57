//! Common data types used across the capture pipeline.

use log::warn;

/// Canonical media type the pipeline captures.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Header-time metadata for one observed response.
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// Host-assigned identifier for the request/response pair.
    pub request_id: String,
    /// URL the response is served from.
    pub url: String,
    /// Declared Content-Type header value, if any.
    pub content_type: Option<String>,
    /// Identifier of the visible tab the response belongs to, if any.
    pub tab_id: Option<i64>,
}

/// One discrete event on a response body stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyEvent {
    /// An ordered chunk of body bytes.
    Chunk(Vec<u8>),
    /// The body completed normally.
    End,
    /// The stream aborted before completion.
    Error(String),
}

/// States of the per-response capture machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Accumulating chunks as the body streams.
    Buffering,
    /// Body fully observed; payload was produced.
    Done,
    /// Stream errored; buffered data was discarded.
    Aborted,
}

/// Per-response reassembly state machine.
///
/// Chunks are appended in arrival order and never mutated in place. The
/// complete payload is produced exactly once, when the end event arrives;
/// a stream error discards everything so no partial artifact can leak out.
#[derive(Debug)]
pub struct ResponseCapture {
    request_id: String,
    chunks: Vec<Vec<u8>>,
    state: CaptureState,
}

impl ResponseCapture {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            chunks: Vec::new(),
            state: CaptureState::Buffering,
        }
    }

    /// Applies one stream event.
    ///
    /// Returns the reassembled payload when the event completes the body.
    /// Events arriving after a terminal state are ignored.
    pub fn on_event(&mut self, event: BodyEvent) -> Option<Vec<u8>> {
        if self.state != CaptureState::Buffering {
            return None;
        }
        match event {
            BodyEvent::Chunk(chunk) => {
                self.chunks.push(chunk);
                None
            }
            BodyEvent::End => {
                self.state = CaptureState::Done;
                let total: usize = self.chunks.iter().map(Vec::len).sum();
                let mut payload = Vec::with_capacity(total);
                for chunk in self.chunks.drain(..) {
                    payload.extend_from_slice(&chunk);
                }
                Some(payload)
            }
            BodyEvent::Error(e) => {
                warn!(
                    "[{}] stream aborted after {} buffered chunks: {}",
                    self.request_id,
                    self.chunks.len(),
                    e
                );
                self.chunks.clear();
                self.state = CaptureState::Aborted;
                None
            }
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn buffered_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }
}
