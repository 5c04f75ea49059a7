//! Dialog session state
//!
//! One owned `DialogSession` holds everything the engine knows about the
//! active dialog: the snapshot, the offered responses and the queue of
//! requested responses. Host messages flow in through `intercept`, queued
//! requests are acted on by `scheduler`.

mod autoaccept;
mod intercept;
mod markup;
mod registry;
mod scheduler;
mod snapshot;

#[cfg(test)]
mod proptests;

pub use autoaccept::{BLESSING_OF_THE_KURZICKS, BLESSING_OF_THE_LUXONS};
pub use intercept::is_merchant_response;
pub use markup::parse_embedded_responses;
pub use registry::{ResponseOption, ResponseRegistry};
pub use scheduler::{ResponseQueue, TickOutcome};
pub use snapshot::DialogSnapshot;

use crate::config::DialogConfig;
use crate::host::{
    DecodeTarget, DecodeTicket, DialogBodyInfo, HostMessage, ResponseClassifier,
    StandardClassifier,
};
use crate::text::EncodedText;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Reconstructed dialog plus the queue of requested responses
pub struct DialogSession {
    config: DialogConfig,
    classifier: Arc<dyn ResponseClassifier>,
    /// Bumped on every reset; decode tickets from older generations are stale
    generation: u64,
    snapshot: DialogSnapshot,
    registry: ResponseRegistry,
    queue: ResponseQueue,
    /// Entity of the most recently closed dialog
    last_entity: u32,
}

/// Owned copy of the session state for callers outside the runtime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub agent_id: u32,
    pub body: Option<String>,
    pub responses: Vec<ResponseOption>,
    pub last_sent: u32,
    pub pending: Vec<u32>,
}

impl DialogSession {
    pub fn new(config: DialogConfig, classifier: Arc<dyn ResponseClassifier>) -> Self {
        Self {
            config,
            classifier,
            generation: 0,
            snapshot: DialogSnapshot::default(),
            registry: ResponseRegistry::default(),
            queue: ResponseQueue::default(),
            last_entity: 0,
        }
    }

    pub fn with_config(config: DialogConfig) -> Self {
        Self::new(config, Arc::new(StandardClassifier))
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    pub fn classifier(&self) -> &dyn ResponseClassifier {
        self.classifier.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Decoded body text, once the host finished decoding it
    pub fn body_text(&self) -> Option<&str> {
        self.snapshot.decoded_body()
    }

    pub fn encoded_body(&self) -> &EncodedText {
        self.snapshot.body()
    }

    pub fn responses(&self) -> &[ResponseOption] {
        self.registry.options()
    }

    pub fn last_sent_response(&self) -> u32 {
        self.snapshot.last_sent()
    }

    /// Entity the active dialog belongs to, 0 when no dialog is open
    pub fn dialog_entity(&self) -> u32 {
        self.snapshot.agent_id()
    }

    /// Entity of the most recently closed dialog
    pub fn last_entity(&self) -> u32 {
        self.last_entity
    }

    /// Whether the active dialog currently offers this response
    pub fn is_response_available(&self, dialog_id: u32) -> bool {
        self.snapshot.is_open() && self.registry.contains(dialog_id)
    }

    pub fn pending_requests(&self) -> &ResponseQueue {
        &self.queue
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            agent_id: self.snapshot.agent_id(),
            body: self.snapshot.decoded_body().map(str::to_owned),
            responses: self.registry.options().to_vec(),
            last_sent: self.snapshot.last_sent(),
            pending: self.queue.iter().map(|(id, _)| id).collect(),
        }
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// Queue a response to be sent once the dialog offers it
    pub fn send_response(&mut self, dialog_id: u32) {
        self.send_response_at(dialog_id, Instant::now());
    }

    pub fn send_response_at(&mut self, dialog_id: u32, at: Instant) {
        tracing::debug!(response_id = dialog_id, "Queueing response");
        self.queue.enqueue(dialog_id, at, self.classifier.as_ref());
    }

    /// Queue a batch of responses sharing one timestamp
    pub fn send_responses(&mut self, dialog_ids: &[u32]) {
        self.send_responses_at(dialog_ids, Instant::now());
    }

    pub fn send_responses_at(&mut self, dialog_ids: &[u32], at: Instant) {
        for &dialog_id in dialog_ids {
            self.send_response_at(dialog_id, at);
        }
    }

    /// Record that a response went out and drop the requests it satisfied
    pub fn on_response_sent(&mut self, dialog_id: u32) {
        self.snapshot.record_sent(dialog_id);
        self.queue.complete(dialog_id, self.classifier.as_ref());
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Wipe the dialog ready for a new one; returns the entity it belonged to
    pub fn reset(&mut self) -> u32 {
        self.generation += 1;
        self.registry.clear();
        self.snapshot.clear()
    }

    /// Apply a decode completion; returns false if it was stale
    pub fn on_decoded(&mut self, ticket: DecodeTicket, decoded: &str) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                "Discarding stale decode"
            );
            return false;
        }
        match ticket.target {
            DecodeTarget::Body => {
                if self.snapshot.decoded_body().is_some() {
                    tracing::debug!(generation = self.generation, "Body already decoded");
                    return false;
                }
                self.snapshot.set_decoded_body(decoded);
                match parse_embedded_responses(decoded) {
                    Ok(options) => {
                        for option in options {
                            self.registry.push(option);
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            agent_id = self.snapshot.agent_id(),
                            "Dropping embedded responses"
                        );
                    }
                }
                true
            }
            DecodeTarget::Button(index) => match self.registry.get_mut(index) {
                Some(option) => {
                    option.decoded = Some(decoded.to_owned());
                    true
                }
                None => {
                    tracing::debug!(index, "Decode for unknown button");
                    false
                }
            },
        }
    }

    /// Copies of the current dialog, ready to be dispatched again
    ///
    /// Embedded responses are left out; decoding the re-issued body
    /// recreates them.
    pub fn reload_messages(&self) -> Vec<HostMessage> {
        if !self.snapshot.is_open() {
            return Vec::new();
        }
        let body = DialogBodyInfo::new(self.snapshot.agent_id(), self.snapshot.body().clone());
        std::iter::once(HostMessage::DialogBody(body))
            .chain(
                self.registry
                    .options()
                    .iter()
                    .filter(|option| !option.embedded)
                    .map(|option| HostMessage::DialogButton(option.to_button_info())),
            )
            .collect()
    }
}

impl Default for DialogSession {
    fn default() -> Self {
        Self::with_config(DialogConfig::default())
    }
}

impl std::fmt::Debug for DialogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogSession")
            .field("generation", &self.generation)
            .field("snapshot", &self.snapshot)
            .field("registry", &self.registry)
            .field("queue", &self.queue)
            .field("last_entity", &self.last_entity)
            .finish_non_exhaustive()
    }
}
