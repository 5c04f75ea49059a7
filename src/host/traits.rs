//! Trait abstractions for the host collaborators
//!
//! These traits enable testing the session with mock implementations.

use super::classifier::{QuestDialogType, QuestResponse};
use super::message::{DecodeRequest, HostMessage, Verdict};
use crate::text::EncodedText;
use serde::{Deserialize, Serialize};

/// World position of an entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Entity lookups and interaction
pub trait EntityService {
    fn position(&self, entity_id: u32) -> Option<Position>;

    /// The locally controlled entity, if any
    fn controlled_entity(&self) -> Option<u32>;

    /// Encoded display name of an entity
    fn encoded_name(&self, entity_id: u32) -> Option<EncodedText>;

    /// Walk up to and talk to an entity
    fn interact(&mut self, entity_id: u32);
}

/// Effects active on the local player
pub trait EffectLookup {
    fn has_effect(&self, skill_id: u32) -> bool;
}

/// Asynchronous decode of host-encoded text
///
/// Completions are reported back through `DialogSession::on_decoded` on a
/// later turn; the request must not be answered re-entrantly.
pub trait TextDecoder {
    fn decode(&mut self, request: DecodeRequest);
}

/// The host's raw "send response" primitive
///
/// The session has already run its interception passes for the response;
/// implementations must not echo it back through the message bus.
pub trait ResponseSender {
    /// Returns whether the host accepted the send
    fn send_response(&mut self, dialog_id: u32) -> bool;
}

/// The host's own handling of a message between the two passes
pub trait MessageBus {
    /// Deliver a message to the host's handlers; they may block it further
    fn forward(&mut self, _message: &HostMessage, verdict: Verdict) -> Verdict {
        verdict
    }
}

/// Classification of response ids
pub trait ResponseClassifier: Send + Sync {
    /// Quest id and sub-kind, if this is a quest response
    fn quest(&self, dialog_id: u32) -> Option<QuestResponse>;

    /// Response id for a quest sub-kind
    fn quest_dialog_id(&self, quest_id: u32, kind: QuestDialogType) -> u32;

    /// Whether the id is one of the teleport-sequence responses
    fn is_teleport_sequence(&self, dialog_id: u32) -> bool;

    /// Response opening the teleport sequence
    fn teleport_enquire_id(&self) -> u32;

    /// Response that must precede a teleport-sequence id
    fn teleport_prerequisite(&self, dialog_id: u32) -> u32 {
        dialog_id.wrapping_sub(0x7)
    }

    /// Enquire response preceding a profession change
    fn profession_enquire(&self, dialog_id: u32) -> Option<u32> {
        let profession = (dialog_id & 0xfff) >> 8;
        if dialog_id & 0xf84 == dialog_id && profession != 0 {
            Some((profession << 8) | 0x85)
        } else {
            None
        }
    }
}

/// Everything the session needs from the host
pub trait Host: EntityService + EffectLookup + TextDecoder + ResponseSender {}
impl<T: EntityService + EffectLookup + TextDecoder + ResponseSender> Host for T {}
