//! Host stand-in for replays
//!
//! World state lives behind a shared mutex so the replay driver can reshape
//! it between steps while the runtime task owns the host.

use crate::host::{
    DecodeRequest, EffectLookup, EntityService, HostMessage, MessageBus, Position,
    ResponseSender, TextDecoder, Verdict,
};
use crate::runtime::DecodeSender;
use crate::text::EncodedText;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Entities, effects and everything the session did to the host
#[derive(Debug, Default)]
pub struct ScriptedWorld {
    pub positions: HashMap<u32, Position>,
    pub names: HashMap<u32, EncodedText>,
    pub player: Option<u32>,
    pub effects: HashSet<u32>,
    /// Responses that reached the host, in order
    pub sent: Vec<u32>,
    pub interactions: Vec<u32>,
}

impl ScriptedWorld {
    pub fn place(&mut self, entity_id: u32, position: Position, name: EncodedText) {
        self.positions.insert(entity_id, position);
        if name.is_empty() {
            self.names.remove(&entity_id);
        } else {
            self.names.insert(entity_id, name);
        }
    }

    pub fn set_effect(&mut self, skill_id: u32, active: bool) {
        if active {
            self.effects.insert(skill_id);
        } else {
            self.effects.remove(&skill_id);
        }
    }
}

pub(crate) fn lock(world: &Mutex<ScriptedWorld>) -> MutexGuard<'_, ScriptedWorld> {
    world.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Host that answers from a `ScriptedWorld` and decodes immediately
///
/// Decode completions go back through the runtime channel, so they land on
/// a later loop turn like the real host's callbacks.
#[derive(Debug, Clone)]
pub struct ScriptedHost {
    world: Arc<Mutex<ScriptedWorld>>,
    decoder: DecodeSender,
}

impl ScriptedHost {
    pub fn new(world: Arc<Mutex<ScriptedWorld>>, decoder: DecodeSender) -> Self {
        Self { world, decoder }
    }

    pub fn world(&self) -> &Arc<Mutex<ScriptedWorld>> {
        &self.world
    }
}

impl EntityService for ScriptedHost {
    fn position(&self, entity_id: u32) -> Option<Position> {
        lock(&self.world).positions.get(&entity_id).copied()
    }

    fn controlled_entity(&self) -> Option<u32> {
        lock(&self.world).player
    }

    fn encoded_name(&self, entity_id: u32) -> Option<EncodedText> {
        lock(&self.world).names.get(&entity_id).cloned()
    }

    fn interact(&mut self, entity_id: u32) {
        tracing::debug!(agent_id = entity_id, "Interacting");
        lock(&self.world).interactions.push(entity_id);
    }
}

impl EffectLookup for ScriptedHost {
    fn has_effect(&self, skill_id: u32) -> bool {
        lock(&self.world).effects.contains(&skill_id)
    }
}

impl TextDecoder for ScriptedHost {
    fn decode(&mut self, request: DecodeRequest) {
        let text = request
            .encoded
            .plain_text()
            .unwrap_or_else(|| request.encoded.to_string_lossy());
        if let Err(e) = self.decoder.try_decoded(request.ticket, text) {
            tracing::warn!(error = %e, ticket = ?request.ticket, "Dropping decode completion");
        }
    }
}

impl ResponseSender for ScriptedHost {
    fn send_response(&mut self, dialog_id: u32) -> bool {
        lock(&self.world).sent.push(dialog_id);
        true
    }
}

impl MessageBus for ScriptedHost {
    /// User clicks reach the host only when nothing blocked them
    fn forward(&mut self, message: &HostMessage, verdict: Verdict) -> Verdict {
        if let HostMessage::SendResponse { dialog_id } = message {
            if !verdict.is_blocked() {
                lock(&self.world).sent.push(*dialog_id);
            }
        }
        verdict
    }
}
