//! Mock host for testing
//!
//! Records everything the session asks of the host so tests can assert on
//! it without a live client.

use super::message::{DecodeRequest, DecodeTarget, DialogBodyInfo, DialogButtonInfo, HostMessage};
use super::traits::*;
use crate::session::DialogSession;
use crate::text::EncodedText;
use std::collections::{HashMap, HashSet};

/// In-memory host with scripted world state
#[derive(Debug, Default)]
pub struct MockHost {
    pub positions: HashMap<u32, Position>,
    pub names: HashMap<u32, EncodedText>,
    pub player: Option<u32>,
    pub effects: HashSet<u32>,
    /// Decode requests not yet answered
    pub decode_requests: Vec<DecodeRequest>,
    /// Responses the session actually sent
    pub sent: Vec<u32>,
    pub interactions: Vec<u32>,
    /// When set, the host rejects every send
    pub reject_sends: bool,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entity(mut self, id: u32, pos: Position, name: EncodedText) -> Self {
        self.positions.insert(id, pos);
        self.names.insert(id, name);
        self
    }

    #[must_use]
    pub fn with_player(mut self, id: u32, pos: Position) -> Self {
        self.positions.insert(id, pos);
        self.player = Some(id);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, skill_id: u32) -> Self {
        self.effects.insert(skill_id);
        self
    }

    /// Answer every outstanding decode, turning plain-text envelopes into
    /// their label and everything else into its lossy UTF-16 reading
    pub fn complete_decodes(&mut self, session: &mut DialogSession) {
        for request in std::mem::take(&mut self.decode_requests) {
            let text = request
                .encoded
                .plain_text()
                .unwrap_or_else(|| request.encoded.to_string_lossy());
            session.on_decoded(request.ticket, &text);
        }
    }

    /// Answer only the body decode with the given text
    pub fn complete_body_decode(&mut self, session: &mut DialogSession, text: &str) {
        let position = self
            .decode_requests
            .iter()
            .position(|r| r.ticket.target == DecodeTarget::Body)
            .expect("no body decode requested");
        let request = self.decode_requests.remove(position);
        session.on_decoded(request.ticket, text);
    }
}

impl EntityService for MockHost {
    fn position(&self, entity_id: u32) -> Option<Position> {
        self.positions.get(&entity_id).copied()
    }

    fn controlled_entity(&self) -> Option<u32> {
        self.player
    }

    fn encoded_name(&self, entity_id: u32) -> Option<EncodedText> {
        self.names.get(&entity_id).cloned()
    }

    fn interact(&mut self, entity_id: u32) {
        self.interactions.push(entity_id);
    }
}

impl EffectLookup for MockHost {
    fn has_effect(&self, skill_id: u32) -> bool {
        self.effects.contains(&skill_id)
    }
}

impl TextDecoder for MockHost {
    fn decode(&mut self, request: DecodeRequest) {
        self.decode_requests.push(request);
    }
}

impl ResponseSender for MockHost {
    fn send_response(&mut self, dialog_id: u32) -> bool {
        if self.reject_sends {
            return false;
        }
        self.sent.push(dialog_id);
        true
    }
}

impl MessageBus for MockHost {}

/// Run a message through both interception passes, as the host bus would
pub fn deliver(session: &mut DialogSession, host: &mut MockHost, message: &HostMessage) {
    let verdict = session.pre_dispatch(message, host);
    session.post_dispatch(message, verdict, host);
}

/// Open a dialog with the given entity, body and plain-text buttons
pub fn open_dialog(
    session: &mut DialogSession,
    host: &mut MockHost,
    agent_id: u32,
    body: &str,
    buttons: &[u32],
) {
    deliver(
        session,
        host,
        &HostMessage::DialogBody(DialogBodyInfo::new(agent_id, EncodedText::from(body))),
    );
    for &dialog_id in buttons {
        add_button(
            session,
            host,
            DialogButtonInfo::new(dialog_id, EncodedText::plain(&format!("Option {dialog_id}"))),
        );
    }
}

pub fn add_button(session: &mut DialogSession, host: &mut MockHost, button: DialogButtonInfo) {
    deliver(session, host, &HostMessage::DialogButton(button));
}
