//! Snapshot of the active dialog

use crate::host::DialogBodyInfo;
use crate::text::EncodedText;

/// The active dialog's entity and body
///
/// `last_sent` survives resets; everything else is wiped together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogSnapshot {
    agent_id: u32,
    body: EncodedText,
    decoded_body: Option<String>,
    last_sent: u32,
}

impl DialogSnapshot {
    /// Replace the dialog; a body without an entity is rejected
    pub fn replace(&mut self, info: &DialogBodyInfo) -> bool {
        self.clear();
        if info.agent_id == 0 && !info.message.is_empty() {
            return false;
        }
        self.agent_id = info.agent_id;
        self.body = info.message.clone();
        true
    }

    /// Clear the dialog; returns the entity it belonged to
    pub fn clear(&mut self) -> u32 {
        let agent_id = self.agent_id;
        self.agent_id = 0;
        self.body = EncodedText::default();
        self.decoded_body = None;
        agent_id
    }

    pub fn is_open(&self) -> bool {
        self.agent_id != 0 && !self.body.is_empty()
    }

    pub fn agent_id(&self) -> u32 {
        self.agent_id
    }

    pub fn body(&self) -> &EncodedText {
        &self.body
    }

    pub fn decoded_body(&self) -> Option<&str> {
        self.decoded_body.as_deref()
    }

    pub fn set_decoded_body(&mut self, decoded: &str) {
        self.decoded_body = Some(decoded.to_owned());
    }

    pub fn last_sent(&self) -> u32 {
        self.last_sent
    }

    pub fn record_sent(&mut self, dialog_id: u32) {
        self.last_sent = dialog_id;
    }
}
