//! Messages exchanged with the host

use crate::text::EncodedText;
use serde::{Deserialize, Serialize};

/// Skill id the host uses for "no associated skill"
pub const NO_SKILL: u32 = 0xFFFF_FFFF;

fn no_skill() -> u32 {
    NO_SKILL
}

/// Payload of a dialog-body message; an empty message means the dialog closed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialogBodyInfo {
    pub agent_id: u32,
    #[serde(default)]
    pub message: EncodedText,
}

impl DialogBodyInfo {
    pub fn new(agent_id: u32, message: EncodedText) -> Self {
        Self { agent_id, message }
    }

    /// Body message the host sends when it closes a dialog
    pub fn closed(agent_id: u32) -> Self {
        Self {
            agent_id,
            message: EncodedText::default(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.message.is_empty()
    }
}

/// Payload of a button-added message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogButtonInfo {
    pub dialog_id: u32,
    #[serde(default)]
    pub button_icon: u32,
    #[serde(default = "no_skill")]
    pub skill_id: u32,
    #[serde(default)]
    pub message: EncodedText,
}

impl DialogButtonInfo {
    pub fn new(dialog_id: u32, message: EncodedText) -> Self {
        Self {
            dialog_id,
            button_icon: 0,
            skill_id: NO_SKILL,
            message,
        }
    }
}

/// UI messages the session intercepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    /// A dialog body arrived, or the dialog closed
    DialogBody(DialogBodyInfo),
    /// A response button was added to the current dialog
    DialogButton(DialogButtonInfo),
    /// Something is trying to send a response
    SendResponse { dialog_id: u32 },
    /// The dialog frame was torn down without a body message
    FrameDestroyed,
}

impl HostMessage {
    pub fn name(&self) -> &'static str {
        match self {
            HostMessage::DialogBody(_) => "dialog_body",
            HostMessage::DialogButton(_) => "dialog_button",
            HostMessage::SendResponse { .. } => "send_response",
            HostMessage::FrameDestroyed => "frame_destroyed",
        }
    }
}

/// Outcome of the pre-dispatch pass
///
/// Any participant may turn `Pass` into `Block`; nothing turns it back.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    #[default]
    Pass,
    Block,
}

impl Verdict {
    pub fn is_blocked(self) -> bool {
        matches!(self, Verdict::Block)
    }

    pub fn and(self, other: Verdict) -> Verdict {
        if self.is_blocked() || other.is_blocked() {
            Verdict::Block
        } else {
            Verdict::Pass
        }
    }
}

/// What a decode completion should update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeTarget {
    Body,
    /// Index into the response registry
    Button(usize),
}

/// Identifies a decode request; stale generations are discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeTicket {
    pub generation: u64,
    pub target: DecodeTarget,
}

/// Asynchronous decode handed to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeRequest {
    pub ticket: DecodeTicket,
    pub encoded: EncodedText,
}
