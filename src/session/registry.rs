//! Response options offered by the active dialog

use crate::host::{DialogButtonInfo, NO_SKILL};
use crate::text::EncodedText;
use serde::Serialize;

/// One selectable response
///
/// Always an owned copy; host buffers are never retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseOption {
    pub dialog_id: u32,
    pub icon: u32,
    /// Associated skill, `None` when the button carries none
    pub skill_id: Option<u32>,
    pub message: EncodedText,
    /// Decoded label, once the host finished decoding `message`
    pub decoded: Option<String>,
    /// Synthesized from markup in the body rather than added by the host
    pub embedded: bool,
}

impl ResponseOption {
    pub fn from_button(info: &DialogButtonInfo) -> Self {
        Self {
            dialog_id: info.dialog_id,
            icon: info.button_icon,
            skill_id: (info.skill_id != NO_SKILL).then_some(info.skill_id),
            message: info.message.clone(),
            decoded: None,
            embedded: false,
        }
    }

    /// Response referenced inline by the dialog body
    pub fn embedded(dialog_id: u32, label: &str) -> Self {
        Self {
            dialog_id,
            icon: 0,
            skill_id: None,
            message: EncodedText::plain(label),
            decoded: Some(label.to_owned()),
            embedded: true,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.decoded.as_deref()
    }

    /// Host-shaped copy, for re-dispatching the dialog
    pub fn to_button_info(&self) -> DialogButtonInfo {
        DialogButtonInfo {
            dialog_id: self.dialog_id,
            button_icon: self.icon,
            skill_id: self.skill_id.unwrap_or(NO_SKILL),
            message: self.message.clone(),
        }
    }
}

/// Ordered set of offered responses
#[derive(Debug, Clone, Default)]
pub struct ResponseRegistry {
    options: Vec<ResponseOption>,
}

impl ResponseRegistry {
    /// Append an option; returns its index for decode tickets
    pub fn push(&mut self, option: ResponseOption) -> usize {
        self.options.push(option);
        self.options.len() - 1
    }

    pub fn clear(&mut self) {
        self.options.clear();
    }

    pub fn contains(&self, dialog_id: u32) -> bool {
        self.options.iter().any(|o| o.dialog_id == dialog_id)
    }

    pub fn options(&self) -> &[ResponseOption] {
        &self.options
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ResponseOption> {
        self.options.get_mut(index)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }
}
