//! Response id layout used by the host

use super::traits::ResponseClassifier;

/// Set on every quest-related response id
const QUEST_FLAG: u32 = 0x0080_0000;

/// Reaper response that opens the teleport menu
pub const UW_TELE_ENQUIRE: u32 = 0x8B;
/// Teleport destinations: lab, vale, pits, pools, planes, wastes, mountains
const UW_TELE_DESTINATIONS: std::ops::RangeInclusive<u32> = 0x8C..=0x92;

/// Role of a quest response in the take/reward flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestDialogType {
    Take,
    Enquire,
    EnquireNext,
    EnquireReward,
    Reward,
    /// Any other quest response (abandon, decline, ...)
    Other(u32),
}

impl QuestDialogType {
    fn from_code(code: u32) -> Self {
        match code {
            0x1 => Self::Take,
            0x3 => Self::Enquire,
            0x4 => Self::EnquireNext,
            0x6 => Self::EnquireReward,
            0x7 => Self::Reward,
            other => Self::Other(other),
        }
    }

    fn code(self) -> u32 {
        match self {
            Self::Take => 0x1,
            Self::Enquire => 0x3,
            Self::EnquireNext => 0x4,
            Self::EnquireReward => 0x6,
            Self::Reward => 0x7,
            Self::Other(code) => code & 0xff,
        }
    }

    /// Take and reward complete a quest goal; the rest lead up to them
    pub fn completes_goal(self) -> bool {
        matches!(self, Self::Take | Self::Reward)
    }
}

/// A response classified as quest-related
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestResponse {
    pub quest_id: u32,
    pub kind: QuestDialogType,
}

/// Classifier for the host's native id layout
///
/// Quest responses are `0x80_0000 | quest_id << 8 | kind`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardClassifier;

impl ResponseClassifier for StandardClassifier {
    fn quest(&self, dialog_id: u32) -> Option<QuestResponse> {
        if dialog_id & QUEST_FLAG == 0 {
            return None;
        }
        Some(QuestResponse {
            quest_id: (dialog_id ^ QUEST_FLAG) >> 8,
            kind: QuestDialogType::from_code(dialog_id & 0xff),
        })
    }

    fn quest_dialog_id(&self, quest_id: u32, kind: QuestDialogType) -> u32 {
        QUEST_FLAG | (quest_id << 8) | kind.code()
    }

    fn is_teleport_sequence(&self, dialog_id: u32) -> bool {
        UW_TELE_DESTINATIONS.contains(&dialog_id)
    }

    fn teleport_enquire_id(&self) -> u32 {
        UW_TELE_ENQUIRE
    }
}
