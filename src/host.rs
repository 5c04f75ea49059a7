//! Host-facing surface
//!
//! Message types delivered by the host's UI message bus, and the traits the
//! session uses to talk back to the host.

mod classifier;
mod message;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use classifier::{QuestDialogType, QuestResponse, StandardClassifier, UW_TELE_ENQUIRE};
pub use message::{
    DecodeRequest, DecodeTarget, DecodeTicket, DialogBodyInfo, DialogButtonInfo, HostMessage,
    Verdict, NO_SKILL,
};
pub use traits::*;
