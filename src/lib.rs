//! Dialog Pilot - dialog session reconstruction and automated responses
//!
//! Intercepts the host's dialog UI messages, rebuilds the active dialog
//! (body text and offered responses) and sends queued responses once the
//! host actually offers them.

pub mod config;
pub mod error;
pub mod host;
pub mod replay;
pub mod runtime;
pub mod session;
pub mod text;

pub use config::DialogConfig;
pub use error::{DialogError, RuntimeError, TraceError};
pub use host::{
    DecodeRequest, DecodeTarget, DecodeTicket, DialogBodyInfo, DialogButtonInfo, Host,
    HostMessage, ResponseClassifier, StandardClassifier, Verdict,
};
pub use runtime::{DecodeSender, DialogRuntime, RuntimeHandle};
pub use session::{DialogSession, ResponseOption, SessionView, TickOutcome};
pub use text::EncodedText;
