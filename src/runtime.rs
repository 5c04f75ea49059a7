//! Runtime for driving a dialog session
//!
//! One tokio task owns the session and the host. Everything else talks to
//! it through a `RuntimeHandle`: host messages, decode completions, caller
//! requests and snapshot queries all arrive on the same channel, and the
//! session is ticked on a fixed interval in between.

mod executor;

pub use executor::DialogRuntime;

use crate::error::RuntimeError;
use crate::host::{DecodeTicket, HostMessage};
use crate::session::SessionView;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Events processed by the runtime task
#[derive(Debug)]
pub enum RuntimeEvent {
    /// A message from the host's UI message bus
    Host(HostMessage),
    /// The host finished decoding a body or button label
    Decoded { ticket: DecodeTicket, text: String },
    /// Queue responses to be sent once offered
    Request { dialog_ids: Vec<u32> },
    /// Re-dispatch the current dialog
    Reload,
    Snapshot(oneshot::Sender<SessionView>),
}

impl RuntimeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeEvent::Host(message) => message.name(),
            RuntimeEvent::Decoded { .. } => "decoded",
            RuntimeEvent::Request { .. } => "request",
            RuntimeEvent::Reload => "reload",
            RuntimeEvent::Snapshot(_) => "snapshot",
        }
    }
}

/// Receiving half of the runtime channel, consumed by `DialogRuntime::new`
#[derive(Debug)]
pub struct EventReceiver {
    pub(crate) rx: mpsc::Receiver<RuntimeEvent>,
    pub(crate) cancel: CancellationToken,
}

/// Handle to interact with a running dialog runtime
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    event_tx: mpsc::Sender<RuntimeEvent>,
    cancel: CancellationToken,
}

/// Non-blocking decode completions for host callbacks on the runtime task
#[derive(Debug, Clone)]
pub struct DecodeSender {
    event_tx: mpsc::WeakSender<RuntimeEvent>,
}

impl DecodeSender {
    pub fn try_decoded(
        &self,
        ticket: DecodeTicket,
        text: impl Into<String>,
    ) -> Result<(), RuntimeError> {
        let event_tx = self.event_tx.upgrade().ok_or(RuntimeError::Stopped)?;
        event_tx
            .try_send(RuntimeEvent::Decoded {
                ticket,
                text: text.into(),
            })
            .map_err(|_| RuntimeError::Stopped)
    }
}

/// Create the channel connecting handles to a runtime
pub fn channel(capacity: usize) -> (RuntimeHandle, EventReceiver) {
    let (event_tx, rx) = mpsc::channel(capacity);
    let cancel = CancellationToken::new();
    (
        RuntimeHandle {
            event_tx,
            cancel: cancel.clone(),
        },
        EventReceiver { rx, cancel },
    )
}

impl RuntimeHandle {
    async fn send(&self, event: RuntimeEvent) -> Result<(), RuntimeError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| RuntimeError::Stopped)
    }

    /// Deliver a host message through both interception passes
    pub async fn dispatch(&self, message: HostMessage) -> Result<(), RuntimeError> {
        self.send(RuntimeEvent::Host(message)).await
    }

    pub async fn decoded(
        &self,
        ticket: DecodeTicket,
        text: impl Into<String>,
    ) -> Result<(), RuntimeError> {
        self.send(RuntimeEvent::Decoded {
            ticket,
            text: text.into(),
        })
        .await
    }

    /// Decode sink for a host owned by the runtime
    ///
    /// Holds the channel weakly, so the runtime still stops once every
    /// handle is dropped.
    pub fn decoder(&self) -> DecodeSender {
        DecodeSender {
            event_tx: self.event_tx.downgrade(),
        }
    }

    pub async fn request(&self, dialog_ids: &[u32]) -> Result<(), RuntimeError> {
        self.send(RuntimeEvent::Request {
            dialog_ids: dialog_ids.to_vec(),
        })
        .await
    }

    pub async fn reload(&self) -> Result<(), RuntimeError> {
        self.send(RuntimeEvent::Reload).await
    }

    /// Copy of the session state as of the time the runtime handles this
    pub async fn snapshot(&self) -> Result<SessionView, RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RuntimeEvent::Snapshot(reply_tx)).await?;
        reply_rx.await.map_err(|_| RuntimeError::Stopped)
    }

    /// Stop the runtime; pending events are dropped
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.event_tx.is_closed()
    }
}
