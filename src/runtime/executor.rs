//! Dialog runtime executor

use super::{EventReceiver, RuntimeEvent};
use crate::host::{Host, HostMessage, MessageBus, Verdict};
use crate::session::{DialogSession, TickOutcome};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Event loop owning one session and the host it talks to
pub struct DialogRuntime<H>
where
    H: Host + MessageBus + Send + 'static,
{
    session: DialogSession,
    host: H,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    cancel: CancellationToken,
}

impl<H> DialogRuntime<H>
where
    H: Host + MessageBus + Send + 'static,
{
    pub fn new(session: DialogSession, host: H, events: EventReceiver) -> Self {
        Self {
            session,
            host,
            event_rx: events.rx,
            cancel: events.cancel,
        }
    }

    /// Process events and ticks until shut down; returns the final session
    pub async fn run(mut self) -> DialogSession {
        // tokio rejects a zero period
        let tick_interval = self
            .session
            .config()
            .tick_interval
            .max(Duration::from_millis(1));
        tracing::info!(
            tick_ms = u64::try_from(tick_interval.as_millis()).unwrap_or(u64::MAX),
            "Starting dialog runtime"
        );

        let mut ticker = tokio::time::interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                event = self.event_rx.recv() => match event {
                    Some(event) => self.process_event(event),
                    None => break,
                },
                _ = ticker.tick() => self.tick(Instant::now()),
            }
        }

        tracing::info!(
            generation = self.session.generation(),
            pending = self.session.pending_requests().len(),
            "Dialog runtime stopped"
        );
        self.session
    }

    fn process_event(&mut self, event: RuntimeEvent) {
        tracing::trace!(event = event.name(), "Processing event");
        match event {
            RuntimeEvent::Host(message) => {
                self.dispatch(&message);
            }
            RuntimeEvent::Decoded { ticket, text } => {
                self.session.on_decoded(ticket, &text);
            }
            RuntimeEvent::Request { dialog_ids } => {
                self.session.send_responses_at(&dialog_ids, Instant::now());
            }
            RuntimeEvent::Reload => {
                let messages = self.session.reload_messages();
                tracing::debug!(count = messages.len(), "Reloading dialog");
                for message in &messages {
                    self.dispatch(message);
                }
            }
            RuntimeEvent::Snapshot(reply) => {
                // The caller may have given up waiting
                let _ = reply.send(self.session.view());
            }
        }
    }

    /// Run a message through the session's passes and the host's own handlers
    fn dispatch(&mut self, message: &HostMessage) {
        let verdict = self.session.pre_dispatch(message, &mut self.host);
        let verdict = self.host.forward(message, verdict);
        if verdict == Verdict::Block {
            tracing::debug!(message = message.name(), "Message blocked");
        }
        self.session.post_dispatch(message, verdict, &mut self.host);
    }

    fn tick(&mut self, now: Instant) {
        match self.session.tick(&mut self.host, now) {
            TickOutcome::Idle => {}
            outcome => tracing::debug!(?outcome, "Scheduler acted"),
        }
    }
}
