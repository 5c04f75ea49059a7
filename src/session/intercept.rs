//! Interception of the host's dialog messages
//!
//! Every message passes through `pre_dispatch` before the host handles it
//! and `post_dispatch` after. The pre-pass decides whether a response send
//! may go ahead; the post-pass mutates the session, and only when nothing
//! blocked the message.

use super::registry::ResponseOption;
use super::DialogSession;
use crate::host::{
    DecodeRequest, DecodeTarget, DecodeTicket, DialogBodyInfo, DialogButtonInfo, EntityService,
    Host, HostMessage, Verdict,
};

/// High byte set on merchant interaction responses
const MERCHANT_RESPONSE_MASK: u32 = 0xFF00_0000;

/// Merchant responses bypass interception entirely
pub fn is_merchant_response(dialog_id: u32) -> bool {
    dialog_id & MERCHANT_RESPONSE_MASK != 0
}

impl DialogSession {
    /// First pass, before the host's own handling
    pub fn pre_dispatch<H: Host>(&mut self, message: &HostMessage, host: &mut H) -> Verdict {
        match message {
            HostMessage::DialogBody(info) if info.is_closed() => {
                self.try_nearby_resend(host);
                Verdict::Pass
            }
            HostMessage::SendResponse { dialog_id } => self.screen_user_send(*dialog_id),
            HostMessage::DialogBody(_)
            | HostMessage::DialogButton(_)
            | HostMessage::FrameDestroyed => Verdict::Pass,
        }
    }

    /// Second pass, after the host's own handling
    pub fn post_dispatch<H: Host>(&mut self, message: &HostMessage, verdict: Verdict, host: &mut H) {
        if verdict.is_blocked() {
            tracing::trace!(message = message.name(), "Blocked elsewhere");
            return;
        }
        match message {
            HostMessage::DialogBody(info) => self.on_dialog_body(info, host),
            HostMessage::DialogButton(info) => self.on_dialog_button(info, host),
            HostMessage::SendResponse { dialog_id } => self.on_send_response(*dialog_id),
            HostMessage::FrameDestroyed => self.close_dialog(),
        }
    }

    fn screen_user_send(&self, dialog_id: u32) -> Verdict {
        if is_merchant_response(dialog_id) {
            return Verdict::Pass;
        }
        if self.is_response_available(dialog_id) {
            Verdict::Pass
        } else {
            tracing::debug!(response_id = dialog_id, "Blocking response not offered by dialog");
            Verdict::Block
        }
    }

    /// The host closed a dialog that may still have queued goals; walk back
    /// to the entity if it is close enough
    fn try_nearby_resend<H: EntityService>(&self, host: &mut H) {
        if self.queue.is_empty() {
            return;
        }
        let target = match self.snapshot.agent_id() {
            0 => self.last_entity,
            agent_id => agent_id,
        };
        if target == 0 {
            return;
        }
        let Some(npc) = host.position(target) else {
            return;
        };
        let Some(me) = host.controlled_entity().and_then(|id| host.position(id)) else {
            return;
        };
        let distance = npc.distance(&me);
        if distance < self.config.interaction_range {
            tracing::info!(
                agent_id = target,
                distance,
                pending = self.queue.len(),
                "Dialog closed with queued responses, re-engaging"
            );
            host.interact(target);
        }
    }

    fn on_dialog_body<H: Host>(&mut self, info: &DialogBodyInfo, host: &mut H) {
        if info.is_closed() {
            self.close_dialog();
            return;
        }
        self.reset();
        if !self.snapshot.replace(info) {
            tracing::warn!("Ignoring dialog body without an entity");
            return;
        }
        tracing::debug!(
            agent_id = info.agent_id,
            generation = self.generation,
            "Dialog opened"
        );
        host.decode(DecodeRequest {
            ticket: DecodeTicket {
                generation: self.generation,
                target: DecodeTarget::Body,
            },
            encoded: self.snapshot.body().clone(),
        });
    }

    fn on_dialog_button<H: Host>(&mut self, info: &DialogButtonInfo, host: &mut H) {
        let option = ResponseOption::from_button(info);
        let encoded = option.message.clone();
        let index = self.registry.push(option);
        host.decode(DecodeRequest {
            ticket: DecodeTicket {
                generation: self.generation,
                target: DecodeTarget::Button(index),
            },
            encoded,
        });
    }

    fn on_send_response(&mut self, dialog_id: u32) {
        if is_merchant_response(dialog_id) || !self.is_response_available(dialog_id) {
            return;
        }
        tracing::debug!(response_id = dialog_id, "Response sent");
        self.reset();
        self.on_response_sent(dialog_id);
    }

    fn close_dialog(&mut self) {
        let agent_id = self.reset();
        if agent_id != 0 {
            self.last_entity = agent_id;
            tracing::debug!(agent_id, "Dialog closed");
        }
    }
}
