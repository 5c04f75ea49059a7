//! Queued responses
//!
//! Callers ask for a response and the scheduler sends it once the dialog
//! offers it. Requests implying prerequisite responses queue those too,
//! sharing the request's timestamp so they expire and cascade together.

use super::DialogSession;
use crate::host::{Host, HostMessage, QuestDialogType, ResponseClassifier};
use std::collections::BTreeMap;
use std::time::Instant;

/// What a single scheduler tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to act on
    Idle,
    /// A request outlived the timeout and was dropped
    Expired(u32),
    /// A "take first available" request ran the auto-accept heuristics
    AutoAccepted { quest_id: u32, bounty: bool },
    /// A queued response was sent
    Sent(u32),
}

/// Pending response ids and when they were requested
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseQueue {
    pending: BTreeMap<u32, Instant>,
}

impl ResponseQueue {
    /// Queue a response and whatever it implies; the latest request wins
    pub fn enqueue(&mut self, dialog_id: u32, at: Instant, classifier: &dyn ResponseClassifier) {
        self.pending.insert(dialog_id, at);

        if let Some(quest) = classifier.quest(dialog_id) {
            let prerequisites = match quest.kind {
                QuestDialogType::Take => [QuestDialogType::EnquireNext, QuestDialogType::Enquire],
                QuestDialogType::Reward => {
                    [QuestDialogType::EnquireNext, QuestDialogType::EnquireReward]
                }
                _ => return,
            };
            for kind in prerequisites {
                self.pending
                    .insert(classifier.quest_dialog_id(quest.quest_id, kind), at);
            }
        }

        if let Some(enquire) = classifier.profession_enquire(dialog_id) {
            self.pending.insert(enquire, at);
            return;
        }

        if classifier.is_teleport_sequence(dialog_id) {
            self.pending.insert(classifier.teleport_enquire_id(), at);
            self.pending
                .insert(classifier.teleport_prerequisite(dialog_id), at);
        }
    }

    /// Drop a sent response and the requests queued alongside it
    pub fn complete(&mut self, dialog_id: u32, classifier: &dyn ResponseClassifier) {
        let queued_at = self.pending.remove(&dialog_id);

        if let Some(quest) = classifier.quest(dialog_id) {
            if !quest.kind.completes_goal() {
                return;
            }
            if let Some(queued_at) = queued_at {
                // Only siblings from the same request; a later request for
                // the same quest keeps its own entries
                self.pending.retain(|&other, &mut at| {
                    at != queued_at
                        || classifier
                            .quest(other)
                            .is_none_or(|q| q.quest_id != quest.quest_id)
                });
            }
        }

        if classifier.is_teleport_sequence(dialog_id) {
            self.pending.remove(&classifier.teleport_enquire_id());
            self.pending
                .remove(&classifier.teleport_prerequisite(dialog_id));
        }
    }

    pub fn remove(&mut self, dialog_id: u32) -> Option<Instant> {
        self.pending.remove(&dialog_id)
    }

    pub fn get(&self, dialog_id: u32) -> Option<Instant> {
        self.pending.get(&dialog_id).copied()
    }

    pub fn contains(&self, dialog_id: u32) -> bool {
        self.pending.contains_key(&dialog_id)
    }

    /// Pending requests in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, Instant)> + '_ {
        self.pending.iter().map(|(&id, &at)| (id, at))
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

impl DialogSession {
    /// Act on at most one queued request
    pub fn tick<H: Host>(&mut self, host: &mut H, now: Instant) -> TickOutcome {
        let pending: Vec<(u32, Instant)> = self.queue.iter().collect();
        for (dialog_id, queued_at) in pending {
            if now.saturating_duration_since(queued_at) > self.config.queue_timeout {
                self.queue.remove(dialog_id);
                tracing::debug!(response_id = dialog_id, "Queued response timed out");
                return TickOutcome::Expired(dialog_id);
            }
            if self.snapshot.agent_id() == 0 {
                continue;
            }
            if dialog_id == 0 {
                // Take, or hand in, whatever the dialog offers first
                self.queue.remove(0);
                let quest_id = self.accept_first_available_quest(now);
                let bounty = quest_id == 0 && self.accept_first_available_bounty(&*host, now) != 0;
                return TickOutcome::AutoAccepted { quest_id, bounty };
            }
            if self.try_send(dialog_id, host) {
                return TickOutcome::Sent(dialog_id);
            }
        }
        TickOutcome::Idle
    }

    /// Send through the same interception passes a host-originated send takes
    fn try_send<H: Host>(&mut self, dialog_id: u32, host: &mut H) -> bool {
        if !self.is_response_available(dialog_id) {
            return false;
        }
        let message = HostMessage::SendResponse { dialog_id };
        let verdict = self.pre_dispatch(&message, host);
        if verdict.is_blocked() || !host.send_response(dialog_id) {
            return false;
        }
        self.post_dispatch(&message, verdict, host);
        self.queue.remove(dialog_id);
        tracing::info!(response_id = dialog_id, "Sent queued response");
        true
    }
}
