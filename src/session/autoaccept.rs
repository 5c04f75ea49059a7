//! Heuristics for "take whatever the dialog offers"

use super::DialogSession;
use crate::host::{EffectLookup, EntityService, QuestDialogType};
use std::time::Instant;

/// Encoded name of the Luxon faction priest
const LUXON_PRIEST: [u16; 4] = [0x3F69, 0xBAA2, 0xF307, 0x2CC1];
/// Encoded name of the Kurzick faction priest
const KURZICK_PRIEST: [u16; 4] = [0x3E98, 0xDA05, 0xAA38, 0x045D];

pub const BLESSING_OF_THE_LUXONS: u32 = 1947;
pub const BLESSING_OF_THE_KURZICKS: u32 = 593;

/// Interested > Thanks > Accept > Thanks
const LUXON_BOUNTY_RESPONSES: [u32; 4] = [0x85, 0x86, 0x2, 0x84];
/// Interested > Thanks > Let's talk this over > Bribe > Thanks
const KURZICK_BOUNTY_RESPONSES: [u32; 5] = [0x85, 0x86, 0x81, 0x2, 0x84];

/// Icon the host puts on bounty buttons
const BOUNTY_ICON: u32 = 0x1b;

impl DialogSession {
    /// Queue take and reward for the best quest on offer
    ///
    /// Returns the chosen quest id, or 0 if the dialog offers none.
    pub fn accept_first_available_quest(&mut self, now: Instant) -> u32 {
        let mut available: Vec<u32> = Vec::new();
        for option in self.registry.options() {
            let Some(quest) = self.classifier.quest(option.dialog_id) else {
                continue;
            };
            if matches!(quest.kind, QuestDialogType::Other(_)) {
                continue;
            }
            if !available.contains(&quest.quest_id) {
                available.push(quest.quest_id);
            }
        }

        let chosen = self
            .config
            .priority_quests
            .iter()
            .copied()
            .find(|quest_id| available.contains(quest_id))
            .or_else(|| available.first().copied());
        let Some(quest_id) = chosen else {
            return 0;
        };

        tracing::info!(quest_id, "Accepting first available quest");
        let take = self.classifier.quest_dialog_id(quest_id, QuestDialogType::Take);
        let reward = self.classifier.quest_dialog_id(quest_id, QuestDialogType::Reward);
        self.send_responses_at(&[take, reward], now);
        quest_id
    }

    /// Queue the responses that take the bounty this dialog offers
    ///
    /// The host lets faction blessings be taken repeatedly, so the faction
    /// priests are skipped while their blessing is active. Returns 1 if
    /// anything was queued, 0 otherwise.
    pub fn accept_first_available_bounty<H>(&mut self, host: &H, now: Instant) -> u32
    where
        H: EntityService + EffectLookup + ?Sized,
    {
        if self.registry.is_empty() {
            return 0;
        }
        let Some(name) = host.encoded_name(self.snapshot.agent_id()) else {
            return 0;
        };

        if name.units() == LUXON_PRIEST {
            if host.has_effect(BLESSING_OF_THE_LUXONS) {
                tracing::debug!("Luxon blessing already active");
                return 0;
            }
            self.send_responses_at(&LUXON_BOUNTY_RESPONSES, now);
            return 1;
        }
        if name.units() == KURZICK_PRIEST {
            if host.has_effect(BLESSING_OF_THE_KURZICKS) {
                tracing::debug!("Kurzick blessing already active");
                return 0;
            }
            self.send_responses_at(&KURZICK_BOUNTY_RESPONSES, now);
            return 1;
        }

        // Other bounties vanish from the dialog once taken
        let bounty = self
            .registry
            .options()
            .iter()
            .find(|option| option.icon == BOUNTY_ICON && option.skill_id.is_some())
            .map(|option| option.dialog_id);
        match bounty {
            Some(dialog_id) => {
                tracing::info!(response_id = dialog_id, "Accepting bounty");
                self.send_response_at(dialog_id, now);
                1
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DialogConfig, QUEST_UW_ESCORT, QUEST_UW_RESTORE};
    use crate::host::testing::{add_button, open_dialog, MockHost};
    use crate::host::traits::Position;
    use crate::host::{DialogButtonInfo, ResponseClassifier, StandardClassifier};
    use crate::text::EncodedText;

    fn quest_response(quest_id: u32, kind: QuestDialogType) -> u32 {
        StandardClassifier.quest_dialog_id(quest_id, kind)
    }

    fn priest_host(name: [u16; 4]) -> MockHost {
        MockHost::new().with_entity(40, Position::default(), EncodedText::from_units(&name))
    }

    fn pending(session: &DialogSession) -> Vec<u32> {
        session.pending_requests().iter().map(|(id, _)| id).collect()
    }

    #[test]
    fn test_first_discovered_quest_wins() {
        let mut session = DialogSession::default();
        let mut host = MockHost::new();
        open_dialog(
            &mut session,
            &mut host,
            12,
            "Hello",
            &[
                0x84,
                quest_response(30, QuestDialogType::EnquireReward),
                quest_response(20, QuestDialogType::Enquire),
            ],
        );
        let now = Instant::now();
        assert_eq!(session.accept_first_available_quest(now), 30);
        assert!(session
            .pending_requests()
            .contains(quest_response(30, QuestDialogType::Take)));
        assert!(session
            .pending_requests()
            .contains(quest_response(30, QuestDialogType::Reward)));
    }

    #[test]
    fn test_priority_quests_are_preferred() {
        let mut session = DialogSession::default();
        let mut host = MockHost::new();
        open_dialog(
            &mut session,
            &mut host,
            12,
            "Reaper",
            &[
                quest_response(30, QuestDialogType::Enquire),
                quest_response(QUEST_UW_ESCORT, QuestDialogType::Enquire),
                quest_response(QUEST_UW_RESTORE, QuestDialogType::Enquire),
            ],
        );
        assert_eq!(session.accept_first_available_quest(Instant::now()), QUEST_UW_RESTORE);
    }

    #[test]
    fn test_configured_priorities() {
        let config = DialogConfig {
            priority_quests: vec![20],
            ..DialogConfig::default()
        };
        let mut session = DialogSession::with_config(config);
        let mut host = MockHost::new();
        open_dialog(
            &mut session,
            &mut host,
            12,
            "Hello",
            &[
                quest_response(30, QuestDialogType::Take),
                quest_response(20, QuestDialogType::Reward),
            ],
        );
        assert_eq!(session.accept_first_available_quest(Instant::now()), 20);
    }

    #[test]
    fn test_no_quest_offered() {
        let mut session = DialogSession::default();
        let mut host = MockHost::new();
        open_dialog(
            &mut session,
            &mut host,
            12,
            "Hello",
            &[0x84, quest_response(30, QuestDialogType::Other(0x8))],
        );
        assert_eq!(session.accept_first_available_quest(Instant::now()), 0);
        assert!(session.pending_requests().is_empty());
    }

    #[test]
    fn test_luxon_priest_sequence() {
        let mut session = DialogSession::default();
        let mut host = priest_host(LUXON_PRIEST);
        open_dialog(&mut session, &mut host, 40, "Blessings", &[0x85]);

        assert_eq!(session.accept_first_available_bounty(&host, Instant::now()), 1);
        assert_eq!(pending(&session), vec![0x2, 0x84, 0x85, 0x86]);
    }

    #[test]
    fn test_kurzick_priest_sequence() {
        let mut session = DialogSession::default();
        let mut host = priest_host(KURZICK_PRIEST);
        open_dialog(&mut session, &mut host, 40, "Blessings", &[0x85]);

        let now = Instant::now();
        assert_eq!(session.accept_first_available_bounty(&host, now), 1);
        assert_eq!(pending(&session), vec![0x2, 0x81, 0x84, 0x85, 0x86]);
        assert!(session.pending_requests().iter().all(|(_, at)| at == now));
    }

    #[test]
    fn test_active_blessing_blocks_repeat() {
        let mut session = DialogSession::default();
        let mut host = priest_host(KURZICK_PRIEST).with_effect(BLESSING_OF_THE_KURZICKS);
        open_dialog(&mut session, &mut host, 40, "Blessings", &[0x85]);

        assert_eq!(session.accept_first_available_bounty(&host, Instant::now()), 0);
        assert!(session.pending_requests().is_empty());
    }

    #[test]
    fn test_active_luxon_blessing_blocks_repeat() {
        let mut session = DialogSession::default();
        let mut host = priest_host(LUXON_PRIEST).with_effect(BLESSING_OF_THE_LUXONS);
        open_dialog(&mut session, &mut host, 40, "Blessings", &[0x85]);

        assert_eq!(session.accept_first_available_bounty(&host, Instant::now()), 0);
        assert!(session.pending_requests().is_empty());
    }

    #[test]
    fn test_other_faction_blessing_does_not_block() {
        let mut session = DialogSession::default();
        let mut host = priest_host(LUXON_PRIEST).with_effect(BLESSING_OF_THE_KURZICKS);
        open_dialog(&mut session, &mut host, 40, "Blessings", &[0x85]);

        assert_eq!(session.accept_first_available_bounty(&host, Instant::now()), 1);
    }

    #[test]
    fn test_generic_bounty_button() {
        let mut session = DialogSession::default();
        let mut host =
            MockHost::new().with_entity(50, Position::default(), EncodedText::from("Scout"));
        open_dialog(&mut session, &mut host, 50, "Bounties", &[0x84]);

        // Bounty icon but no skill: not a bounty
        let mut decoy = DialogButtonInfo::new(0xA0, EncodedText::plain("Decoy"));
        decoy.button_icon = BOUNTY_ICON;
        add_button(&mut session, &mut host, decoy);

        let mut bounty = DialogButtonInfo::new(0xA1, EncodedText::plain("Take bounty"));
        bounty.button_icon = BOUNTY_ICON;
        bounty.skill_id = 0x2a;
        add_button(&mut session, &mut host, bounty);

        assert_eq!(session.accept_first_available_bounty(&host, Instant::now()), 1);
        assert_eq!(pending(&session), vec![0xA1]);
    }

    #[test]
    fn test_no_bounty_offered() {
        let mut session = DialogSession::default();
        let mut host =
            MockHost::new().with_entity(50, Position::default(), EncodedText::from("Scout"));
        open_dialog(&mut session, &mut host, 50, "Hello", &[0x84]);
        assert_eq!(session.accept_first_available_bounty(&host, Instant::now()), 0);
    }

    #[test]
    fn test_bounty_without_buttons() {
        let mut session = DialogSession::default();
        let mut host = priest_host(LUXON_PRIEST);
        open_dialog(&mut session, &mut host, 40, "Blessings", &[]);
        assert_eq!(session.accept_first_available_bounty(&host, Instant::now()), 0);
    }

    #[test]
    fn test_bounty_falls_back_from_tick() {
        let mut session = DialogSession::default();
        let mut host = priest_host(LUXON_PRIEST);
        open_dialog(&mut session, &mut host, 40, "Blessings", &[0x85]);
        let now = Instant::now();
        session.send_response_at(0, now);

        assert_eq!(
            session.tick(&mut host, now),
            crate::session::TickOutcome::AutoAccepted { quest_id: 0, bounty: true }
        );
        assert_eq!(pending(&session), vec![0x2, 0x84, 0x85, 0x86]);
    }
}
