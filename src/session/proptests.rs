//! Property-based tests for the dialog session
//!
//! These tests verify key invariants hold across arbitrary message streams.

use super::*;
use crate::host::testing::{deliver, MockHost};
use crate::host::{DialogButtonInfo, QuestDialogType, Verdict};
use proptest::prelude::*;
use std::time::Duration;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_dialog_id() -> impl Strategy<Value = u32> {
    prop_oneof![
        0x80u32..0x90,
        (1u32..40, 0u32..8).prop_map(|(quest, kind)| 0x0080_0000 | (quest << 8) | kind),
        (1u32..10).prop_map(|profession| (profession << 8) | 0x84),
        any::<u32>(),
    ]
}

fn arb_body() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ]{0,20}",
        ("[a-zA-Z ]{0,10}", 0u32..1000, "[a-zA-Z ]{1,10}")
            .prop_map(|(prefix, id, label)| format!("{prefix}<a={id}>{label}</a>")),
        "[a-zA-Z<>=0-9 ]{0,30}",
    ]
}

fn arb_message() -> impl Strategy<Value = HostMessage> {
    prop_oneof![
        (0u32..4, arb_body()).prop_map(|(agent_id, body)| HostMessage::DialogBody(
            DialogBodyInfo::new(agent_id, EncodedText::from(body.as_str()))
        )),
        arb_dialog_id().prop_map(|dialog_id| HostMessage::DialogButton(DialogButtonInfo::new(
            dialog_id,
            EncodedText::plain("option")
        ))),
        arb_dialog_id().prop_map(|dialog_id| HostMessage::SendResponse { dialog_id }),
        Just(HostMessage::FrameDestroyed),
    ]
}

fn run_messages(messages: &[HostMessage]) -> (DialogSession, MockHost) {
    let mut session = DialogSession::default();
    let mut host = MockHost::new();
    for message in messages {
        deliver(&mut session, &mut host, message);
    }
    (session, host)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_unoffered_send_is_blocked_and_inert(
        messages in proptest::collection::vec(arb_message(), 0..20),
        dialog_id in arb_dialog_id(),
    ) {
        let (mut session, mut host) = run_messages(&messages);
        prop_assume!(!is_merchant_response(dialog_id));
        prop_assume!(!session.responses().iter().any(|o| o.dialog_id == dialog_id));

        let before = session.view();
        let generation = session.generation();
        let message = HostMessage::SendResponse { dialog_id };
        let verdict = session.pre_dispatch(&message, &mut host);
        prop_assert_eq!(verdict, Verdict::Block);
        session.post_dispatch(&message, verdict, &mut host);
        prop_assert_eq!(session.view(), before);
        prop_assert_eq!(session.generation(), generation);
    }

    #[test]
    fn prop_reset_is_idempotent(messages in proptest::collection::vec(arb_message(), 0..20)) {
        let (mut session, _) = run_messages(&messages);
        session.reset();
        let once = session.view();
        session.reset();
        let twice = session.view();
        prop_assert!(once.responses.is_empty());
        prop_assert_eq!(once.agent_id, 0);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_open_dialog_has_entity(messages in proptest::collection::vec(arb_message(), 0..30)) {
        let (session, _) = run_messages(&messages);
        if !session.encoded_body().is_empty() {
            prop_assert_ne!(session.dialog_entity(), 0);
        }
    }

    #[test]
    fn prop_stale_decodes_never_apply(
        messages in proptest::collection::vec(arb_message(), 1..20),
        body in arb_body(),
    ) {
        let (mut session, mut host) = run_messages(&messages);
        let stale: Vec<_> = host
            .decode_requests
            .drain(..)
            .filter(|r| r.ticket.generation != session.generation())
            .collect();
        let before = session.view();
        for request in stale {
            prop_assert!(!session.on_decoded(request.ticket, &body));
        }
        prop_assert_eq!(session.view(), before);
    }

    #[test]
    fn prop_markup_never_panics(body in ".{0,64}") {
        let _ = parse_embedded_responses(&body);
    }

    #[test]
    fn prop_enqueue_shares_timestamp(dialog_id in arb_dialog_id(), offset in 0u64..10_000) {
        let mut session = DialogSession::default();
        let at = Instant::now() + Duration::from_millis(offset);
        session.send_response_at(dialog_id, at);
        prop_assert!(session.pending_requests().contains(dialog_id));
        prop_assert!(session.pending_requests().iter().all(|(_, queued)| queued == at));
    }

    #[test]
    fn prop_goal_sent_clears_its_request(quest in 1u32..500, reward in any::<bool>()) {
        let mut session = DialogSession::default();
        let kind = if reward { QuestDialogType::Reward } else { QuestDialogType::Take };
        let goal = session.classifier().quest_dialog_id(quest, kind);
        session.send_response_at(goal, Instant::now());
        session.on_response_sent(goal);
        prop_assert!(session.pending_requests().is_empty());
        prop_assert_eq!(session.last_sent_response(), goal);
    }

    #[test]
    fn prop_tick_acts_at_most_once(
        ids in proptest::collection::vec(arb_dialog_id(), 1..6),
        offered in proptest::collection::vec(arb_dialog_id(), 0..6),
    ) {
        let mut session = DialogSession::default();
        let mut host = MockHost::new();
        deliver(
            &mut session,
            &mut host,
            &HostMessage::DialogBody(DialogBodyInfo::new(3, EncodedText::from("Hi"))),
        );
        for dialog_id in offered {
            deliver(
                &mut session,
                &mut host,
                &HostMessage::DialogButton(DialogButtonInfo::new(dialog_id, EncodedText::plain("x"))),
            );
        }
        let now = Instant::now();
        session.send_responses_at(&ids, now);
        session.tick(&mut host, now);
        prop_assert!(host.sent.len() <= 1);
    }
}
