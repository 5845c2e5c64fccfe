//! End-to-end tests driving the simple card game through the manager.

use rust_tbg::games::simple::{apply_fix_ups, phases, stacks, SimpleGameBuilder};
use rust_tbg::{LegalError, PlayerId, ProposeError};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Scenario: four players, two cards each, dealt round-robin from a
/// 52-card draw stack. After the fix-ups settle, every hand holds two
/// cards, the round robin crossed its starter twice, and the state
/// machine is inactive again.
#[test]
fn deal_two_cards_to_four_players() {
    init_logging();
    let (manager, mut state) = SimpleGameBuilder::new().build(42).unwrap();

    let applied = apply_fix_ups(&manager, &mut state).unwrap();

    // 8 deal applications plus the phase transition.
    assert_eq!(applied, 9);
    assert_eq!(state.phase, phases::PLAY);

    for player in PlayerId::all(4) {
        assert_eq!(
            state.players[player]
                .stack(stacks::HAND)
                .unwrap()
                .num_components(),
            2
        );
    }
    assert_eq!(
        state.game.stack(stacks::DRAW).unwrap().num_components(),
        44
    );
    assert_eq!(state.game.round_robin.round_count, 2);
    assert!(!state.game.round_robin.has_started);
}

#[test]
fn records_carry_the_phase_they_were_proposed_in() {
    let (manager, mut state) = SimpleGameBuilder::new().build(42).unwrap();

    apply_fix_ups(&manager, &mut state).unwrap();

    // Every setup record is stamped with the Setup phase, including
    // the transition itself.
    for record in state.records().iter() {
        assert_eq!(record.phase, phases::SETUP);
    }

    let p0 = PlayerId::new(0);
    manager.propose("Draw Card", &mut state, p0).unwrap();
    assert_eq!(state.last_record().unwrap().phase, phases::PLAY);
}

#[test]
fn turn_grammar_is_enforced_across_turns() {
    let (manager, mut state) = SimpleGameBuilder::new().player_count(3).build(7).unwrap();
    apply_fix_ups(&manager, &mut state).unwrap();

    for turn in 0..6 {
        let player = state.current_player;

        // Out-of-order moves are rejected at every turn boundary.
        match manager.is_legal("Pass", &state, player) {
            Err(ProposeError::Legal(LegalError::Progression(_))) => {}
            other => panic!("turn {turn}: expected progression failure, got {other:?}"),
        }

        manager.propose("Draw Card", &mut state, player).unwrap();
        if turn % 2 == 0 {
            manager.propose("Play Card", &mut state, player).unwrap();
        }
        manager.propose("Pass", &mut state, player).unwrap();
    }

    // Three players, six turns: back to the first seat.
    assert_eq!(state.current_player, PlayerId::new(0));
}

#[test]
fn playing_out_of_turn_is_rejected() {
    let (manager, mut state) = SimpleGameBuilder::new().build(42).unwrap();
    apply_fix_ups(&manager, &mut state).unwrap();

    let p1 = PlayerId::new(1);
    let err = manager.is_legal("Draw Card", &state, p1).unwrap_err();
    assert!(matches!(
        err,
        ProposeError::Legal(LegalError::Other(_))
    ));
}

#[test]
fn setup_is_deterministic_per_seed() {
    let (manager_a, mut state_a) = SimpleGameBuilder::new().build(11).unwrap();
    let (manager_b, mut state_b) = SimpleGameBuilder::new().build(11).unwrap();

    apply_fix_ups(&manager_a, &mut state_a).unwrap();
    apply_fix_ups(&manager_b, &mut state_b).unwrap();

    for player in PlayerId::all(4) {
        let hand_a: Vec<_> = state_a.players[player]
            .stack(stacks::HAND)
            .unwrap()
            .components()
            .collect();
        let hand_b: Vec<_> = state_b.players[player]
            .stack(stacks::HAND)
            .unwrap()
            .components()
            .collect();
        assert_eq!(hand_a, hand_b);
    }
}

#[test]
fn smaller_tables_deal_correctly() {
    let (manager, mut state) = SimpleGameBuilder::new()
        .player_count(2)
        .starting_hand_size(5)
        .deck_size(20)
        .build(3)
        .unwrap();

    apply_fix_ups(&manager, &mut state).unwrap();

    for player in PlayerId::all(2) {
        assert_eq!(
            state.players[player]
                .stack(stacks::HAND)
                .unwrap()
                .num_components(),
            5
        );
    }
    assert_eq!(
        state.game.stack(stacks::DRAW).unwrap().num_components(),
        10
    );
    assert_eq!(state.game.round_robin.round_count, 5);
}
