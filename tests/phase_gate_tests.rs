//! Phase-gate integration tests.
//!
//! Covers the flat-enum rejection case and ancestor resolution with a
//! tree of nested phases.

use rust_tbg::{
    factory, AutoConfigurer, CustomConfig, Game, GameDelegate, GameManager, GameState, LegalError,
    Move, MoveInfo, PhaseEnum, PhaseId, PlayerId, ProposeError,
};

/// A move that records nothing and always applies cleanly.
#[derive(Default)]
struct TestMove {
    info: MoveInfo,
}

impl Move for TestMove {
    fn info(&self) -> &MoveInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut MoveInfo {
        &mut self.info
    }

    fn fallback_name(&self, _delegate: &dyn GameDelegate) -> String {
        "Test Move".to_string()
    }

    fn apply(
        &self,
        _manager: &GameManager,
        _state: &mut GameState,
    ) -> Result<(), rust_tbg::ApplyError> {
        Ok(())
    }
}

struct PhasedDelegate {
    phases: PhaseEnum,
}

impl GameDelegate for PhasedDelegate {
    fn phase_enum(&self) -> Option<&PhaseEnum> {
        Some(&self.phases)
    }
}

fn flat_delegate() -> PhasedDelegate {
    PhasedDelegate {
        phases: PhaseEnum::new()
            .add_phase(PhaseId::new(1), "1")
            .add_phase(PhaseId::new(2), "2")
            .add_phase(PhaseId::new(3), "3"),
    }
}

/// Tree: root 0 with children 1 and 2.
fn tree_delegate() -> PhasedDelegate {
    let root = PhaseId::new(0);
    PhasedDelegate {
        phases: PhaseEnum::new()
            .add_phase(root, "Root")
            .add_subphase(PhaseId::new(1), "One", root)
            .add_subphase(PhaseId::new(2), "Two", root),
    }
}

fn install(
    delegate: PhasedDelegate,
    auto_delegate: PhasedDelegate,
    legal_phases: Vec<PhaseId>,
) -> GameManager {
    let auto = AutoConfigurer::new(&auto_delegate);
    let config = auto.must_config(
        factory(TestMove::default),
        CustomConfig::new().with_legal_phases(legal_phases),
    );
    GameManager::new(
        Game::new("phase-gate-test", vec![config]),
        Box::new(delegate),
        GameState::new(2, 42),
    )
    .unwrap()
}

#[test]
fn flat_enum_rejects_out_of_phase_move() {
    // Game in phase 2; the move is legal in phases 1 and 3.
    let manager = install(
        flat_delegate(),
        flat_delegate(),
        vec![PhaseId::new(1), PhaseId::new(3)],
    );
    let mut state = GameState::new(2, 42);
    state.phase = PhaseId::new(2);

    let err = manager
        .is_legal("Test Move", &state, PlayerId::new(0))
        .unwrap_err();

    // The failure names the phase the game is actually in.
    assert_eq!(
        err,
        ProposeError::Legal(LegalError::NotInPhase {
            phase: "2".to_string()
        })
    );
}

#[test]
fn flat_enum_accepts_in_phase_move() {
    let manager = install(
        flat_delegate(),
        flat_delegate(),
        vec![PhaseId::new(1), PhaseId::new(3)],
    );
    let mut state = GameState::new(2, 42);
    state.phase = PhaseId::new(3);

    assert!(manager
        .is_legal("Test Move", &state, PlayerId::new(0))
        .is_ok());
}

#[test]
fn tree_enum_resolves_ancestors() {
    // The move is legal in the root phase; the game sits in leaf 2.
    // ancestors(2) = [0, 2], which intersects {0}.
    let manager = install(tree_delegate(), tree_delegate(), vec![PhaseId::new(0)]);
    let mut state = GameState::new(2, 42);
    state.phase = PhaseId::new(2);

    assert!(manager
        .is_legal("Test Move", &state, PlayerId::new(0))
        .is_ok());
}

#[test]
fn tree_enum_rejects_sibling_leaf() {
    // Legal only in leaf 1; the game sits in leaf 2, whose ancestor
    // chain [0, 2] misses it.
    let manager = install(tree_delegate(), tree_delegate(), vec![PhaseId::new(1)]);
    let mut state = GameState::new(2, 42);
    state.phase = PhaseId::new(2);

    let err = manager
        .is_legal("Test Move", &state, PlayerId::new(0))
        .unwrap_err();

    assert_eq!(
        err,
        ProposeError::Legal(LegalError::NotInPhase {
            phase: "Two".to_string()
        })
    );
}

#[test]
fn empty_legal_phases_passes_everywhere() {
    let manager = install(flat_delegate(), flat_delegate(), vec![]);
    let mut state = GameState::new(2, 42);

    for raw in [1, 2, 3, 99] {
        state.phase = PhaseId::new(raw);
        assert!(manager
            .is_legal("Test Move", &state, PlayerId::new(0))
            .is_ok());
    }
}
