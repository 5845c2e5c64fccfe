//! Installer helpers: assemble a game's move list.
//!
//! Games compose their registered moves from per-phase blocks:
//!
//! ```ignore
//! let moves = combine([
//!     add_for_phase(SETUP, vec![deal_config]),
//!     add_ordered_for_phase(PLAY, [draw.into(), play.into(), pass.into()]),
//!     add(vec![concede_config]),
//! ]);
//! let game = Game::new("my-game", moves);
//! ```
//!
//! `add_ordered_for_phase` wraps its groups in an implicit Serial and
//! attaches that group to every member config's `LegalMoveProgression`,
//! so the phase's moves must occur in the declared order.

use std::sync::Arc;

use crate::core::PhaseId;
use crate::progression::Group;

use super::config::MoveConfig;

/// Concatenate per-phase config blocks into one move list.
#[must_use]
pub fn combine(lists: impl IntoIterator<Item = Vec<MoveConfig>>) -> Vec<MoveConfig> {
    lists.into_iter().flatten().collect()
}

/// Register configs with no phase restriction.
#[must_use]
pub fn add(configs: impl IntoIterator<Item = MoveConfig>) -> Vec<MoveConfig> {
    configs.into_iter().collect()
}

/// Register configs legal only in the given phase.
#[must_use]
pub fn add_for_phase(
    phase: PhaseId,
    configs: impl IntoIterator<Item = MoveConfig>,
) -> Vec<MoveConfig> {
    configs
        .into_iter()
        .map(|mut config| {
            let custom = config.custom().clone().with_legal_phases([phase]);
            *config.custom_mut() = custom;
            config
        })
        .collect()
}

/// Register the groups' configs legal only in the given phase, in the
/// given order.
///
/// The groups are wrapped in an implicit Serial that becomes every
/// member config's progression root. The Leaf configs captured inside
/// the group are the pre-attachment snapshots, so the grammar itself
/// stays progression-free.
#[must_use]
pub fn add_ordered_for_phase(
    phase: PhaseId,
    groups: impl IntoIterator<Item = Group>,
) -> Vec<MoveConfig> {
    let serial = Arc::new(Group::serial(groups));

    let mut configs = serial.move_configs();
    for config in &mut configs {
        let custom = config
            .custom()
            .clone()
            .with_legal_phases([phase])
            .with_legal_progression(Arc::clone(&serial));
        *config.custom_mut() = custom;
    }
    configs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::config::testing;
    use crate::progression::Count;

    #[test]
    fn test_combine_flattens() {
        let moves = combine([
            add(vec![testing::config("A")]),
            add(vec![testing::config("B"), testing::config("C")]),
        ]);

        let names: Vec<_> = moves.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_add_for_phase_sets_phases() {
        let moves = add_for_phase(PhaseId::new(3), vec![testing::config("A")]);

        assert_eq!(moves[0].custom().legal_phases(), &[PhaseId::new(3)]);
        assert!(!moves[0].has_progression());
    }

    #[test]
    fn test_add_ordered_for_phase_attaches_serial() {
        let moves = add_ordered_for_phase(
            PhaseId::new(1),
            [
                testing::config("Draw").into(),
                Group::repeat(Count::AtLeast(1), testing::config("Play").into()),
                testing::config("Pass").into(),
            ],
        );

        let names: Vec<_> = moves.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["Draw", "Play", "Pass"]);

        for config in &moves {
            assert_eq!(config.custom().legal_phases(), &[PhaseId::new(1)]);
            assert!(config.has_progression());
        }

        // Every member shares the same implicit Serial root.
        let root = moves[0].custom().legal_progression().unwrap();
        for config in &moves[1..] {
            assert!(Arc::ptr_eq(root, config.custom().legal_progression().unwrap()));
        }

        // The grammar's captured Leaf configs are progression-free
        // snapshots.
        for leaf in root.move_configs() {
            assert!(!leaf.has_progression());
        }
    }
}
