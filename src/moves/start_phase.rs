//! The StartPhase template: a pure phase transition.

use log::debug;

use crate::core::{GameState, PhaseId, PlayerId};
use crate::manager::{GameDelegate, GameManager};

use super::base::Move;
use super::config::MoveInfo;
use super::error::{ApplyError, ConfigError, LegalError};

/// Writes the configured `PhaseToStart` to game state.
///
/// Requires the delegate's phase-setter capability; installation fails
/// without it. With a phase tree, the target must be a leaf.
#[derive(Default)]
pub struct StartPhase {
    info: MoveInfo,
}

impl StartPhase {
    /// Create the template. The target phase comes from the
    /// `PhaseToStart` option.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn target(&self) -> Result<PhaseId, ApplyError> {
        self.info
            .custom()
            .phase_to_start()
            .ok_or(ApplyError::MissingOption {
                option: "PhaseToStart",
            })
    }
}

impl Move for StartPhase {
    fn info(&self) -> &MoveInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut MoveInfo {
        &mut self.info
    }

    fn fallback_name(&self, delegate: &dyn GameDelegate) -> String {
        match self.info.custom().phase_to_start() {
            Some(phase) => {
                let name = match delegate.phase_enum() {
                    Some(phases) => phases.display_name(phase),
                    None => phase.to_string(),
                };
                format!("Start Phase {name}")
            }
            None => "Start Phase".to_string(),
        }
    }

    fn fallback_help_text(&self) -> String {
        "Advances the game into its configured phase.".to_string()
    }

    fn default_fix_up(&self) -> bool {
        true
    }

    fn validate(&self, manager: &GameManager) -> Result<(), ConfigError> {
        let target = self
            .info
            .custom()
            .phase_to_start()
            .ok_or(ConfigError::MissingOption {
                option: "PhaseToStart",
            })?;

        if let Some(phases) = manager.delegate().phase_enum() {
            if phases.is_tree() && !phases.is_leaf(target) {
                return Err(ConfigError::NonLeafPhase {
                    phase: phases.display_name(target),
                });
            }
        }

        // Probe the phase-setter capability against a throwaway copy of
        // the example state.
        let mut probe = manager.example_state().clone();
        match manager.delegate().set_current_phase(&mut probe, target) {
            Err(ApplyError::NoPhaseSetter) => Err(ConfigError::NoPhaseSetter),
            _ => Ok(()),
        }
    }

    fn legal(
        &self,
        manager: &GameManager,
        state: &GameState,
        proposer: PlayerId,
    ) -> Result<(), LegalError> {
        self.base_legal(manager, state, proposer)
    }

    fn apply(&self, manager: &GameManager, state: &mut GameState) -> Result<(), ApplyError> {
        let target = self.target()?;
        manager.delegate().set_current_phase(state, target)?;
        debug!("{:?} entered {target}", self.name());
        Ok(())
    }
}
