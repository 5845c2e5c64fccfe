//! Self-driving templates: apply a step until a condition holds.
//!
//! Three templates share this machinery:
//!
//! - [`ApplyUntil`]: legal while the hooks' `condition_met` is false.
//! - [`ApplyCountTimes`]: legal until it has been applied `TargetCount`
//!   times in a row (measured from the move records).
//! - [`ApplyUntilCount`]: legal until an external counter (typically a
//!   stack size) reaches or falls to `TargetCount`.
//!
//! All are fix-up moves by default: the game manager keeps proposing
//! them while they report legal, and they stop themselves by turning
//! illegal.

use crate::core::GameState;
use crate::manager::{GameDelegate, GameManager};

use super::base::Move;
use super::config::{CustomConfig, MoveInfo};
use super::error::{ApplyError, ConfigError, LegalError};

/// The operations an apply-until family template needs from its host.
///
/// Checked at installation, not on every call: the manager runs
/// `validate` once when the game is installed.
pub trait ApplyUntilHooks: Send + Sync {
    /// Perform one application.
    fn apply_step(&self, custom: &CustomConfig, state: &mut GameState)
        -> Result<(), ApplyError>;

    /// Whether the termination condition holds. Consulted by
    /// [`ApplyUntil`] only.
    fn condition_met(
        &self,
        _custom: &CustomConfig,
        _manager: &GameManager,
        _state: &GameState,
    ) -> bool {
        false
    }

    /// The external counter [`ApplyUntilCount`] compares against the
    /// target.
    fn count(&self, _custom: &CustomConfig, _state: &GameState) -> i64 {
        0
    }

    /// The target the counting templates compare against. Defaults to
    /// the `TargetCount` option, or 1 when unset.
    fn target_count(&self, custom: &CustomConfig) -> i64 {
        custom.target_count().unwrap_or(1)
    }

    /// Per-step legality beyond the termination condition.
    fn extra_legal(&self, _custom: &CustomConfig, _state: &GameState) -> Result<(), LegalError> {
        Ok(())
    }

    /// Installation checks (e.g. that named stacks resolve).
    fn validate(&self, _custom: &CustomConfig, _manager: &GameManager) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Name used when no `MoveName` override is configured.
    fn fallback_name(&self) -> String {
        "Apply Until".to_string()
    }
}

/// Applies its hooks' step until `condition_met` reports true.
pub struct ApplyUntil<H: ApplyUntilHooks> {
    info: MoveInfo,
    hooks: H,
}

impl<H: ApplyUntilHooks> ApplyUntil<H> {
    /// Create the template around its hooks.
    #[must_use]
    pub fn new(hooks: H) -> Self {
        Self {
            info: MoveInfo::default(),
            hooks,
        }
    }
}

impl<H: ApplyUntilHooks> Move for ApplyUntil<H> {
    fn info(&self) -> &MoveInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut MoveInfo {
        &mut self.info
    }

    fn fallback_name(&self, _delegate: &dyn GameDelegate) -> String {
        self.hooks.fallback_name()
    }

    fn fallback_help_text(&self) -> String {
        "Keeps applying itself until its condition is met.".to_string()
    }

    fn default_fix_up(&self) -> bool {
        true
    }

    fn allow_multiple_in_progression(&self) -> bool {
        true
    }

    fn validate(&self, manager: &GameManager) -> Result<(), ConfigError> {
        self.hooks.validate(self.info.custom(), manager)
    }

    fn legal(
        &self,
        manager: &GameManager,
        state: &GameState,
        proposer: crate::core::PlayerId,
    ) -> Result<(), LegalError> {
        self.base_legal(manager, state, proposer)?;
        if self.hooks.condition_met(self.info.custom(), manager, state) {
            return Err(LegalError::ConditionMet);
        }
        self.hooks.extra_legal(self.info.custom(), state)
    }

    fn apply(&self, _manager: &GameManager, state: &mut GameState) -> Result<(), ApplyError> {
        self.hooks.apply_step(self.info.custom(), state)
    }
}

/// How many times the tail of the move history repeats one name.
pub(crate) fn consecutive_applications(state: &GameState, name: &str) -> i64 {
    state
        .records()
        .iter()
        .rev()
        .take_while(|record| record.name == name)
        .count() as i64
}

/// Applies its hooks' step `TargetCount` times in a row.
///
/// The tally is re-derived from the move records on every check, so
/// there is no hidden counter to reset: a different move landing in the
/// history ends the run.
pub struct ApplyCountTimes<H: ApplyUntilHooks> {
    info: MoveInfo,
    hooks: H,
}

impl<H: ApplyUntilHooks> ApplyCountTimes<H> {
    /// Create the template around its hooks.
    #[must_use]
    pub fn new(hooks: H) -> Self {
        Self {
            info: MoveInfo::default(),
            hooks,
        }
    }
}

impl<H: ApplyUntilHooks> Move for ApplyCountTimes<H> {
    fn info(&self) -> &MoveInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut MoveInfo {
        &mut self.info
    }

    fn fallback_name(&self, _delegate: &dyn GameDelegate) -> String {
        self.hooks.fallback_name()
    }

    fn fallback_help_text(&self) -> String {
        "Applies itself a fixed number of times.".to_string()
    }

    fn default_fix_up(&self) -> bool {
        true
    }

    fn allow_multiple_in_progression(&self) -> bool {
        true
    }

    fn validate(&self, manager: &GameManager) -> Result<(), ConfigError> {
        self.hooks.validate(self.info.custom(), manager)
    }

    fn legal(
        &self,
        manager: &GameManager,
        state: &GameState,
        proposer: crate::core::PlayerId,
    ) -> Result<(), LegalError> {
        self.base_legal(manager, state, proposer)?;
        let applied = consecutive_applications(state, self.name());
        if applied >= self.hooks.target_count(self.info.custom()) {
            return Err(LegalError::ConditionMet);
        }
        self.hooks.extra_legal(self.info.custom(), state)
    }

    fn apply(&self, _manager: &GameManager, state: &mut GameState) -> Result<(), ApplyError> {
        self.hooks.apply_step(self.info.custom(), state)
    }
}

/// Which way [`ApplyUntilCount`] compares its counter to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountDirection {
    /// Done once the counter has climbed to the target.
    Reached,
    /// Done once the counter has fallen to the target.
    Left,
}

/// Applies its hooks' step until an external counter reaches (or falls
/// to) `TargetCount`.
pub struct ApplyUntilCount<H: ApplyUntilHooks> {
    info: MoveInfo,
    hooks: H,
    direction: CountDirection,
}

impl<H: ApplyUntilHooks> ApplyUntilCount<H> {
    /// Done once the hooks' counter has climbed to the target.
    #[must_use]
    pub fn until_reached(hooks: H) -> Self {
        Self {
            info: MoveInfo::default(),
            hooks,
            direction: CountDirection::Reached,
        }
    }

    /// Done once the hooks' counter has fallen to the target.
    #[must_use]
    pub fn until_left(hooks: H) -> Self {
        Self {
            info: MoveInfo::default(),
            hooks,
            direction: CountDirection::Left,
        }
    }

    fn count_condition_met(&self, state: &GameState) -> bool {
        let custom = self.info.custom();
        let count = self.hooks.count(custom, state);
        let target = self.hooks.target_count(custom);
        match self.direction {
            CountDirection::Reached => count >= target,
            CountDirection::Left => count <= target,
        }
    }
}

impl<H: ApplyUntilHooks> Move for ApplyUntilCount<H> {
    fn info(&self) -> &MoveInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut MoveInfo {
        &mut self.info
    }

    fn fallback_name(&self, _delegate: &dyn GameDelegate) -> String {
        self.hooks.fallback_name()
    }

    fn fallback_help_text(&self) -> String {
        "Applies itself until a counter reaches its target.".to_string()
    }

    fn default_fix_up(&self) -> bool {
        true
    }

    fn allow_multiple_in_progression(&self) -> bool {
        true
    }

    fn validate(&self, manager: &GameManager) -> Result<(), ConfigError> {
        self.hooks.validate(self.info.custom(), manager)
    }

    fn legal(
        &self,
        manager: &GameManager,
        state: &GameState,
        proposer: crate::core::PlayerId,
    ) -> Result<(), LegalError> {
        self.base_legal(manager, state, proposer)?;
        if self.count_condition_met(state) {
            return Err(LegalError::ConditionMet);
        }
        self.hooks.extra_legal(self.info.custom(), state)
    }

    fn apply(&self, _manager: &GameManager, state: &mut GameState) -> Result<(), ApplyError> {
        self.hooks.apply_step(self.info.custom(), state)
    }
}
