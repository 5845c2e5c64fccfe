//! Move configuration: the options a move is installed with.
//!
//! `CustomConfig` carries the per-move options (name overrides, legal
//! phases, progression group, stack property names, integer
//! parameters). Games build one with the `with_*` methods and hand it
//! to the auto-configurer, which resolves the final `MoveConfig` the
//! game registers.
//!
//! A `MoveConfig` doubles as a Leaf progression group: see
//! [`Group`](crate::progression::Group).

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use crate::core::PhaseId;
use crate::moves::base::Move;
use crate::progression::Group;

/// Factory that produces fresh, unconfigured move instances.
///
/// The auto-configurer materializes a throwaway instance to derive the
/// move's name; the manager materializes instances to check legality
/// and apply moves.
pub type MoveFactory = Arc<dyn Fn() -> Box<dyn Move> + Send + Sync>;

/// Wrap a closure producing a concrete move as a [`MoveFactory`].
pub fn factory<M, F>(f: F) -> MoveFactory
where
    M: Move + 'static,
    F: Fn() -> M + Send + Sync + 'static,
{
    Arc::new(move || Box::new(f()))
}

/// Per-move options.
///
/// All fields are optional; a default config configures nothing. Build
/// with the `with_*` methods:
///
/// ```
/// use rust_tbg::core::PhaseId;
/// use rust_tbg::moves::CustomConfig;
///
/// let custom = CustomConfig::new()
///     .with_move_name("Deal Starting Hands")
///     .with_legal_phases([PhaseId::new(1)])
///     .with_target_count(2);
///
/// assert_eq!(custom.move_name(), Some("Deal Starting Hands"));
/// assert_eq!(custom.target_count(), Some(2));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CustomConfig {
    move_name: Option<String>,
    move_name_suffix: Option<String>,
    help_text: Option<String>,
    is_fix_up: Option<bool>,
    legal_phases: SmallVec<[PhaseId; 4]>,
    legal_progression: Option<Arc<Group>>,
    phase_to_start: Option<PhaseId>,
    source_property: Option<String>,
    destination_property: Option<String>,
    game_property: Option<String>,
    player_property: Option<String>,
    target_count: Option<i64>,
    num_rounds: Option<i64>,
    amount: Option<i64>,
    legal_type: Option<i64>,
}

impl CustomConfig {
    /// Create an empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the derived move name.
    #[must_use]
    pub fn with_move_name(mut self, name: impl Into<String>) -> Self {
        self.move_name = Some(name.into());
        self
    }

    /// Append `" - <suffix>"` to the derived name.
    #[must_use]
    pub fn with_move_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.move_name_suffix = Some(suffix.into());
        self
    }

    /// Override the fallback help text.
    #[must_use]
    pub fn with_help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// Override the fix-up classification.
    #[must_use]
    pub fn with_is_fix_up(mut self, is_fix_up: bool) -> Self {
        self.is_fix_up = Some(is_fix_up);
        self
    }

    /// Set the phases this move is legal in.
    #[must_use]
    pub fn with_legal_phases(mut self, phases: impl IntoIterator<Item = PhaseId>) -> Self {
        self.legal_phases = phases.into_iter().collect();
        self
    }

    /// Set the root group controlling legal move order within a phase.
    #[must_use]
    pub fn with_legal_progression(mut self, group: Arc<Group>) -> Self {
        self.legal_progression = Some(group);
        self
    }

    /// Set the target phase for the StartPhase template.
    #[must_use]
    pub fn with_phase_to_start(mut self, phase: PhaseId) -> Self {
        self.phase_to_start = Some(phase);
        self
    }

    /// Name the source stack on game state.
    #[must_use]
    pub fn with_source_property(mut self, name: impl Into<String>) -> Self {
        self.source_property = Some(name.into());
        self
    }

    /// Name the destination stack on game state.
    #[must_use]
    pub fn with_destination_property(mut self, name: impl Into<String>) -> Self {
        self.destination_property = Some(name.into());
        self
    }

    /// Name the game-owned stack for deal/collect templates.
    #[must_use]
    pub fn with_game_property(mut self, name: impl Into<String>) -> Self {
        self.game_property = Some(name.into());
        self
    }

    /// Name the player-owned stack for deal/collect templates.
    #[must_use]
    pub fn with_player_property(mut self, name: impl Into<String>) -> Self {
        self.player_property = Some(name.into());
        self
    }

    /// Integer target for the counting templates.
    #[must_use]
    pub fn with_target_count(mut self, count: i64) -> Self {
        self.target_count = Some(count);
        self
    }

    /// Number of rounds for the round-robin templates.
    #[must_use]
    pub fn with_num_rounds(mut self, rounds: i64) -> Self {
        self.num_rounds = Some(rounds);
        self
    }

    /// Generic integer amount parameter.
    #[must_use]
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Per-component move legality key, consumed by game-specific moves.
    #[must_use]
    pub fn with_legal_type(mut self, legal_type: i64) -> Self {
        self.legal_type = Some(legal_type);
        self
    }

    // === Getters ===

    /// The move-name override, if set.
    #[must_use]
    pub fn move_name(&self) -> Option<&str> {
        self.move_name.as_deref()
    }

    /// The name suffix, if set.
    #[must_use]
    pub fn move_name_suffix(&self) -> Option<&str> {
        self.move_name_suffix.as_deref()
    }

    /// The help-text override, if set.
    #[must_use]
    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    /// The fix-up override, if set.
    #[must_use]
    pub fn is_fix_up(&self) -> Option<bool> {
        self.is_fix_up
    }

    /// The phases this move is legal in. Empty means every phase.
    #[must_use]
    pub fn legal_phases(&self) -> &[PhaseId] {
        &self.legal_phases
    }

    /// The root progression group, if set.
    #[must_use]
    pub fn legal_progression(&self) -> Option<&Arc<Group>> {
        self.legal_progression.as_ref()
    }

    /// The StartPhase target, if set.
    #[must_use]
    pub fn phase_to_start(&self) -> Option<PhaseId> {
        self.phase_to_start
    }

    /// The source stack name, if set.
    #[must_use]
    pub fn source_property(&self) -> Option<&str> {
        self.source_property.as_deref()
    }

    /// The destination stack name, if set.
    #[must_use]
    pub fn destination_property(&self) -> Option<&str> {
        self.destination_property.as_deref()
    }

    /// The game-owned stack name, if set.
    #[must_use]
    pub fn game_property(&self) -> Option<&str> {
        self.game_property.as_deref()
    }

    /// The player-owned stack name, if set.
    #[must_use]
    pub fn player_property(&self) -> Option<&str> {
        self.player_property.as_deref()
    }

    /// The target count, if set.
    #[must_use]
    pub fn target_count(&self) -> Option<i64> {
        self.target_count
    }

    /// The round limit, if set.
    #[must_use]
    pub fn num_rounds(&self) -> Option<i64> {
        self.num_rounds
    }

    /// The generic amount, if set.
    #[must_use]
    pub fn amount(&self) -> Option<i64> {
        self.amount
    }

    /// The per-component legality key, if set.
    #[must_use]
    pub fn legal_type(&self) -> Option<i64> {
        self.legal_type
    }
}

/// Per-instance move metadata: the resolved name plus the config the
/// move was installed with.
#[derive(Clone, Debug, Default)]
pub struct MoveInfo {
    name: String,
    custom: CustomConfig,
}

impl MoveInfo {
    /// Create move info with a resolved name and config.
    #[must_use]
    pub fn new(name: impl Into<String>, custom: CustomConfig) -> Self {
        Self {
            name: name.into(),
            custom,
        }
    }

    /// The resolved move name; empty until the info is installed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The config this move was installed with.
    #[must_use]
    pub fn custom(&self) -> &CustomConfig {
        &self.custom
    }
}

/// A registered move: resolved metadata plus a factory for instances.
///
/// Produced by the auto-configurer; consumed by the game's move list
/// and, as a Leaf, by progression groups.
#[derive(Clone)]
pub struct MoveConfig {
    name: String,
    help_text: String,
    is_fix_up: bool,
    allow_multiple: bool,
    custom: CustomConfig,
    factory: MoveFactory,
}

impl MoveConfig {
    pub(crate) fn new(
        name: impl Into<String>,
        help_text: impl Into<String>,
        is_fix_up: bool,
        allow_multiple: bool,
        custom: CustomConfig,
        factory: MoveFactory,
    ) -> Self {
        Self {
            name: name.into(),
            help_text: help_text.into(),
            is_fix_up,
            allow_multiple,
            custom,
            factory,
        }
    }

    /// The resolved move name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved help text.
    #[must_use]
    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    /// Whether instances of this move are fix-ups.
    #[must_use]
    pub fn is_fix_up(&self) -> bool {
        self.is_fix_up
    }

    /// Whether a Leaf over this move consumes runs of equal names.
    #[must_use]
    pub fn allow_multiple_in_progression(&self) -> bool {
        self.allow_multiple
    }

    /// The config this move was installed with.
    #[must_use]
    pub fn custom(&self) -> &CustomConfig {
        &self.custom
    }

    pub(crate) fn custom_mut(&mut self) -> &mut CustomConfig {
        &mut self.custom
    }

    /// Whether this move declares a progression group.
    ///
    /// Moves without one are transparent to progression matching.
    #[must_use]
    pub fn has_progression(&self) -> bool {
        self.custom.legal_progression.is_some()
    }

    /// Materialize a move instance carrying this config.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn Move> {
        let mut instance = (self.factory)();
        *instance.info_mut() = MoveInfo::new(self.name.clone(), self.custom.clone());
        instance
    }
}

impl fmt::Debug for MoveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveConfig")
            .field("name", &self.name)
            .field("is_fix_up", &self.is_fix_up)
            .field("allow_multiple", &self.allow_multiple)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_config_defaults() {
        let custom = CustomConfig::new();

        assert_eq!(custom.move_name(), None);
        assert_eq!(custom.is_fix_up(), None);
        assert!(custom.legal_phases().is_empty());
        assert!(custom.legal_progression().is_none());
        assert_eq!(custom.target_count(), None);
    }

    #[test]
    fn test_custom_config_builder() {
        let custom = CustomConfig::new()
            .with_move_name("Shuffle")
            .with_move_name_suffix("Discard")
            .with_help_text("Shuffles the discard pile into the draw stack.")
            .with_is_fix_up(true)
            .with_legal_phases([PhaseId::new(2), PhaseId::new(3)])
            .with_game_property("DrawStack")
            .with_player_property("Hand")
            .with_target_count(2)
            .with_num_rounds(1)
            .with_amount(5)
            .with_legal_type(7);

        assert_eq!(custom.move_name(), Some("Shuffle"));
        assert_eq!(custom.move_name_suffix(), Some("Discard"));
        assert_eq!(custom.is_fix_up(), Some(true));
        assert_eq!(custom.legal_phases(), &[PhaseId::new(2), PhaseId::new(3)]);
        assert_eq!(custom.game_property(), Some("DrawStack"));
        assert_eq!(custom.player_property(), Some("Hand"));
        assert_eq!(custom.target_count(), Some(2));
        assert_eq!(custom.num_rounds(), Some(1));
        assert_eq!(custom.amount(), Some(5));
        assert_eq!(custom.legal_type(), Some(7));
    }

    #[test]
    fn test_move_info_default_name_is_empty() {
        let info = MoveInfo::default();
        assert_eq!(info.name(), "");
    }

    #[test]
    fn test_move_config_accessors() {
        let config = testing::config("Draw Card");

        assert_eq!(config.name(), "Draw Card");
        assert!(!config.is_fix_up());
        assert!(!config.allow_multiple_in_progression());
        assert!(!config.has_progression());
    }

    #[test]
    fn test_instantiate_installs_info() {
        let config = testing::config("Draw Card");
        let instance = config.instantiate();

        assert_eq!(instance.info().name(), "Draw Card");
        assert_eq!(instance.name(), "Draw Card");
    }
}
