//! Game state: phase, move history, and named stacks.
//!
//! ## GameState
//!
//! The complete state of one game in progress:
//! - Current phase and current player
//! - Version counter and the full move-record history
//! - Game-level sub-state (`GameplayState`): shared stacks, properties,
//!   and the round-robin bookkeeping block
//! - Per-player sub-state (`PlayerState`): player-owned stacks and
//!   properties
//! - Deterministic RNG
//!
//! Sub-states expose stacks by *property name*; the component-moving
//! templates resolve their source and destination stacks through these
//! names at apply time.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::phase::PhaseId;
use super::player::{PlayerId, PlayerMap};
use super::record::MoveRecord;
use super::rng::GameRng;
use crate::stacks::Stack;

/// Round-robin bookkeeping stored on the game-level sub-state.
///
/// When `has_started` is false the other fields are meaningless
/// leftovers from a prior run. When true, `last_player` is the most
/// recently visited player and `starter_player` anchors full-circuit
/// detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRobinState {
    /// Whether a round robin is currently in progress.
    pub has_started: bool,
    /// The player most recently visited.
    pub last_player: PlayerId,
    /// The player the round robin started from.
    pub starter_player: PlayerId,
    /// Times the starter has been crossed since the round robin began.
    pub round_count: u64,
}

/// Game-level sub-state: stacks and properties shared by all players.
#[derive(Clone, Debug, Default)]
pub struct GameplayState {
    stacks: FxHashMap<String, Stack>,
    properties: FxHashMap<String, i64>,
    /// Round-robin templates keep their progress here.
    pub round_robin: RoundRobinState,
}

impl GameplayState {
    /// Create an empty game-level sub-state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a named stack.
    #[must_use]
    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.get(name)
    }

    /// Get a named stack mutably.
    pub fn stack_mut(&mut self, name: &str) -> Option<&mut Stack> {
        self.stacks.get_mut(name)
    }

    /// Register a named stack, replacing any prior stack of that name.
    pub fn insert_stack(&mut self, name: impl Into<String>, stack: Stack) {
        self.stacks.insert(name.into(), stack);
    }

    /// Remove a named stack, returning it.
    ///
    /// Lets callers hold two stacks from the same map mutably: lift one
    /// out, work on both, reinsert.
    pub fn remove_stack(&mut self, name: &str) -> Option<Stack> {
        self.stacks.remove(name)
    }

    /// Get a property value with default.
    #[must_use]
    pub fn property(&self, key: &str, default: i64) -> i64 {
        self.properties.get(key).copied().unwrap_or(default)
    }

    /// Set a property value.
    pub fn set_property(&mut self, key: impl Into<String>, value: i64) {
        self.properties.insert(key.into(), value);
    }
}

/// Per-player sub-state: player-owned stacks and properties.
#[derive(Clone, Debug, Default)]
pub struct PlayerState {
    stacks: FxHashMap<String, Stack>,
    properties: FxHashMap<String, i64>,
}

impl PlayerState {
    /// Create an empty player sub-state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a named stack.
    #[must_use]
    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.get(name)
    }

    /// Get a named stack mutably.
    pub fn stack_mut(&mut self, name: &str) -> Option<&mut Stack> {
        self.stacks.get_mut(name)
    }

    /// Register a named stack, replacing any prior stack of that name.
    pub fn insert_stack(&mut self, name: impl Into<String>, stack: Stack) {
        self.stacks.insert(name.into(), stack);
    }

    /// Get a property value with default.
    #[must_use]
    pub fn property(&self, key: &str, default: i64) -> i64 {
        self.properties.get(key).copied().unwrap_or(default)
    }

    /// Set a property value.
    pub fn set_property(&mut self, key: impl Into<String>, value: i64) {
        self.properties.insert(key.into(), value);
    }
}

/// Complete state of one game in progress.
#[derive(Clone, Debug)]
pub struct GameState {
    version: u64,
    /// Current phase. Written only by phase-transition moves (via the
    /// delegate's phase-setter capability) and game setup code.
    pub phase: PhaseId,
    /// The player whose turn it is.
    pub current_player: PlayerId,
    /// Applied-move history, oldest first.
    records: Vector<MoveRecord>,
    /// Game-level sub-state.
    pub game: GameplayState,
    /// Per-player sub-states.
    pub players: PlayerMap<PlayerState>,
    /// Deterministic RNG.
    pub rng: GameRng,
}

impl GameState {
    /// Create a new game state at version 0 in the default phase.
    #[must_use]
    pub fn new(player_count: usize, seed: u64) -> Self {
        Self {
            version: 0,
            phase: PhaseId::default(),
            current_player: PlayerId::new(0),
            records: Vector::new(),
            game: GameplayState::new(),
            players: PlayerMap::with_default(player_count),
            rng: GameRng::new(seed),
        }
    }

    /// Number of players in the game.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Current state version. Bumped once per applied move.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The full move-record history, oldest first.
    #[must_use]
    pub fn records(&self) -> &Vector<MoveRecord> {
        &self.records
    }

    /// Move records up to and including the given version.
    ///
    /// Double-ended so callers can walk the recent history backwards.
    pub fn records_up_to(&self, version: u64) -> impl DoubleEndedIterator<Item = &MoveRecord> {
        self.records.iter().filter(move |r| r.version <= version)
    }

    /// The most recently applied move, if any.
    #[must_use]
    pub fn last_record(&self) -> Option<&MoveRecord> {
        self.records.back()
    }

    /// Record an applied move and bump the version.
    ///
    /// `phase` is the phase the move was proposed in - callers capture
    /// it before apply so phase-transition moves are recorded under the
    /// phase they left.
    pub fn record_move(&mut self, name: impl Into<String>, phase: PhaseId, player: PlayerId) {
        self.version += 1;
        self.records
            .push_back(MoveRecord::new(name, phase, player, self.version));
    }
}
