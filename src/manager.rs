//! Game installation and the per-game manager.
//!
//! A [`Game`] is the static installation: a name, a process-unique
//! identity, and the registered move configs. The [`GameManager`] pairs
//! a game with its [`GameDelegate`] and validates every registered
//! config at construction - configuration errors are fatal.
//!
//! The manager serializes legality checks and applications for one
//! game: `legal`/`apply` are synchronous, run to completion, and assume
//! nothing else mutates the state meanwhile. Multiple games may be
//! processed in parallel.

use log::debug;
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::{GameState, PhaseEnum, PhaseId, PlayerId};
use crate::moves::base::{self, Move};
use crate::moves::error::{ApplyError, ConfigError, LegalError};
use crate::moves::MoveConfig;

/// Process-unique game identity. Keys the skip-set memoization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameId(u64);

impl GameId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A game installation: name plus registered moves.
#[derive(Clone, Debug)]
pub struct Game {
    id: GameId,
    name: String,
    moves: Vec<MoveConfig>,
}

impl Game {
    /// Create a game from its registered move configs.
    ///
    /// Each call allocates a fresh identity, even for equal names: the
    /// identity tracks the installation, not the title.
    #[must_use]
    pub fn new(name: impl Into<String>, moves: Vec<MoveConfig>) -> Self {
        Self {
            id: GameId::next(),
            name: name.into(),
            moves,
        }
    }

    /// This installation's identity.
    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    /// The game's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registered move configs.
    #[must_use]
    pub fn moves(&self) -> &[MoveConfig] {
        &self.moves
    }

    /// Look up a registered config by resolved name.
    #[must_use]
    pub fn config_for_name(&self, name: &str) -> Option<&MoveConfig> {
        self.moves.iter().find(|config| config.name() == name)
    }
}

/// Game-specific behavior the move core consults.
///
/// The defaults read phase and player straight off the state and offer
/// no phase table and no phase-setter capability; games override what
/// they support.
pub trait GameDelegate: Send + Sync {
    /// The phase the game is currently in.
    fn current_phase(&self, state: &GameState) -> PhaseId {
        state.phase
    }

    /// The player whose turn it is.
    fn current_player(&self, state: &GameState) -> PlayerId {
        state.current_player
    }

    /// The game's phase table, if it has one.
    fn phase_enum(&self) -> Option<&PhaseEnum> {
        None
    }

    /// Write a new current phase to the state.
    ///
    /// This is an opt-in capability: the default errors, and the
    /// StartPhase template refuses to install against a delegate that
    /// does not provide it.
    fn set_current_phase(&self, _state: &mut GameState, _phase: PhaseId) -> Result<(), ApplyError> {
        Err(ApplyError::NoPhaseSetter)
    }
}

/// A delegate with entirely default behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultDelegate;

impl GameDelegate for DefaultDelegate {}

/// A move proposal failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProposeError {
    /// No registered move has the proposed name.
    #[error("no move named {name:?} is registered")]
    UnknownMove {
        /// The proposed name.
        name: String,
    },
    /// The move is not legal right now.
    #[error(transparent)]
    Legal(#[from] LegalError),
    /// The move failed while being applied.
    #[error(transparent)]
    Apply(#[from] ApplyError),
}

/// Drives one game: validates the installation, then checks and
/// applies proposed moves.
pub struct GameManager {
    game: Game,
    delegate: Box<dyn GameDelegate>,
    example_state: GameState,
}

impl GameManager {
    /// Pair a game with its delegate, validating every registered
    /// config against the delegate and the example state.
    pub fn new(
        game: Game,
        delegate: Box<dyn GameDelegate>,
        example_state: GameState,
    ) -> Result<Self, ConfigError> {
        let manager = Self {
            game,
            delegate,
            example_state,
        };
        manager.validate_installation()?;
        Ok(manager)
    }

    fn validate_installation(&self) -> Result<(), ConfigError> {
        let mut seen = FxHashSet::default();
        for config in self.game.moves() {
            if !seen.insert(config.name().to_string()) {
                return Err(ConfigError::DuplicateMoveName {
                    name: config.name().to_string(),
                });
            }
            let instance = config.instantiate();
            base::validate_configuration(instance.info(), self.delegate.as_ref())?;
            instance.validate(self)?;
        }
        Ok(())
    }

    /// The installed game.
    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The game's delegate.
    #[must_use]
    pub fn delegate(&self) -> &dyn GameDelegate {
        self.delegate.as_ref()
    }

    /// A pristine state used for install-time validation.
    #[must_use]
    pub fn example_state(&self) -> &GameState {
        &self.example_state
    }

    /// Materialize an instance of a registered move.
    #[must_use]
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Move>> {
        self.game.config_for_name(name).map(MoveConfig::instantiate)
    }

    /// Check whether a registered move would be legal right now.
    pub fn is_legal(
        &self,
        name: &str,
        state: &GameState,
        proposer: PlayerId,
    ) -> Result<(), ProposeError> {
        let instance = self.instantiate(name).ok_or_else(|| ProposeError::UnknownMove {
            name: name.to_string(),
        })?;
        instance.legal(self, state, proposer)?;
        Ok(())
    }

    /// Check, apply, and record a proposed move.
    ///
    /// The record is stamped with the phase the move was proposed in,
    /// captured before apply, so a phase-transition move lands in the
    /// history of the phase it left.
    pub fn propose(
        &self,
        name: &str,
        state: &mut GameState,
        proposer: PlayerId,
    ) -> Result<(), ProposeError> {
        let instance = self.instantiate(name).ok_or_else(|| ProposeError::UnknownMove {
            name: name.to_string(),
        })?;
        instance.legal(self, state, proposer)?;

        let phase = self.delegate.current_phase(state);
        instance.apply(self, state)?;
        state.record_move(instance.name(), phase, proposer);
        debug!(
            "applied {:?} for {proposer} at version {}",
            instance.name(),
            state.version()
        );
        Ok(())
    }
}

impl std::fmt::Debug for GameManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameManager")
            .field("game", &self.game)
            .field("delegate", &"<dyn GameDelegate>")
            .field("example_state", &self.example_state)
            .finish()
    }
}
