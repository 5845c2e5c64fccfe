//! # rust-tbg
//!
//! A phase-aware move engine for turn-based board games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: No hardcoded phases, stacks, or move types.
//!    Games configure these at startup.
//!
//! 2. **N-Player First**: Every API takes the player count as context.
//!    No convenience methods that assume 2 players.
//!
//! 3. **Configuration Over Convention**: Games define their moves via
//!    `CustomConfig` options resolved by the `AutoConfigurer`, and
//!    their structure via a `GameDelegate`.
//!
//! ## Architecture
//!
//! A candidate move passes two gates before it may be applied: a
//! *phase gate* (is the move legal in the game's current phase,
//! honoring nested phase trees?) and a *progression gate* (does the
//! phase's move history, with the candidate appended, fit the move's
//! progression grammar?). Higher-order templates - apply-until,
//! round-robin, deal/collect/move components, start-phase - layer
//! their own legality and repeated application on top of the same
//! gates.
//!
//! ## Modules
//!
//! - `core`: Players, phases, move records, state, RNG
//! - `stacks`: Component stacks the templates operate on
//! - `progression`: Tape, counter predicates, group combinators
//! - `moves`: The `Move` trait, templates, auto-configurer, installers
//! - `manager`: Game installation, delegate, per-game manager
//! - `games`: Example game used by the integration tests

pub mod core;
pub mod games;
pub mod manager;
pub mod moves;
pub mod progression;
pub mod stacks;

// Re-export commonly used types
pub use crate::core::{
    GameRng, GameRngState, GameState, GameplayState, MoveRecord, PhaseEnum, PhaseId, PlayerId,
    PlayerMap, PlayerState, RoundRobinState,
};

pub use crate::stacks::{move_component, ComponentId, Stack, StackError};

pub use crate::progression::{Count, CountError, Group, ProgressionError, Tape};

pub use crate::moves::{
    add, add_for_phase, add_ordered_for_phase, combine, display_name, factory, ApplyCountTimes,
    ApplyError, ApplyUntil, ApplyUntilCount, ApplyUntilHooks, AutoConfigurer, ConfigError,
    CustomConfig, LegalError, Move, MoveConfig, MoveFactory, MoveInfo, RoundRobin, RoundRobinHooks,
    RoundRobinProperties, StartPhase,
};

pub use crate::manager::{
    DefaultDelegate, Game, GameDelegate, GameId, GameManager, ProposeError,
};
