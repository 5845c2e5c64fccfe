//! Core engine types: players, phases, state, move records, RNG.
//!
//! This module contains the fundamental building blocks that are
//! game-agnostic. Games configure phases and stacks at setup rather
//! than modifying the core.

pub mod phase;
pub mod player;
pub mod record;
pub mod rng;
pub mod state;

pub use phase::{PhaseEnum, PhaseId};
pub use player::{PlayerId, PlayerMap};
pub use record::MoveRecord;
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, GameplayState, PlayerState, RoundRobinState};
