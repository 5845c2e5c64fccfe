//! Move records: the per-game history of applied moves.
//!
//! Every applied move leaves a `MoveRecord` stamped with the move's
//! resolved name, the phase and player it was proposed in, and the state
//! version it produced. Progression matching replays the suffix of this
//! history since the most recent phase transition.

use serde::{Deserialize, Serialize};

use super::phase::PhaseId;
use super::player::PlayerId;

/// A recorded move with metadata for history tracking.
///
/// Used for:
/// - Progression matching (which moves happened this phase, in order)
/// - Round-robin re-entry guards (what was the last move?)
/// - Replay/debugging
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Resolved name of the applied move.
    pub name: String,

    /// The phase the move was proposed in (captured before apply, so a
    /// phase-changing move is recorded under the phase it left).
    pub phase: PhaseId,

    /// The player who proposed the move.
    pub player: PlayerId,

    /// State version this move produced.
    pub version: u64,
}

impl MoveRecord {
    /// Create a new move record.
    #[must_use]
    pub fn new(name: impl Into<String>, phase: PhaseId, player: PlayerId, version: u64) -> Self {
        Self {
            name: name.into(),
            phase,
            player,
            version,
        }
    }
}
