//! Error types for move installation, legality, and application.

use crate::progression::ProgressionError;
use crate::stacks::StackError;

/// A move was rejected during a legality check.
///
/// These are recoverable: they are surfaced to whoever proposed the
/// move.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LegalError {
    /// The move's legal phases do not include the current phase.
    #[error("move is not legal in phase {phase}")]
    NotInPhase {
        /// Display name of the current phase.
        phase: String,
    },
    /// The phase's move history plus this move does not fit the move's
    /// progression grammar.
    #[error("the move was not legal at this phase in the progression")]
    Progression(#[source] ProgressionError),
    /// A round robin with this move's name just finished; starting
    /// another immediately would loop forever.
    #[error("a round robin of this move just finished; it cannot immediately restart")]
    RoundRobinReentry,
    /// A component-moving template found its source empty.
    #[error("the source stack has no components")]
    SourceEmpty,
    /// A component-moving template found its destination full.
    #[error("the destination stack has no free slots")]
    DestinationFull,
    /// A self-driving template's termination condition already holds.
    #[error("the termination condition is already met")]
    ConditionMet,
    /// Game-specific rejection.
    #[error("{0}")]
    Other(String),
}

/// A move configuration is invalid.
///
/// Detected at install time and fatal: installation must fail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `LegalMoveProgression` was set without `LegalPhases`.
    #[error("a legal-move progression requires legal phases to also be set")]
    ProgressionWithoutPhases,
    /// With a phase tree, every legal phase must be a leaf.
    #[error("phase {phase} is not a leaf of the phase tree")]
    NonLeafPhase {
        /// Display name of the offending phase.
        phase: String,
    },
    /// An integer option that must be non-negative was negative.
    #[error("option {option} must not be negative (got {value})")]
    NegativeCount {
        /// Which option carried the bad value.
        option: &'static str,
        /// The offending value.
        value: i64,
    },
    /// A template requires an option that was not provided.
    #[error("missing required option {option}")]
    MissingOption {
        /// The missing option.
        option: &'static str,
    },
    /// A named game-owned stack does not exist on the example state.
    #[error("game state has no stack named {name:?}")]
    MissingGameStack {
        /// The property name that failed to resolve.
        name: String,
    },
    /// A named player-owned stack does not exist on the example state.
    #[error("player state has no stack named {name:?}")]
    MissingPlayerStack {
        /// The property name that failed to resolve.
        name: String,
    },
    /// The delegate lacks the phase-setter capability a template needs.
    #[error("the delegate does not support setting the current phase")]
    NoPhaseSetter,
    /// Two registered moves resolved to the same name.
    #[error("duplicate move name {name:?}")]
    DuplicateMoveName {
        /// The colliding name.
        name: String,
    },
}

/// A move failed while being applied.
///
/// If installation succeeded these indicate an invariant violation;
/// they are surfaced with a descriptive message and never retried.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// A stack operation failed.
    #[error(transparent)]
    Stack(#[from] StackError),
    /// A named stack vanished between validation and apply.
    #[error("game state has no stack named {name:?}")]
    MissingStack {
        /// The property name that failed to resolve.
        name: String,
    },
    /// The delegate lacks the phase-setter capability.
    #[error("the delegate does not support setting the current phase")]
    NoPhaseSetter,
    /// A required option vanished between validation and apply.
    #[error("missing required option {option}")]
    MissingOption {
        /// The missing option.
        option: &'static str,
    },
    /// Anything else that should never happen after a valid install.
    #[error("invariant violated: {0}")]
    Invariant(String),
}
