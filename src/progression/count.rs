//! Counter predicates: reusable range checks for group matching.
//!
//! A `Count` decides whether a current tally is acceptable given a
//! contextual `length` (typically the number of sibling children in a
//! parent group). Counters are pure and `Copy`; they are constructed
//! once at installation and never change.

use serde::{Deserialize, Serialize};

/// Error from a counter predicate.
///
/// The two variants matter to `Repeat`: a tally *below* the admissible
/// range means "keep going", one *above* means "stop before this one".
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CountError {
    /// The tally has not yet reached the lower bound.
    #[error("count {current} is below the minimum of {min}")]
    BelowMin {
        /// Lower bound after sentinel resolution.
        min: i64,
        /// The tally that was checked.
        current: i64,
    },
    /// The tally has exceeded the upper bound.
    #[error("count {current} is above the maximum of {max}")]
    AboveMax {
        /// Upper bound after sentinel resolution.
        max: i64,
        /// The tally that was checked.
        current: i64,
    },
}

/// A range check over `(current, length)`.
///
/// Negative bounds are sentinels that resolve to `length` at check
/// time, so `Count::AtMost(-1)` means "at most as many as there are
/// siblings".
///
/// ## Example
///
/// ```
/// use rust_tbg::progression::Count;
///
/// assert!(Count::Between(1, 3).valid(2, 5).is_ok());
/// assert!(Count::Between(1, 3).valid(4, 5).is_err());
/// // Negative max resolves to the contextual length.
/// assert!(Count::Between(0, -1).valid(5, 5).is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Count {
    /// Exactly one.
    Any,
    /// Exactly `length`.
    All,
    /// At least `n`.
    AtLeast(i64),
    /// At most `n`; negative `n` resolves to `length`.
    AtMost(i64),
    /// Between `min` and `max` inclusive; negative `max` resolves to
    /// `length`.
    Between(i64, i64),
    /// Exactly `n`.
    Exactly(i64),
}

impl Count {
    /// Check whether `current` is admissible for this counter.
    pub fn valid(self, current: i64, length: i64) -> Result<(), CountError> {
        let (min, max) = self.bounds(length);
        if current < min {
            return Err(CountError::BelowMin { min, current });
        }
        if current > max {
            return Err(CountError::AboveMax { max, current });
        }
        Ok(())
    }

    /// The inclusive bounds this counter admits, given `length`.
    #[must_use]
    pub fn bounds(self, length: i64) -> (i64, i64) {
        match self {
            Count::Any => (1, 1),
            Count::All => (length, length),
            Count::AtLeast(n) => (n, i64::MAX),
            Count::AtMost(n) => {
                let max = if n < 0 { length } else { n };
                (i64::MIN, max)
            }
            Count::Between(min, max) => {
                let max = if max < 0 { length } else { max };
                (min, max)
            }
            Count::Exactly(n) => (n, n),
        }
    }
}

impl std::fmt::Display for Count {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Count::Any => write!(f, "exactly 1"),
            Count::All => write!(f, "all"),
            Count::AtLeast(n) => write!(f, "at least {n}"),
            Count::AtMost(n) => write!(f, "at most {n}"),
            Count::Between(min, max) => write!(f, "between {min} and {max}"),
            Count::Exactly(n) => write!(f, "exactly {n}"),
        }
    }
}
