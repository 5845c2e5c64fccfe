//! Progression groups: the grammar of legal move order within a phase.
//!
//! A group is a composable node that accepts or rejects a tape of
//! move-names as a valid prefix of a phase's protocol:
//!
//! - `Leaf` matches one named move (or a run of it, when the move
//!   allows multiples)
//! - `Serial` threads the tape through its children left to right
//! - `Parallel` matches children in any order until its counter is
//!   satisfied
//! - `Repeat` matches its child as many times as its counter admits
//!
//! `optional` is sugar for `Repeat(Between(0, 1), child)`.
//!
//! Groups are built once at installation and are immutable afterwards.

use smallvec::{smallvec, SmallVec};

use crate::moves::MoveConfig;

use super::count::{Count, CountError};
use super::tape::Tape;

/// Error from matching a tape against a group.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    /// A Leaf saw a head with the wrong name.
    #[error("move name {found:?} does not match {expected:?}")]
    NameMismatch {
        /// The name the Leaf wraps.
        expected: String,
        /// The name at the head of the tape.
        found: String,
    },
    /// A Parallel had tape left and an unsatisfied counter, but no
    /// unmatched child accepted the head.
    #[error("no more items match, but tape still left and count not yet reached")]
    NoMatchingChild,
    /// The root group accepted only a prefix of the tape.
    #[error("progression only matched some of the proposed history")]
    Incomplete,
    /// A counter rejected the tally.
    #[error(transparent)]
    Count(#[from] CountError),
}

/// A node in the progression grammar.
///
/// Constructed via [`serial`](Group::serial),
/// [`parallel`](Group::parallel), [`repeat`](Group::repeat),
/// [`optional`](Group::optional), or from a [`MoveConfig`] (which
/// doubles as a Leaf).
#[derive(Clone, Debug)]
pub enum Group {
    /// Matches the wrapped move's name at the head of the tape.
    Leaf(MoveConfig),
    /// Matches children in order, each consuming a prefix.
    Serial(Vec<Group>),
    /// Matches children in any order until the counter admits the
    /// number matched.
    Parallel(Count, Vec<Group>),
    /// Matches the child repeatedly while the counter admits the
    /// repetition tally.
    Repeat(Count, Box<Group>),
}

impl Group {
    /// Children matched strictly left to right.
    #[must_use]
    pub fn serial(children: impl IntoIterator<Item = Group>) -> Self {
        Group::Serial(children.into_iter().collect())
    }

    /// All children matched, in any order.
    #[must_use]
    pub fn parallel(children: impl IntoIterator<Item = Group>) -> Self {
        Group::Parallel(Count::All, children.into_iter().collect())
    }

    /// Children matched in any order until `count` admits the number
    /// matched.
    #[must_use]
    pub fn parallel_count(count: Count, children: impl IntoIterator<Item = Group>) -> Self {
        Group::Parallel(count, children.into_iter().collect())
    }

    /// The child matched repeatedly while `count` admits the tally.
    #[must_use]
    pub fn repeat(count: Count, child: Group) -> Self {
        Group::Repeat(count, Box::new(child))
    }

    /// The child matched zero or one times.
    ///
    /// Defined as `Repeat(Between(0, 1), child)`; it has no independent
    /// semantics.
    #[must_use]
    pub fn optional(child: Group) -> Self {
        Group::Repeat(Count::Between(0, 1), Box::new(child))
    }

    /// Every move config reachable from this group, in grammar order.
    #[must_use]
    pub fn move_configs(&self) -> Vec<MoveConfig> {
        match self {
            Group::Leaf(config) => vec![config.clone()],
            Group::Serial(children) | Group::Parallel(_, children) => {
                children.iter().flat_map(Group::move_configs).collect()
            }
            Group::Repeat(_, child) => child.move_configs(),
        }
    }

    /// Match a tape prefix against this group.
    ///
    /// Returns the unconsumed suffix on success. An exhausted tape
    /// satisfies every group immediately: a fully consumed history is a
    /// valid prefix of whatever the grammar still expects. (The
    /// top-level caller separately treats a non-empty suffix as "only
    /// matched a prefix".)
    pub fn satisfied<'a>(&self, tape: Tape<'a>) -> Result<Tape<'a>, ProgressionError> {
        if tape.is_empty() {
            return Ok(tape);
        }
        match self {
            Group::Leaf(config) => Self::satisfied_leaf(config, tape),
            Group::Serial(children) => {
                let mut rest = tape;
                for child in children {
                    rest = child.satisfied(rest)?;
                }
                Ok(rest)
            }
            Group::Parallel(count, children) => Self::satisfied_parallel(*count, children, tape),
            Group::Repeat(count, child) => Self::satisfied_repeat(*count, child, tape),
        }
    }

    fn satisfied_leaf<'a>(
        config: &MoveConfig,
        tape: Tape<'a>,
    ) -> Result<Tape<'a>, ProgressionError> {
        let Some(head) = tape.head() else {
            return Ok(tape);
        };
        if head != config.name() {
            return Err(ProgressionError::NameMismatch {
                expected: config.name().to_string(),
                found: head.to_string(),
            });
        }
        let mut rest = tape.advance();
        if config.allow_multiple_in_progression() {
            while rest.head() == Some(config.name()) {
                rest = rest.advance();
            }
        }
        Ok(rest)
    }

    /// Any-order matching with a longest-match rule.
    ///
    /// When several unmatched children accept at the current position,
    /// the one consuming the most tape wins; equal-length matches go to
    /// the lowest child index. This resolves ambiguous middle prefixes
    /// deterministically.
    fn satisfied_parallel<'a>(
        count: Count,
        children: &[Group],
        tape: Tape<'a>,
    ) -> Result<Tape<'a>, ProgressionError> {
        let total = children.len() as i64;
        let mut matched: SmallVec<[bool; 8]> = smallvec![false; children.len()];
        let mut matched_count: i64 = 0;
        let mut rest = tape;

        while count.valid(matched_count, total).is_err() {
            if rest.is_empty() {
                return Ok(rest);
            }

            let mut best: Option<(usize, Tape<'a>)> = None;
            for (index, child) in children.iter().enumerate() {
                if matched[index] {
                    continue;
                }
                let Ok(suffix) = child.satisfied(rest) else {
                    continue;
                };
                let better = match best {
                    None => true,
                    // Less tape remaining means a longer match. Strict
                    // comparison keeps ties on the first index.
                    Some((_, best_suffix)) => suffix.len() < best_suffix.len(),
                };
                if better {
                    best = Some((index, suffix));
                }
            }

            match best {
                None => return Err(ProgressionError::NoMatchingChild),
                Some((index, suffix)) => {
                    matched[index] = true;
                    matched_count += 1;
                    rest = suffix;
                }
            }
        }

        Ok(rest)
    }

    fn satisfied_repeat<'a>(
        count: Count,
        child: &Group,
        tape: Tape<'a>,
    ) -> Result<Tape<'a>, ProgressionError> {
        // Zero repetitions may already be acceptable (e.g. Between(0, 1)).
        let mut lower_reached = count.valid(0, 1).is_ok();
        let mut reps: i64 = 0;
        let mut rest = tape;

        loop {
            if rest.is_empty() {
                return Ok(rest);
            }

            let after = match child.satisfied(rest) {
                Ok(after) => after,
                Err(err) => {
                    if lower_reached {
                        // The repetitions seen so far were enough.
                        return Ok(rest);
                    }
                    return Err(err);
                }
            };

            reps += 1;
            match count.valid(reps, 1) {
                Ok(()) => lower_reached = true,
                Err(CountError::AboveMax { .. }) if lower_reached => {
                    // One repetition too many: stop before it.
                    return Ok(rest);
                }
                Err(err @ CountError::AboveMax { .. }) => {
                    return Err(ProgressionError::Count(err));
                }
                // Below the lower bound: keep consuming repetitions.
                Err(CountError::BelowMin { .. }) => {}
            }

            if after.len() == rest.len() {
                // The child matched without consuming anything; further
                // iterations cannot make progress.
                return Ok(after);
            }
            rest = after;
        }
    }
}

impl From<MoveConfig> for Group {
    fn from(config: MoveConfig) -> Self {
        Group::Leaf(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::config::testing::{config, config_allow_multiple};

    fn leaf(name: &str) -> Group {
        Group::Leaf(config(name))
    }

    fn tape_names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    /// Run a group against a tape, returning the unconsumed names.
    fn run(group: &Group, raw: &[&str]) -> Result<Vec<String>, ProgressionError> {
        let names = tape_names(raw);
        let mut rest = group.satisfied(Tape::new(&names))?;
        let mut remaining = Vec::new();
        while let Some(head) = rest.head() {
            remaining.push(head.to_string());
            rest = rest.advance();
        }
        Ok(remaining)
    }

    #[test]
    fn test_empty_tape_satisfies_every_group() {
        let groups = [
            leaf("A"),
            Group::serial([leaf("A"), leaf("B")]),
            Group::parallel([leaf("A"), leaf("B")]),
            Group::repeat(Count::AtLeast(3), leaf("A")),
            Group::optional(leaf("A")),
        ];

        for group in &groups {
            assert_eq!(run(group, &[]), Ok(vec![]));
        }
    }

    #[test]
    fn test_leaf_match_and_mismatch() {
        let group = leaf("A");

        assert_eq!(run(&group, &["A"]), Ok(vec![]));
        assert_eq!(run(&group, &["A", "B"]), Ok(vec!["B".to_string()]));
        assert_eq!(
            run(&group, &["B"]),
            Err(ProgressionError::NameMismatch {
                expected: "A".to_string(),
                found: "B".to_string(),
            })
        );
    }

    #[test]
    fn test_leaf_allow_multiple_consumes_run() {
        let group = Group::Leaf(config_allow_multiple("A"));

        assert_eq!(run(&group, &["A", "A", "A"]), Ok(vec![]));
        assert_eq!(
            run(&group, &["A", "A", "B"]),
            Ok(vec!["B".to_string()])
        );
    }

    #[test]
    fn test_serial_threads_in_order() {
        let group = Group::serial([leaf("A"), leaf("B"), leaf("C")]);

        assert_eq!(run(&group, &["A", "B", "C"]), Ok(vec![]));
        assert_eq!(run(&group, &["A", "B"]), Ok(vec![]));
        assert_eq!(run(&group, &["A"]), Ok(vec![]));
        assert!(run(&group, &["B"]).is_err());
        assert!(run(&group, &["A", "C"]).is_err());
    }

    #[test]
    fn test_serial_leaves_suffix() {
        let group = Group::serial([leaf("A"), leaf("B")]);

        assert_eq!(run(&group, &["A", "B", "X"]), Ok(vec!["X".to_string()]));
    }

    #[test]
    fn test_parallel_accepts_any_order() {
        let group = Group::parallel([leaf("A"), leaf("B")]);

        assert_eq!(run(&group, &["A", "B"]), Ok(vec![]));
        assert_eq!(run(&group, &["B", "A"]), Ok(vec![]));
        assert_eq!(run(&group, &["A"]), Ok(vec![]));
        assert!(run(&group, &["A", "A"]).is_err());
    }

    #[test]
    fn test_parallel_count_stops_early() {
        let group = Group::parallel_count(Count::Exactly(1), [leaf("A"), leaf("B")]);

        // After one child matches the counter is satisfied; the rest of
        // the tape is returned unconsumed.
        assert_eq!(run(&group, &["B", "A"]), Ok(vec!["A".to_string()]));
    }

    #[test]
    fn test_parallel_longest_match_wins() {
        // Scenario: children Leaf(X) and Serial(Leaf X, Leaf Y) with
        // tape [X, Y]. The Serial branch consumes two names, so it is
        // chosen; the bare Leaf stays unmatched and matching continues
        // until the tape is exhausted.
        let group = Group::parallel([leaf("X"), Group::serial([leaf("X"), leaf("Y")])]);

        assert_eq!(run(&group, &["X", "Y"]), Ok(vec![]));
        // The same grammar also accepts the bare X followed by X, Y.
        assert_eq!(run(&group, &["X", "X", "Y"]), Ok(vec![]));
    }

    #[test]
    fn test_parallel_equal_length_ties_take_first_index() {
        // Both children match "A" with equal length; the first child is
        // marked, so a second "A" can still match the duplicate child.
        let group = Group::parallel([leaf("A"), leaf("A")]);

        assert_eq!(run(&group, &["A", "A"]), Ok(vec![]));
    }

    #[test]
    fn test_parallel_no_match_errors() {
        let group = Group::parallel([leaf("A"), leaf("B")]);

        assert_eq!(run(&group, &["C"]), Err(ProgressionError::NoMatchingChild));
    }

    #[test]
    fn test_repeat_at_least() {
        let group = Group::repeat(Count::AtLeast(2), leaf("A"));

        assert_eq!(run(&group, &["A"]), Ok(vec![]));
        assert_eq!(run(&group, &["A", "A"]), Ok(vec![]));
        assert_eq!(run(&group, &["A", "A", "A"]), Ok(vec![]));
        // Below the lower bound a mismatch propagates.
        assert!(run(&group, &["A", "B"]).is_err());
        // At or past it, the mismatch ends the repetition instead.
        assert_eq!(
            run(&group, &["A", "A", "B"]),
            Ok(vec!["B".to_string()])
        );
    }

    #[test]
    fn test_repeat_upper_bound_stops_without_consuming() {
        let group = Group::repeat(Count::Between(1, 2), leaf("A"));

        assert_eq!(run(&group, &["A", "A"]), Ok(vec![]));
        assert_eq!(
            run(&group, &["A", "A", "A"]),
            Ok(vec!["A".to_string()])
        );
    }

    #[test]
    fn test_optional_accepts_or_passes_through() {
        let group = Group::optional(leaf("A"));

        // Accepts what the child accepts.
        assert_eq!(run(&group, &["A", "B"]), Ok(vec!["B".to_string()]));
        // A rejected head passes through unchanged.
        assert_eq!(
            run(&group, &["B", "A"]),
            Ok(vec!["B".to_string(), "A".to_string()])
        );
        // At most one repetition is consumed.
        assert_eq!(run(&group, &["A", "A"]), Ok(vec!["A".to_string()]));
    }

    #[test]
    fn test_serial_of_repeats() {
        let group = Group::serial([
            Group::repeat(Count::AtLeast(1), leaf("Bet")),
            leaf("Reveal"),
        ]);

        assert_eq!(run(&group, &["Bet", "Bet", "Reveal"]), Ok(vec![]));
        assert_eq!(run(&group, &["Bet", "Reveal"]), Ok(vec![]));
        assert!(run(&group, &["Reveal"]).is_err());
    }

    #[test]
    fn test_parallel_all_split_both_ways() {
        // Parallel(All, A, B) accepts exactly the tapes splittable into
        // a prefix accepted by A then one by B, or B then A.
        let a = Group::serial([leaf("A1"), leaf("A2")]);
        let b = leaf("B");
        let group = Group::parallel([a, b]);

        assert_eq!(run(&group, &["A1", "A2", "B"]), Ok(vec![]));
        assert_eq!(run(&group, &["B", "A1", "A2"]), Ok(vec![]));
        assert!(run(&group, &["A1", "B", "A2"]).is_err());
    }

    #[test]
    fn test_move_configs_enumerates_leaves() {
        let group = Group::serial([
            leaf("A"),
            Group::parallel([leaf("B"), Group::optional(leaf("C"))]),
        ]);

        let names: Vec<_> = group
            .move_configs()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_config_converts_to_leaf() {
        let group: Group = config("A").into();

        assert!(matches!(group, Group::Leaf(_)));
        assert_eq!(run(&group, &["A"]), Ok(vec![]));
    }
}
