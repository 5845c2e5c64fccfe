//! The move tape: the sequence of move-names a progression consumes.
//!
//! A tape is a read-only cursor over the move-names recorded since the
//! most recent phase transition, with the candidate move appended at
//! the end. Groups consume tape *prefixes*: given a tape they return
//! either an error or the unconsumed suffix.
//!
//! Tapes are cheap `Copy` views; they live only for the duration of a
//! single legality check.

/// Cursor over a slice of move-names, consumed left to right.
#[derive(Clone, Copy, Debug)]
pub struct Tape<'a> {
    names: &'a [String],
}

impl<'a> Tape<'a> {
    /// Create a tape over the given names.
    #[must_use]
    pub fn new(names: &'a [String]) -> Self {
        Self { names }
    }

    /// The name at the head of the tape, if any.
    #[must_use]
    pub fn head(&self) -> Option<&'a str> {
        self.names.first().map(String::as_str)
    }

    /// The tape with the head consumed. An empty tape stays empty.
    #[must_use]
    pub fn advance(&self) -> Tape<'a> {
        match self.names.split_first() {
            Some((_, rest)) => Tape { names: rest },
            None => *self,
        }
    }

    /// Whether every name has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names remaining on the tape.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }
}
