//! The move-progression grammar: tapes, counter predicates, and groups.

pub mod count;
pub mod group;
pub mod tape;

pub use count::{Count, CountError};
pub use group::{Group, ProgressionError};
pub use tape::Tape;
