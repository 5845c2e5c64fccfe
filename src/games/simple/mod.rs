//! Simple card game: a worked example of the move core.

pub mod game;

pub use game::{
    apply_fix_ups, phases, stacks, MoveDrawCard, MovePass, MovePlayCard, SimpleDelegate,
    SimpleGameBuilder,
};
