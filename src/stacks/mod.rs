//! Component stacks (sized and growable) and the unit move between them.

pub mod stack;

pub use stack::{move_component, ComponentId, Stack, StackError};
