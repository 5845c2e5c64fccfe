//! Example games built on the move core.

pub mod simple;
