//! Process exit codes returned by [`crate::run`].

pub const SUCCESS: i32 = 0;

/// Any failure: bad arguments, unreadable files, engine faults.
pub const ERROR: i32 = 2;

/// Input closed in the middle of an interactive game.
pub const INTERRUPTED: i32 = 130;
