//! Utilities shared between the Doodle Duel binaries and tests.

pub mod logger;
pub mod time;
