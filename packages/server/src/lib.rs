//! Doodle Duel game server library.
//!
//! Pairs two WebSocket connections into a game, drives both players through
//! timed drawing rounds and resolves racing submissions into exactly one
//! outcome per round.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
