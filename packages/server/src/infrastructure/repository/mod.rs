//! Repository 実装
//!
//! - `inmemory`: HashMap / Vec をインメモリ DB として使う実装

pub mod inmemory;

pub use inmemory::{InMemoryScoreRepository, InMemorySessionRepository};
