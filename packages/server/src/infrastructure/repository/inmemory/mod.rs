//! インメモリ Repository 実装

mod score;
mod session;

pub use score::{InMemoryScoreRepository, ScoreTable};
pub use session::{InMemorySessionRepository, SessionTables};
