//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Summary of a live game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummaryDto {
    pub id: String,
    pub difficulty: u8,
    pub round: u32,
    pub total_rounds: u32,
    pub players: Vec<PlayerSummaryDto>,
    /// RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummaryDto {
    pub id: String,
    pub state: String,
}
