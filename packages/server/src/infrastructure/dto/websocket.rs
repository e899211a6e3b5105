//! WebSocket event DTOs.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": {...}}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Events sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinGame(JoinGameRequest),
    GetLabel(GetLabelRequest),
    Classify(ClassifyRequest),
    PostScore(PostScoreRequest),
    ViewHighScore(ViewHighScoreRequest),
    EndGame(EndGameRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinGameRequest {
    #[serde(default)]
    pub pair_id: Option<String>,
    #[serde(default)]
    pub difficulty_id: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetLabelRequest {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub time_left: f64,
    /// Round the drawing belongs to; omitted means the current round.
    #[serde(default)]
    pub round: Option<u32>,
    /// "EN" (default) or "NO".
    #[serde(default)]
    pub lang: Option<String>,
    /// Base64 encoded PNG.
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostScoreRequest {
    pub score: f64,
    pub difficulty_id: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewHighScoreRequest {
    pub difficulty_id: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndGameRequest {
    pub score: f64,
}

/// Events sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    JoinGame(JoinGameResponse),
    GetLabel(LabelResponse),
    Prediction(PredictionResponse),
    RoundOver(RoundOverNotice),
    PlayerDisconnected(PlayerDisconnectedNotice),
    EndGame(EndGameNotice),
    ViewHighScore(HighScoreResponse),
    ScorePosted(ScorePostedResponse),
    Error(ErrorResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinGameResponse {
    /// "player_1" or "player_2"
    pub player_nr: String,
    pub player_id: String,
    pub game_id: String,
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelResponse {
    pub label: String,
    pub translated_label: Option<String>,
    pub round: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub certainty: BTreeMap<String, f64>,
    pub guess: String,
    pub correct_label: String,
    pub has_won: bool,
    /// "Playing" while the round goes on for this player, "Done" once finished.
    pub game_state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOverNotice {
    pub round_over: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDisconnectedNotice {
    pub player_disconnected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndGameNotice {
    pub score: f64,
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub id: u64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreResponse {
    pub daily: Vec<ScoreEntry>,
    pub total: Vec<ScoreEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePostedResponse {
    pub score_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// "client", "lookup", "upstream" or "internal"
    pub kind: String,
    pub message: String,
}
