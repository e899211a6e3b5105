//! クライアントに通知するゲームイベント
//!
//! UseCase 層はこのイベントを MessagePusher に渡し、
//! ワイヤーフォーマット（JSON）への変換は Infrastructure 層の DTO が担います。

use std::collections::BTreeMap;

use super::{
    entity::{PlayerState, ScoreRecord},
    error::ErrorKind,
    value_object::{GameId, PlayerId, Role, Score},
};

/// 分類結果の通知内容
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub certainty: BTreeMap<String, f64>,
    pub guess: String,
    pub correct_label: String,
    pub has_won: bool,
    /// このプレイヤーにとってラウンドが続いているか（Playing）終わったか（Done）
    pub game_state: PlayerState,
}

/// ゲームイベント
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// マッチング結果（個別）
    Joined {
        role: Role,
        player_id: PlayerId,
        game_id: GameId,
        ready: bool,
    },
    /// 現在のラウンドのお題（個別）
    Label {
        label: String,
        translated_label: Option<String>,
        round: u32,
    },
    /// 分類結果（個別）
    Prediction(Prediction),
    /// ラウンド終了（ルーム全体、1 ラウンドにつき 1 回）
    RoundOver,
    /// 対戦相手の切断（ルーム全体）
    PlayerDisconnected,
    /// 最終スコアの受け渡し（対戦相手へ個別）
    EndGame { score: Score, player_id: PlayerId },
    /// ハイスコア一覧（個別）
    HighScores {
        daily: Vec<ScoreRecord>,
        total: Vec<ScoreRecord>,
    },
    /// スコア登録完了（個別）
    ScorePosted { score_id: u64 },
    /// エラー（個別）
    Error { kind: ErrorKind, message: String },
}

impl GameEvent {
    /// イベント名（ログ用）
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Joined { .. } => "joinGame",
            GameEvent::Label { .. } => "getLabel",
            GameEvent::Prediction(_) => "prediction",
            GameEvent::RoundOver => "roundOver",
            GameEvent::PlayerDisconnected => "playerDisconnected",
            GameEvent::EndGame { .. } => "endGame",
            GameEvent::HighScores { .. } => "viewHighScore",
            GameEvent::ScorePosted { .. } => "scorePosted",
            GameEvent::Error { .. } => "error",
        }
    }
}
