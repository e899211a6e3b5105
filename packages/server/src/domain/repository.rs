//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 原子性
//!
//! `join_or_open` / `complete_round` / `disconnect_player` / `record_final_score` は
//! それぞれ 1 つの不可分な read-modify-write として実装しなければなりません。
//! 2 人のプレイヤーのハンドラは並行に動くため、ここでの原子性が
//! 「1 ラウンドにつき roundOver はちょうど 1 回」を保証する唯一の仕組みです。

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{
    entity::{Game, GameSnapshot, Player, ScoreRecord},
    error::RepositoryError,
    round::RoundCompletion,
    value_object::{Difficulty, GameId, PairingKey, PlayerId, Role, Score, Timestamp},
};

/// マッチングの結果
#[derive(Debug, Clone, PartialEq)]
pub struct JoinResult {
    pub role: Role,
    pub game_id: GameId,
    /// ペアが成立した場合の対戦相手（player_1）
    pub opponent: Option<PlayerId>,
    pub ready: bool,
}

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq)]
pub struct DisconnectResult {
    pub game_id: GameId,
    /// playerDisconnected を受け取る接続中の対戦相手
    pub opponent: Option<PlayerId>,
    /// ゲームが削除されたか（相手も切断済み、または相手がいない）
    pub torn_down: bool,
}

/// 最終スコア登録の結果
#[derive(Debug, Clone, PartialEq)]
pub struct FinalScoreResult {
    pub game_id: GameId,
    /// スコアを受け取る接続中の対戦相手
    pub opponent: Option<PlayerId>,
    /// 両者のスコアが揃いゲームが削除されたか
    pub finalized: bool,
}

/// Session Store trait
///
/// Game / Player / PairingSlot を保持します。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// ゲームを取得
    async fn get_game(&self, game_id: &GameId) -> Result<Game, RepositoryError>;

    /// プレイヤーを取得
    async fn get_player(&self, player_id: &PlayerId) -> Result<Player, RepositoryError>;

    /// 開いているスロットに参加する。なければ `candidate` を作成してスロットを開く
    ///
    /// `candidate` は `player_id` を player_1 とする新規ゲームで、
    /// 一致するスロットがなかった場合にのみ保存される。
    async fn join_or_open(
        &self,
        player_id: PlayerId,
        key: PairingKey,
        candidate: Game,
        now: Timestamp,
    ) -> Result<JoinResult, RepositoryError>;

    /// プレイヤーのラウンド完了を記録し、2 人目ならラウンドを進める
    async fn complete_round(
        &self,
        player_id: &PlayerId,
        round: u32,
        now: Timestamp,
    ) -> Result<RoundCompletion, RepositoryError>;

    /// プレイヤーを切断状態にし、必要ならゲームを削除する
    async fn disconnect_player(
        &self,
        player_id: &PlayerId,
    ) -> Result<DisconnectResult, RepositoryError>;

    /// 最終スコアを記録し、両者が揃えばゲームを削除する
    async fn record_final_score(
        &self,
        player_id: &PlayerId,
        score: Score,
    ) -> Result<FinalScoreResult, RepositoryError>;

    /// `cutoff` より前に作成されたゲームを削除し、削除した ID を返す
    async fn delete_games_created_before(&self, cutoff: Timestamp) -> Vec<GameId>;

    /// 全ゲームのスナップショット
    async fn list_games(&self) -> Vec<GameSnapshot>;
}

/// ハイスコア Repository trait
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// スコアを登録し、採番した ID を返す
    async fn insert_score(
        &self,
        player_id: PlayerId,
        score: Score,
        date: NaiveDate,
        difficulty: Difficulty,
    ) -> u64;

    /// 難易度ごとの上位 `limit` 件（スコア降順）
    async fn top_scores(&self, difficulty: Difficulty, limit: usize) -> Vec<ScoreRecord>;

    /// 指定日のスコア（スコア降順）
    async fn daily_scores(&self, difficulty: Difficulty, date: NaiveDate) -> Vec<ScoreRecord>;
}
