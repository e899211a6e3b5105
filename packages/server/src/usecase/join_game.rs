//! UseCase: 参加（マッチング）処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinGameUseCase::execute() メソッド
//! - ペアリングキーと難易度によるマッチング、ルームへの参加、参加結果の通知
//!
//! ### なぜこのテストが必要か
//! - 同じキー・難易度の 2 人が同じゲームに入ることを保証
//! - 1 人目には 2 人目の参加時に ready が通知される
//! - 不正な難易度や自分自身とのペアリングが拒否されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：キー "x"、難易度 1 の 2 人のマッチング
//! - 異常系：難易度の指定なし / 無効な難易度 / 同じ接続からの 2 回目の参加
//! - エッジケース：キーなし同士のマッチング、難易度違いは別のゲーム

use std::sync::Arc;

use doodleduel_shared::time::Clock;

use crate::domain::{
    Difficulty, Game, GameEvent, GameIdFactory, JoinResult, LabelCatalog, MessagePusher,
    PairingKey, PlayerId, Role, SessionRepository, Timestamp,
};

use super::error::JoinGameError;

/// 参加のユースケース
pub struct JoinGameUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    label_catalog: Arc<dyn LabelCatalog>,
    clock: Arc<dyn Clock>,
    /// 1 ゲームのラウンド数
    rounds: usize,
}

impl JoinGameUseCase {
    /// 新しい JoinGameUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        label_catalog: Arc<dyn LabelCatalog>,
        clock: Arc<dyn Clock>,
        rounds: usize,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            label_catalog,
            clock,
            rounds,
        }
    }

    /// 参加を実行
    ///
    /// # Arguments
    ///
    /// * `player_id` - 参加するプレイヤー（接続ごとの ID）
    /// * `pair_id` - 任意のペアリングキー
    /// * `difficulty_id` - 難易度（必須）
    ///
    /// # Returns
    ///
    /// * `Ok(JoinResult)` - 役割・ゲーム ID・準備完了かどうか
    /// * `Err(JoinGameError)` - 参加失敗
    pub async fn execute(
        &self,
        player_id: PlayerId,
        pair_id: Option<String>,
        difficulty_id: Option<u8>,
    ) -> Result<JoinResult, JoinGameError> {
        // 1. 入力の検証
        let raw_difficulty = difficulty_id.ok_or(JoinGameError::MissingDifficulty)?;
        let difficulty = Difficulty::new(raw_difficulty)
            .ok()
            .filter(|d| self.label_catalog.is_valid_difficulty(*d))
            .ok_or(JoinGameError::InvalidDifficulty(raw_difficulty))?;
        let key = PairingKey::from_optional(pair_id).map_err(JoinGameError::InvalidPairingKey)?;

        // 2. 新規ゲームの候補を作成（一致するスロットがなければこれが保存される）
        let now = Timestamp::new(self.clock.now_millis());
        let labels = self.label_catalog.sample_labels(difficulty, self.rounds)?;
        let game_id = GameIdFactory::generate().map_err(JoinGameError::IdGeneration)?;
        let candidate = Game::new(game_id, labels, difficulty, player_id.clone(), now);

        // 3. Repository で不可分にマッチング
        let result = self
            .repository
            .join_or_open(player_id.clone(), key.clone(), candidate, now)
            .await?;

        tracing::info!(
            "Player '{}' joined game '{}' as {} (pair_id: {:?}, difficulty: {}, ready: {})",
            player_id,
            result.game_id,
            result.role.as_str(),
            key.as_deref(),
            difficulty,
            result.ready
        );

        // 4. ルームに参加し、参加結果を通知
        self.message_pusher
            .join_room(&player_id, &result.game_id)
            .await;
        let joined = GameEvent::Joined {
            role: result.role,
            player_id: player_id.clone(),
            game_id: result.game_id.clone(),
            ready: result.ready,
        };
        if let Err(e) = self.message_pusher.push_to(&player_id, &joined).await {
            tracing::warn!("Failed to notify '{}' of joinGame: {}", player_id, e);
        }

        // 5. 待っていた 1 人目に準備完了を通知
        if let Some(opponent) = &result.opponent {
            let ready = GameEvent::Joined {
                role: Role::Player1,
                player_id: opponent.clone(),
                game_id: result.game_id.clone(),
                ready: true,
            };
            if let Err(e) = self.message_pusher.push_to(opponent, &ready).await {
                tracing::warn!("Failed to notify '{}' of joinGame: {}", opponent, e);
            }
        }

        Ok(result)
    }
}
