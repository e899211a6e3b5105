//! UseCase: ゲーム終了（最終スコアの受け渡し）処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EndGameUseCase::execute() メソッド
//! - 最終スコアの相手への通知と、両者が揃った時点でのゲーム削除
//!
//! ### なぜこのテストが必要か
//! - 終了したゲームのレコードは必ず削除されなければならない
//! - 全ラウンドが終わる前の endGame は拒否されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：両者が順にスコアを送信
//! - 異常系：ゲーム途中の endGame
//! - エッジケース：相手が切断済み

use std::sync::Arc;

use crate::domain::{
    FinalScoreResult, GameEvent, MessagePusher, PlayerId, Score, SessionRepository,
};

use super::error::EndGameError;

/// ゲーム終了のユースケース
pub struct EndGameUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl EndGameUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 最終スコアを記録し、接続中の相手に送る
    ///
    /// 両者のスコアが揃うか相手がいなくなった時点で、ゲームとルームを削除します。
    pub async fn execute(
        &self,
        player_id: &PlayerId,
        score: f64,
    ) -> Result<FinalScoreResult, EndGameError> {
        let score = Score::new(score)?;
        let result = self.repository.record_final_score(player_id, score).await?;

        if let Some(opponent) = &result.opponent {
            let event = GameEvent::EndGame {
                score,
                player_id: player_id.clone(),
            };
            if let Err(e) = self.message_pusher.push_to(opponent, &event).await {
                tracing::warn!("Failed to hand off final score to '{}': {}", opponent, e);
            }
        }

        if result.finalized {
            self.message_pusher.close_room(&result.game_id).await;
            tracing::info!("Game '{}' finished and removed", result.game_id);
        }

        Ok(result)
    }
}
