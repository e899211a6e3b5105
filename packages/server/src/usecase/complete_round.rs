//! UseCase: ラウンド完了処理（Race Resolver）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CompleteRoundUseCase::execute() メソッド
//! - 2 人目の完了でのみ roundOver がルーム全体に 1 回だけ送信されること
//!
//! ### なぜこのテストが必要か
//! - 勝利と時間切れ、相手の同時提出が競合しても、ラウンドの結果は 1 つでなければならない
//! - roundOver の重複や欠落はクライアントの進行を壊す
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人目の完了（通知なし）と 2 人目の完了（roundOver）
//! - 異常系：同じプレイヤーの 2 回目の完了、古いラウンド番号
//! - エッジケース：相手が切断済みの場合は常に 1 人目として扱われる

use std::sync::Arc;

use crate::domain::{
    GameEvent, MessagePusher, PlayerId, RoundCompletion, SessionRepository, Timestamp,
};

use super::error::CompleteRoundError;

/// ラウンド完了のユースケース
pub struct CompleteRoundUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl CompleteRoundUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// プレイヤーのラウンド完了を記録する
    ///
    /// 判定は Repository の 1 回の不可分な操作で行われ、
    /// 2 人目として完了した呼び出しだけが roundOver を送信します。
    /// 判定と roundOver の送信は別タスクで実行するため、
    /// 呼び出し元がキャンセルされても両者が分断されることはありません。
    pub async fn execute(
        &self,
        player_id: &PlayerId,
        round: u32,
        now: Timestamp,
    ) -> Result<RoundCompletion, CompleteRoundError> {
        let repository = self.repository.clone();
        let message_pusher = self.message_pusher.clone();
        let player_id = player_id.clone();

        tokio::spawn(async move {
            resolve_and_broadcast(repository, message_pusher, player_id, round, now).await
        })
        .await
        .map_err(|e| CompleteRoundError::Task(e.to_string()))?
    }
}

async fn resolve_and_broadcast(
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    player_id: PlayerId,
    round: u32,
    now: Timestamp,
) -> Result<RoundCompletion, CompleteRoundError> {
    let completion = repository.complete_round(&player_id, round, now).await?;

    match &completion {
        RoundCompletion::FirstToFinish => {
            tracing::debug!(
                "Player '{}' finished round {} first, waiting for the opponent",
                player_id,
                round
            );
        }
        RoundCompletion::SecondToFinish {
            game_id,
            round_index,
            game_complete,
        } => {
            tracing::info!(
                "Round {} of game '{}' is over (next round: {}, game complete: {})",
                round,
                game_id,
                round_index,
                game_complete
            );
            if let Err(e) = message_pusher
                .push_to_room(game_id, &GameEvent::RoundOver)
                .await
            {
                tracing::warn!("Failed to broadcast roundOver to game '{}': {}", game_id, e);
            }
        }
    }

    Ok(completion)
}
