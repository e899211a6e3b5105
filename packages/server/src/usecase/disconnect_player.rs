//! UseCase: プレイヤー切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectPlayerUseCase::execute() メソッド
//! - 切断時のゲームの削除 / 残留と、残ったプレイヤーへの通知
//!
//! ### なぜこのテストが必要か
//! - 両者が切断したゲームは必ず削除されなければならない
//! - 相手が接続中なら playerDisconnected が届き、ゲームは残る
//! - ゲームに参加する前の切断でもエラーにならないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：相手が接続中の切断（通知あり）
//! - 正常系：相手も切断済みの切断（ゲーム削除、通知なし）
//! - エッジケース：対戦相手を待っている間の切断、ゲーム未参加の切断

use std::sync::Arc;

use crate::domain::{
    DisconnectResult, GameEvent, MessagePusher, PlayerId, RepositoryError, SessionRepository,
};

use super::error::DisconnectError;

/// プレイヤー切断のユースケース
pub struct DisconnectPlayerUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectPlayerUseCase {
    /// 新しい DisconnectPlayerUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// プレイヤー切断を実行
    ///
    /// # Arguments
    ///
    /// * `player_id` - 切断したプレイヤーの ID
    ///
    /// # Returns
    ///
    /// * `Ok(Some(DisconnectResult))` - ゲームに参加していたプレイヤーの切断結果
    /// * `Ok(None)` - ゲームに参加していなかった
    /// * `Err(DisconnectError)` - 切断処理の失敗
    pub async fn execute(
        &self,
        player_id: &PlayerId,
    ) -> Result<Option<DisconnectResult>, DisconnectError> {
        // 1. MessagePusher からクライアントを登録解除（ルームからも外れる）
        self.message_pusher.unregister_client(player_id).await;

        // 2. Repository 経由でプレイヤーを切断状態に
        let result = match self.repository.disconnect_player(player_id).await {
            Ok(result) => result,
            Err(RepositoryError::PlayerNotFound(_)) => {
                tracing::debug!("Player '{}' left without joining a game", player_id);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        // 3. ゲームの削除、または残ったプレイヤーへの通知
        //    相手がまだルームに参加していない可能性があるため、接続に直接送る
        match &result.opponent {
            None => {
                self.message_pusher.close_room(&result.game_id).await;
                tracing::info!(
                    "Game '{}' torn down after '{}' disconnected",
                    result.game_id,
                    player_id
                );
            }
            Some(opponent) => {
                tracing::info!(
                    "Player '{}' disconnected from game '{}', notifying '{}'",
                    player_id,
                    result.game_id,
                    opponent
                );
                if let Err(e) = self
                    .message_pusher
                    .push_to(opponent, &GameEvent::PlayerDisconnected)
                    .await
                {
                    tracing::warn!("Failed to push playerDisconnected to '{}': {}", opponent, e);
                }
            }
        }

        Ok(Some(result))
    }
}
