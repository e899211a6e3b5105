//! UseCase: 期限切れゲームの削除処理
//!
//! サーバーのバックグラウンドタスクから定期的に呼ばれます。

use std::{sync::Arc, time::Duration};

use doodleduel_shared::time::Clock;

use crate::domain::{GameId, MessagePusher, SessionRepository, Timestamp};

/// 期限切れゲーム削除のユースケース
pub struct SweepExpiredGamesUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    /// ゲームの有効期間（作成時刻から）
    ttl: Duration,
}

impl SweepExpiredGamesUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            ttl,
        }
    }

    /// 有効期間を過ぎたゲームを削除し、そのルームを閉じる
    pub async fn execute(&self) -> Vec<GameId> {
        let ttl_millis = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let cutoff = Timestamp::new(self.clock.now_millis().saturating_sub(ttl_millis));

        let expired = self.repository.delete_games_created_before(cutoff).await;
        for game_id in &expired {
            self.message_pusher.close_room(game_id).await;
        }

        if !expired.is_empty() {
            tracing::info!("Swept {} expired game(s): {:?}", expired.len(), expired);
        }

        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Game, GameEvent, PairingKey},
        usecase::test_support::{TestBed, drain, game},
    };

    #[tokio::test]
    async fn test_sweep_removes_only_expired_games() {
        // テスト項目: 有効期間を過ぎたゲームだけが削除され、ルームも閉じられる
        // given (前提条件):
        let bed = TestBed::new();
        let (alice, mut alice_rx) = bed.connect("alice").await;
        let (carol, _carol_rx) = bed.connect("carol").await;
        let old_game = bed.pair(&alice, &carol, &["sun"]).await;

        bed.clock.advance(50_000);
        let (dave, _dave_rx) = bed.connect("dave").await;
        let fresh = Game {
            created_at: Timestamp::new(50_000),
            ..game("g-fresh", &dave, &["sun"])
        };
        let fresh_game = bed
            .repository
            .join_or_open(
                dave.clone(),
                PairingKey::none(),
                fresh,
                Timestamp::new(50_000),
            )
            .await
            .unwrap()
            .game_id;

        bed.clock.advance(20_000);
        let usecase = SweepExpiredGamesUseCase::new(
            bed.repository.clone(),
            bed.pusher.clone(),
            bed.clock.clone(),
            Duration::from_secs(60),
        );

        // when (操作):
        let swept = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(swept, vec![old_game.clone()]);
        assert!(bed.repository.get_game(&old_game).await.is_err());
        assert!(bed.repository.get_game(&fresh_game).await.is_ok());
        assert!(
            bed.pusher
                .push_to_room(&old_game, &GameEvent::RoundOver)
                .await
                .is_ok()
        );
        assert!(drain(&mut alice_rx).is_empty());
    }
}
