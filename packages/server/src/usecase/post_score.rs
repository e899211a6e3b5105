//! UseCase: ハイスコア登録処理

use std::sync::Arc;

use doodleduel_shared::time::{Clock, timestamp_to_date};

use crate::domain::{
    Difficulty, GameEvent, LabelCatalog, MessagePusher, PlayerId, Score, ScoreRepository,
};

use super::error::HighScoreError;

/// ハイスコア登録のユースケース
pub struct PostScoreUseCase {
    score_repository: Arc<dyn ScoreRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    label_catalog: Arc<dyn LabelCatalog>,
    clock: Arc<dyn Clock>,
}

impl PostScoreUseCase {
    pub fn new(
        score_repository: Arc<dyn ScoreRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        label_catalog: Arc<dyn LabelCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            score_repository,
            message_pusher,
            label_catalog,
            clock,
        }
    }

    /// 今日の日付でスコアを登録し、採番した ID を本人に通知する
    pub async fn execute(
        &self,
        player_id: &PlayerId,
        score: f64,
        difficulty_id: u8,
    ) -> Result<u64, HighScoreError> {
        let difficulty = valid_difficulty(self.label_catalog.as_ref(), difficulty_id)?;
        let score = Score::new(score)?;
        let date = timestamp_to_date(self.clock.now_millis());

        let score_id = self
            .score_repository
            .insert_score(player_id.clone(), score, date, difficulty)
            .await;
        tracing::info!(
            "Score {} posted by '{}' (difficulty: {}, id: {})",
            score.value(),
            player_id,
            difficulty,
            score_id
        );

        if let Err(e) = self
            .message_pusher
            .push_to(player_id, &GameEvent::ScorePosted { score_id })
            .await
        {
            tracing::warn!("Failed to acknowledge score to '{}': {}", player_id, e);
        }

        Ok(score_id)
    }
}

/// 難易度がカタログで有効なティアか検証する
pub(super) fn valid_difficulty(
    catalog: &dyn LabelCatalog,
    difficulty_id: u8,
) -> Result<Difficulty, HighScoreError> {
    Difficulty::new(difficulty_id)
        .ok()
        .filter(|d| catalog.is_valid_difficulty(*d))
        .ok_or(HighScoreError::InvalidDifficulty(difficulty_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::{
            InMemoryScoreRepository,
            dto::websocket::{ScorePostedResponse, ServerEvent},
        },
        usecase::test_support::{TestBed, drain, translating_catalog},
    };

    #[tokio::test]
    async fn test_post_score_stores_and_acknowledges() {
        // テスト項目: スコアが登録され、採番された ID が本人に届く
        // given (前提条件):
        let bed = TestBed::new();
        let (alice, mut alice_rx) = bed.connect("alice").await;
        let scores = Arc::new(InMemoryScoreRepository::default());
        let usecase = PostScoreUseCase::new(
            scores.clone(),
            bed.pusher.clone(),
            translating_catalog(&[]),
            bed.clock.clone(),
        );

        // when (操作):
        let first = usecase.execute(&alice, 42.0, 2).await.unwrap();
        let second = usecase.execute(&alice, 17.0, 2).await.unwrap();

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(
            drain(&mut alice_rx),
            vec![
                ServerEvent::ScorePosted(ScorePostedResponse { score_id: first }),
                ServerEvent::ScorePosted(ScorePostedResponse { score_id: second }),
            ]
        );
        let top = scores.top_scores(Difficulty::new(2).unwrap(), 10).await;
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].score.value(), 42.0);
        assert_eq!(top[0].date, timestamp_to_date(0));
    }

    #[tokio::test]
    async fn test_post_score_rejects_unknown_difficulty() {
        // テスト項目: 無効な難易度のスコアは登録されない
        // given (前提条件):
        let bed = TestBed::new();
        let (alice, mut alice_rx) = bed.connect("alice").await;
        let scores = Arc::new(InMemoryScoreRepository::default());
        let usecase = PostScoreUseCase::new(
            scores.clone(),
            bed.pusher.clone(),
            translating_catalog(&[]),
            bed.clock.clone(),
        );

        // when (操作):
        let result = usecase.execute(&alice, 42.0, 7).await;

        // then (期待する結果):
        assert_eq!(result, Err(HighScoreError::InvalidDifficulty(7)));
        assert!(drain(&mut alice_rx).is_empty());
        assert!(
            scores
                .top_scores(Difficulty::new(7).unwrap(), 10)
                .await
                .is_empty()
        );
    }
}
