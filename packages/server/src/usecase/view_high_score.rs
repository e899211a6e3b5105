//! UseCase: ハイスコア参照処理

use std::sync::Arc;

use doodleduel_shared::time::{Clock, timestamp_to_date};

use crate::domain::{
    GameEvent, LabelCatalog, MessagePusher, PlayerId, ScoreRecord, ScoreRepository,
};

use super::{error::HighScoreError, post_score::valid_difficulty};

/// ハイスコア一覧
#[derive(Debug, Clone, PartialEq)]
pub struct HighScoreBoard {
    /// 今日のスコア（降順）
    pub daily: Vec<ScoreRecord>,
    /// 全期間の上位スコア（降順）
    pub total: Vec<ScoreRecord>,
}

/// ハイスコア参照のユースケース
pub struct ViewHighScoreUseCase {
    score_repository: Arc<dyn ScoreRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    label_catalog: Arc<dyn LabelCatalog>,
    clock: Arc<dyn Clock>,
    /// 全期間の一覧に含める件数
    top_n: usize,
}

impl ViewHighScoreUseCase {
    pub fn new(
        score_repository: Arc<dyn ScoreRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        label_catalog: Arc<dyn LabelCatalog>,
        clock: Arc<dyn Clock>,
        top_n: usize,
    ) -> Self {
        Self {
            score_repository,
            message_pusher,
            label_catalog,
            clock,
            top_n,
        }
    }

    /// 難易度ごとのハイスコアを取得し、本人にだけ通知する
    pub async fn execute(
        &self,
        player_id: &PlayerId,
        difficulty_id: u8,
    ) -> Result<HighScoreBoard, HighScoreError> {
        let difficulty = valid_difficulty(self.label_catalog.as_ref(), difficulty_id)?;
        let today = timestamp_to_date(self.clock.now_millis());

        let board = HighScoreBoard {
            daily: self.score_repository.daily_scores(difficulty, today).await,
            total: self.score_repository.top_scores(difficulty, self.top_n).await,
        };

        let event = GameEvent::HighScores {
            daily: board.daily.clone(),
            total: board.total.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(player_id, &event).await {
            tracing::warn!("Failed to push high scores to '{}': {}", player_id, e);
        }

        Ok(board)
    }
}
