//! UseCase: お題取得処理

use std::sync::Arc;

use crate::domain::{
    GameEvent, Label, MessagePusher, PlayerId, RepositoryError, RuleViolation, SessionRepository,
};

use super::error::GetLabelError;

/// 現在のラウンドのお題
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentLabel {
    pub label: Label,
    pub round: u32,
}

/// お題取得のユースケース
///
/// 状態を変更しないため、同じラウンド中は何度呼んでも同じお題を返します。
pub struct GetLabelUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetLabelUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// お題を取得し、呼び出し元にだけ通知する
    pub async fn execute(&self, player_id: &PlayerId) -> Result<CurrentLabel, GetLabelError> {
        let player = self
            .repository
            .get_player(player_id)
            .await
            .map_err(not_in_game)?;
        let game = self
            .repository
            .get_game(&player.game_id)
            .await
            .map_err(not_in_game)?;

        let label = game
            .current_label()
            .cloned()
            .ok_or(RuleViolation::GameFinished)?;
        let current = CurrentLabel {
            label,
            round: game.round_index,
        };

        let event = GameEvent::Label {
            label: current.label.name.clone(),
            translated_label: current.label.translation.clone(),
            round: current.round,
        };
        if let Err(e) = self.message_pusher.push_to(player_id, &event).await {
            tracing::warn!("Failed to push label to '{}': {}", player_id, e);
        }

        Ok(current)
    }
}

fn not_in_game(error: RepositoryError) -> GetLabelError {
    match error {
        RepositoryError::GameNotFound(_) | RepositoryError::PlayerNotFound(_) => {
            GetLabelError::NotInGame
        }
        other => GetLabelError::Repository(other),
    }
}
