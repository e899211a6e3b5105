//! UseCase: ゲーム一覧取得処理

use std::sync::Arc;

use crate::domain::{GameSnapshot, SessionRepository};

/// ゲーム一覧取得のユースケース
pub struct ListGamesUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl ListGamesUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 進行中のゲームを作成順に返す
    pub async fn execute(&self) -> Vec<GameSnapshot> {
        self.repository.list_games().await
    }
}
