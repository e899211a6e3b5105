//! Shared application state.

use std::{sync::Arc, time::Duration};

use doodleduel_shared::time::Clock;

use crate::{
    config::GameConfig,
    domain::{Classifier, LabelCatalog, MessagePusher, ScoreRepository, SessionRepository},
    infrastructure::{
        ConfigLabelCatalog, InMemoryScoreRepository, InMemorySessionRepository,
        WebSocketMessagePusher,
    },
    usecase::{
        CompleteRoundUseCase, ConnectPlayerUseCase, DisconnectPlayerUseCase, EndGameUseCase,
        GetLabelUseCase, JoinGameUseCase, ListGamesUseCase, PostScoreUseCase,
        SubmitDrawingSettings, SubmitDrawingUseCase, SweepExpiredGamesUseCase,
        ViewHighScoreUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// MessagePusher（メッセージ通知の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub connect_player_usecase: Arc<ConnectPlayerUseCase>,
    pub disconnect_player_usecase: Arc<DisconnectPlayerUseCase>,
    pub join_game_usecase: Arc<JoinGameUseCase>,
    pub get_label_usecase: Arc<GetLabelUseCase>,
    pub submit_drawing_usecase: Arc<SubmitDrawingUseCase>,
    pub end_game_usecase: Arc<EndGameUseCase>,
    pub post_score_usecase: Arc<PostScoreUseCase>,
    pub view_high_score_usecase: Arc<ViewHighScoreUseCase>,
    pub list_games_usecase: Arc<ListGamesUseCase>,
    pub sweep_expired_games_usecase: Arc<SweepExpiredGamesUseCase>,
    /// Maximum accepted size of a base64 encoded image.
    pub max_image_bytes: usize,
}

impl AppState {
    /// Wire the in-memory stores, the WebSocket pusher and every usecase.
    ///
    /// Dependencies are created in order:
    /// 1. Repositories
    /// 2. MessagePusher
    /// 3. Label catalog
    /// 4. UseCases
    pub fn new(
        config: &GameConfig,
        classifier: Arc<dyn Classifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // 1. Repositories (in-memory)
        let repository: Arc<dyn SessionRepository> =
            Arc::new(InMemorySessionRepository::default());
        let score_repository: Arc<dyn ScoreRepository> =
            Arc::new(InMemoryScoreRepository::default());

        // 2. MessagePusher (WebSocket implementation)
        let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::default());

        // 3. Label catalog
        let label_catalog: Arc<dyn LabelCatalog> = Arc::new(ConfigLabelCatalog::new(
            config.difficulties.clone(),
            config.labels.clone(),
        ));

        // 4. UseCases
        let complete_round_usecase = Arc::new(CompleteRoundUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        ));

        Self {
            message_pusher: message_pusher.clone(),
            connect_player_usecase: Arc::new(ConnectPlayerUseCase::new(message_pusher.clone())),
            disconnect_player_usecase: Arc::new(DisconnectPlayerUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            join_game_usecase: Arc::new(JoinGameUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                label_catalog.clone(),
                clock.clone(),
                config.rounds as usize,
            )),
            get_label_usecase: Arc::new(GetLabelUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            submit_drawing_usecase: Arc::new(SubmitDrawingUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                classifier,
                label_catalog.clone(),
                clock.clone(),
                SubmitDrawingSettings::from(config),
                complete_round_usecase,
            )),
            end_game_usecase: Arc::new(EndGameUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            post_score_usecase: Arc::new(PostScoreUseCase::new(
                score_repository.clone(),
                message_pusher.clone(),
                label_catalog.clone(),
                clock.clone(),
            )),
            view_high_score_usecase: Arc::new(ViewHighScoreUseCase::new(
                score_repository,
                message_pusher.clone(),
                label_catalog,
                clock.clone(),
                config.high_score_top_n,
            )),
            list_games_usecase: Arc::new(ListGamesUseCase::new(repository.clone())),
            sweep_expired_games_usecase: Arc::new(SweepExpiredGamesUseCase::new(
                repository,
                message_pusher,
                clock,
                Duration::from_secs(config.game_ttl_secs),
            )),
            max_image_bytes: config.max_image_bytes,
        }
    }
}
