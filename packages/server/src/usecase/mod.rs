//! UseCase 層
//!
//! クライアントのイベントごとのユースケースを定義します。
//! 各ユースケースは Repository と MessagePusher の trait だけに依存します。

pub mod complete_round;
pub mod connect_player;
pub mod disconnect_player;
pub mod end_game;
pub mod error;
pub mod get_label;
pub mod join_game;
pub mod list_games;
pub mod post_score;
pub mod submit_drawing;
pub mod sweep_expired_games;
pub mod view_high_score;

#[cfg(test)]
mod test_support;

pub use complete_round::CompleteRoundUseCase;
pub use connect_player::ConnectPlayerUseCase;
pub use disconnect_player::DisconnectPlayerUseCase;
pub use end_game::EndGameUseCase;
pub use error::{
    CompleteRoundError, DisconnectError, EndGameError, GetLabelError, HighScoreError,
    JoinGameError, ReportableError, SubmitDrawingError,
};
pub use get_label::{CurrentLabel, GetLabelUseCase};
pub use join_game::JoinGameUseCase;
pub use list_games::ListGamesUseCase;
pub use post_score::PostScoreUseCase;
pub use submit_drawing::{
    SubmitDrawingOutcome, SubmitDrawingRequest, SubmitDrawingSettings, SubmitDrawingUseCase,
};
pub use sweep_expired_games::SweepExpiredGamesUseCase;
pub use view_high_score::{HighScoreBoard, ViewHighScoreUseCase};
