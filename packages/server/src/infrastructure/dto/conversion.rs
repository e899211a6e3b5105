//! Conversion logic between DTOs and domain models.

use doodleduel_shared::time::timestamp_to_rfc3339;

use crate::domain::{GameEvent, GameSnapshot, Player, ScoreRecord};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Model → DTO
// ========================================

impl From<&ScoreRecord> for dto::ScoreEntry {
    fn from(record: &ScoreRecord) -> Self {
        Self {
            id: record.id,
            score: record.score.value(),
        }
    }
}

impl From<GameEvent> for dto::ServerEvent {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::Joined {
                role,
                player_id,
                game_id,
                ready,
            } => Self::JoinGame(dto::JoinGameResponse {
                player_nr: role.as_str().to_string(),
                player_id: player_id.into_string(),
                game_id: game_id.into_string(),
                ready,
            }),
            GameEvent::Label {
                label,
                translated_label,
                round,
            } => Self::GetLabel(dto::LabelResponse {
                label,
                translated_label,
                round,
            }),
            GameEvent::Prediction(prediction) => Self::Prediction(dto::PredictionResponse {
                certainty: prediction.certainty,
                guess: prediction.guess,
                correct_label: prediction.correct_label,
                has_won: prediction.has_won,
                game_state: prediction.game_state.as_str().to_string(),
            }),
            GameEvent::RoundOver => Self::RoundOver(dto::RoundOverNotice { round_over: true }),
            GameEvent::PlayerDisconnected => {
                Self::PlayerDisconnected(dto::PlayerDisconnectedNotice {
                    player_disconnected: true,
                })
            }
            GameEvent::EndGame { score, player_id } => Self::EndGame(dto::EndGameNotice {
                score: score.value(),
                player_id: player_id.into_string(),
            }),
            GameEvent::HighScores { daily, total } => {
                Self::ViewHighScore(dto::HighScoreResponse {
                    daily: daily.iter().map(dto::ScoreEntry::from).collect(),
                    total: total.iter().map(dto::ScoreEntry::from).collect(),
                })
            }
            GameEvent::ScorePosted { score_id } => {
                Self::ScorePosted(dto::ScorePostedResponse { score_id })
            }
            GameEvent::Error { kind, message } => Self::Error(dto::ErrorResponse {
                kind: kind.as_str().to_string(),
                message,
            }),
        }
    }
}

impl From<&Player> for http::PlayerSummaryDto {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.as_str().to_string(),
            state: player.state.as_str().to_string(),
        }
    }
}

impl From<GameSnapshot> for http::GameSummaryDto {
    fn from(snapshot: GameSnapshot) -> Self {
        let GameSnapshot { game, players } = snapshot;
        Self {
            id: game.id.as_str().to_string(),
            difficulty: game.difficulty.value(),
            round: game.round_index,
            total_rounds: game.total_rounds(),
            players: players.iter().map(http::PlayerSummaryDto::from).collect(),
            created_at: timestamp_to_rfc3339(game.created_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{
        Difficulty, ErrorKind, Game, GameId, Label, PlayerId, PlayerState, Prediction, Role,
        Score, Timestamp,
    };

    fn pid(value: &str) -> PlayerId {
        PlayerId::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_joined_event_to_dto() {
        // テスト項目: Joined イベントが joinGame DTO に変換される
        // given (前提条件):
        let event = GameEvent::Joined {
            role: Role::Player2,
            player_id: pid("bob"),
            game_id: GameId::new("g1".to_string()).unwrap(),
            ready: true,
        };

        // when (操作):
        let dto: dto::ServerEvent = event.into();

        // then (期待する結果):
        assert_eq!(
            dto,
            dto::ServerEvent::JoinGame(dto::JoinGameResponse {
                player_nr: "player_2".to_string(),
                player_id: "bob".to_string(),
                game_id: "g1".to_string(),
                ready: true,
            })
        );
    }

    #[test]
    fn test_prediction_event_to_json() {
        // テスト項目: Prediction イベントが期待する JSON になる
        // given (前提条件):
        let mut certainty = BTreeMap::new();
        certainty.insert("sun".to_string(), 0.9);
        let event = GameEvent::Prediction(Prediction {
            certainty,
            guess: "sun".to_string(),
            correct_label: "sun".to_string(),
            has_won: true,
            game_state: PlayerState::Done,
        });

        // when (操作):
        let json = serde_json::to_value(dto::ServerEvent::from(event)).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "event": "prediction",
                "data": {
                    "certainty": {"sun": 0.9},
                    "guess": "sun",
                    "correct_label": "sun",
                    "has_won": true,
                    "game_state": "Done"
                }
            })
        );
    }

    #[test]
    fn test_high_scores_and_error_to_dto() {
        // テスト項目: ハイスコアとエラーのイベントが DTO に変換される
        // given (前提条件):
        let record = ScoreRecord {
            id: 7,
            player_id: pid("alice"),
            score: Score::new(12.5).unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            difficulty: Difficulty::new(1).unwrap(),
        };

        // when (操作):
        let scores: dto::ServerEvent = GameEvent::HighScores {
            daily: vec![record.clone()],
            total: vec![record],
        }
        .into();
        let error: dto::ServerEvent = GameEvent::Error {
            kind: ErrorKind::Lookup,
            message: "game_id invalid or expired".to_string(),
        }
        .into();

        // then (期待する結果):
        match scores {
            dto::ServerEvent::ViewHighScore(response) => {
                assert_eq!(response.total, vec![dto::ScoreEntry { id: 7, score: 12.5 }]);
                assert_eq!(response.daily.len(), 1);
            }
            other => panic!("Expected ViewHighScore, got: {other:?}"),
        }
        assert_eq!(
            error,
            dto::ServerEvent::Error(dto::ErrorResponse {
                kind: "lookup".to_string(),
                message: "game_id invalid or expired".to_string(),
            })
        );
    }

    #[test]
    fn test_game_snapshot_to_summary() {
        // テスト項目: GameSnapshot が GameSummaryDto に変換される
        // given (前提条件):
        let game_id = GameId::new("g1".to_string()).unwrap();
        let game = Game::new(
            game_id.clone(),
            vec![Label::new("sun", None), Label::new("tree", None)],
            Difficulty::new(2).unwrap(),
            pid("alice"),
            Timestamp::new(0),
        );
        let snapshot = GameSnapshot {
            game,
            players: vec![Player::new(pid("alice"), game_id, PlayerState::Waiting)],
        };

        // when (操作):
        let summary: http::GameSummaryDto = snapshot.into();

        // then (期待する結果):
        assert_eq!(summary.id, "g1");
        assert_eq!(summary.difficulty, 2);
        assert_eq!(summary.round, 1);
        assert_eq!(summary.total_rounds, 2);
        assert_eq!(summary.players[0].state, "Waiting");
        assert_eq!(summary.created_at, "1970-01-01T00:00:00+00:00");
    }
}
