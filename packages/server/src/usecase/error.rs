//! UseCase 層のエラー型
//!
//! 各ユースケースのエラーは `ErrorKind` に分類され、
//! 呼び出し元には `error` イベントとして通知されます。
//! 内部エラーの詳細はログにのみ出力し、クライアントには汎用メッセージを返します。

use thiserror::Error;

use crate::domain::{
    ClassifierError, DrawingError, ErrorKind, GameEvent, LabelCatalogError, RepositoryError,
    RuleViolation, ValueObjectError,
};

/// クライアントに返す内部エラーのメッセージ
const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// クライアントに返す外部サービスエラーのメッセージ
const UPSTREAM_ERROR_MESSAGE: &str = "classification failed, please try again";

/// クライアントに通知できるエラー
pub trait ReportableError: std::error::Error {
    fn kind(&self) -> ErrorKind;

    /// `error` イベントに変換
    fn to_event(&self) -> GameEvent {
        let kind = self.kind();
        let message = match kind {
            ErrorKind::Internal => INTERNAL_ERROR_MESSAGE.to_string(),
            ErrorKind::Upstream => UPSTREAM_ERROR_MESSAGE.to_string(),
            ErrorKind::Client | ErrorKind::Lookup => self.to_string(),
        };
        GameEvent::Error { kind, message }
    }
}

fn repository_kind(error: &RepositoryError) -> ErrorKind {
    match error {
        RepositoryError::GameNotFound(_) | RepositoryError::PlayerNotFound(_) => ErrorKind::Lookup,
        RepositoryError::Rule(RuleViolation::InvalidTransition { .. }) => ErrorKind::Internal,
        RepositoryError::Rule(_) => ErrorKind::Client,
    }
}

fn rule_kind(error: &RuleViolation) -> ErrorKind {
    match error {
        RuleViolation::InvalidTransition { .. } => ErrorKind::Internal,
        _ => ErrorKind::Client,
    }
}

/// 参加（マッチング）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinGameError {
    #[error("difficulty_id is required")]
    MissingDifficulty,

    #[error("difficulty_id {0} is not a valid difficulty")]
    InvalidDifficulty(u8),

    #[error("invalid pair_id: {0}")]
    InvalidPairingKey(ValueObjectError),

    #[error("failed to pick labels: {0}")]
    Labels(#[from] LabelCatalogError),

    #[error("failed to generate game id: {0}")]
    IdGeneration(ValueObjectError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ReportableError for JoinGameError {
    fn kind(&self) -> ErrorKind {
        match self {
            JoinGameError::MissingDifficulty
            | JoinGameError::InvalidDifficulty(_)
            | JoinGameError::InvalidPairingKey(_) => ErrorKind::Client,
            JoinGameError::Labels(_) | JoinGameError::IdGeneration(_) => ErrorKind::Internal,
            JoinGameError::Repository(e) => repository_kind(e),
        }
    }
}

/// お題取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetLabelError {
    #[error("game invalid or expired")]
    NotInGame,

    #[error(transparent)]
    Rule(#[from] RuleViolation),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ReportableError for GetLabelError {
    fn kind(&self) -> ErrorKind {
        match self {
            GetLabelError::NotInGame => ErrorKind::Lookup,
            GetLabelError::Rule(e) => rule_kind(e),
            GetLabelError::Repository(e) => repository_kind(e),
        }
    }
}

/// ラウンド完了のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompleteRoundError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("round completion task failed: {0}")]
    Task(String),
}

impl ReportableError for CompleteRoundError {
    fn kind(&self) -> ErrorKind {
        match self {
            CompleteRoundError::Repository(e) => repository_kind(e),
            CompleteRoundError::Task(_) => ErrorKind::Internal,
        }
    }
}

/// 画像提出のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitDrawingError {
    #[error("game invalid or expired")]
    NotInGame,

    #[error("invalid request: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error(transparent)]
    InvalidImage(#[from] DrawingError),

    #[error(transparent)]
    Rule(#[from] RuleViolation),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    CompleteRound(#[from] CompleteRoundError),
}

impl ReportableError for SubmitDrawingError {
    fn kind(&self) -> ErrorKind {
        match self {
            SubmitDrawingError::NotInGame => ErrorKind::Lookup,
            SubmitDrawingError::InvalidInput(_) | SubmitDrawingError::InvalidImage(_) => {
                ErrorKind::Client
            }
            SubmitDrawingError::Rule(e) => rule_kind(e),
            SubmitDrawingError::Classifier(_) => ErrorKind::Upstream,
            SubmitDrawingError::Repository(e) => repository_kind(e),
            SubmitDrawingError::CompleteRound(e) => e.kind(),
        }
    }
}

/// 最終スコア受け渡しのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndGameError {
    #[error("invalid score: {0}")]
    InvalidScore(#[from] ValueObjectError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ReportableError for EndGameError {
    fn kind(&self) -> ErrorKind {
        match self {
            EndGameError::InvalidScore(_) => ErrorKind::Client,
            EndGameError::Repository(e) => repository_kind(e),
        }
    }
}

/// ハイスコア（登録・参照）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighScoreError {
    #[error("difficulty_id {0} is not a valid difficulty")]
    InvalidDifficulty(u8),

    #[error("invalid score: {0}")]
    InvalidScore(#[from] ValueObjectError),
}

impl ReportableError for HighScoreError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Client
    }
}

/// 切断処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
