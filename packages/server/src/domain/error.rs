//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{kind} must be at most {max} characters")]
    TooLong { kind: &'static str, max: usize },

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("difficulty {0} is not a valid tier")]
    InvalidDifficulty(u8),

    #[error("unknown language code '{0}'")]
    UnknownLanguage(String),
}

/// ゲームのルールに反する操作
///
/// いずれもクライアント側の誤り（古いリクエストや不正な順序）として扱います。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("you can't join a game with yourself")]
    SelfPairing,

    #[error("player '{0}' has already joined a game")]
    AlreadyInGame(String),

    #[error("the game has not started yet, waiting for an opponent")]
    GameNotReady,

    #[error("round {got} is stale, the game is on round {expected}")]
    StaleRound { expected: u32, got: u32 },

    #[error("round {got} has not started, the game is on round {expected}")]
    RoundNotStarted { expected: u32, got: u32 },

    #[error("the player has already finished this round")]
    RoundAlreadyCompleted,

    #[error("number of rounds exceeded, the game is finished")]
    GameFinished,

    #[error("the game is not finished yet")]
    GameNotFinished,

    #[error("implausible time_left: {0}")]
    ImplausibleTime(String),

    #[error("invalid player state transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("game '{0}' not found")]
    GameNotFound(String),

    #[error("player '{0}' not found")]
    PlayerNotFound(String),

    #[error(transparent)]
    Rule(#[from] RuleViolation),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode message: {0}")]
    EncodeFailed(String),
}

/// 分類器（外部サービス）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    #[error("failed to create classifier client: {0}")]
    Client(String),

    #[error("classifier request failed: {0}")]
    Request(String),

    #[error("classifier responded with status {0}")]
    Status(u16),

    #[error("classifier returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("classifier returned no predictions")]
    NoPredictions,
}

/// ラベルカタログのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelCatalogError {
    #[error("difficulty {0} is not available")]
    UnknownDifficulty(u8),

    #[error("difficulty {difficulty} has only {available} labels, {requested} requested")]
    NotEnoughLabels {
        difficulty: u8,
        available: usize,
        requested: usize,
    },
}

/// 描画画像のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawingError {
    #[error("Wrong image format: image is {size} bytes, limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("Wrong image format: only PNG images are accepted")]
    NotPng,

    #[error("Wrong image format: resolution {width}x{height} is below {min}x{min}")]
    ResolutionTooLow { width: u32, height: u32, min: u32 },

    #[error("Wrong image format: {0}")]
    Undecodable(String),
}

/// 呼び出し元に返すエラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 不正・古いリクエスト
    Client,
    /// 不明または期限切れのゲーム / プレイヤー
    Lookup,
    /// 分類器などの外部サービスの失敗
    Upstream,
    /// サーバー内部の予期しない失敗
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Client => "client",
            ErrorKind::Lookup => "lookup",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Internal => "internal",
        }
    }
}
