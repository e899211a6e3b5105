//! ドメイン層
//!
//! ゲームセッションのモデルとルール、外部とのインターフェース（trait）を定義します。
//! このモジュールは他の層に依存しません。

pub mod classifier;
pub mod drawing;
pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod label_catalog;
pub mod matchmaking;
pub mod message_pusher;
pub mod repository;
pub mod round;
pub mod value_object;

pub use classifier::{Classification, Classifier};
pub use drawing::{Drawing, DrawingConstraints};
pub use entity::{Game, GameSnapshot, PairingSlot, Player, PlayerState, ScoreRecord};
pub use error::{
    ClassifierError, DrawingError, ErrorKind, LabelCatalogError, MessagePushError,
    RepositoryError, RuleViolation, ValueObjectError,
};
pub use event::{GameEvent, Prediction};
pub use factory::{GameIdFactory, PlayerIdFactory};
pub use label_catalog::LabelCatalog;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{
    DisconnectResult, FinalScoreResult, JoinResult, ScoreRepository, SessionRepository,
};
pub use round::RoundCompletion;
pub use value_object::{
    Difficulty, GameId, Label, Language, PairingKey, PlayerId, Role, Score, TimeLeft, Timestamp,
};
