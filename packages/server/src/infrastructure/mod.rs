//! Infrastructure 層
//!
//! ドメイン層の trait の具体的な実装と、ワイヤーフォーマットの DTO を提供します。

pub mod classifier;
pub mod dto;
pub mod label_catalog;
pub mod message_pusher;
pub mod repository;

pub use classifier::HttpClassifier;
pub use label_catalog::ConfigLabelCatalog;
pub use message_pusher::WebSocketMessagePusher;
pub use repository::{InMemoryScoreRepository, InMemorySessionRepository};
