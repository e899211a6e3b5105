//! MessagePusher trait 定義
//!
//! クライアントへの通知のインターフェース。
//! 個別送信（プレイヤー自身のスコープ）とルーム送信（game_id のスコープ）の 2 つの機能を提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::MessagePushError,
    event::GameEvent,
    value_object::{GameId, PlayerId},
};

/// クライアントへのメッセージ送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// 接続中のピアへの at-least-once 配送を前提とし、
/// 切断済みのピアへの配送は保証しません。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントを登録（プレイヤー自身のスコープ）
    async fn register_client(&self, player_id: PlayerId, sender: PusherChannel);

    /// クライアントの登録を解除し、参加中のルームからも外す
    async fn unregister_client(&self, player_id: &PlayerId);

    /// クライアントをゲームのルームに参加させる
    async fn join_room(&self, player_id: &PlayerId, game_id: &GameId);

    /// ルームを閉じる
    async fn close_room(&self, game_id: &GameId);

    /// 特定のクライアントに送信
    async fn push_to(&self, player_id: &PlayerId, event: &GameEvent)
    -> Result<(), MessagePushError>;

    /// ルーム内の全クライアントに送信
    async fn push_to_room(&self, game_id: &GameId, event: &GameEvent)
    -> Result<(), MessagePushError>;
}
