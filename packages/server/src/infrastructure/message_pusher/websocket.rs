//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理（プレイヤー自身のスコープ）
//! - ルーム（game_id のスコープ）のメンバー管理
//! - `GameEvent` を DTO 経由で JSON に変換して送信
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! 送信先ごとのチャンネルは FIFO なので、同じプレイヤーに対しては
//! push した順番どおりにメッセージが届きます。

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{GameEvent, GameId, MessagePushError, MessagePusher, PlayerId, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// 接続中のクライアントとルーム
#[derive(Debug, Default)]
pub struct PusherRegistry {
    /// Key: player_id, Value: PusherChannel
    clients: HashMap<PlayerId, PusherChannel>,
    /// Key: game_id, Value: ルームに参加しているプレイヤー
    rooms: HashMap<GameId, HashSet<PlayerId>>,
}

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    registry: Arc<Mutex<PusherRegistry>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(registry: Arc<Mutex<PusherRegistry>>) -> Self {
        Self { registry }
    }

    fn encode(event: &GameEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event.clone()))
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(PusherRegistry::default())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, player_id: PlayerId, sender: PusherChannel) {
        let mut registry = self.registry.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", player_id);
        registry.clients.insert(player_id, sender);
    }

    async fn unregister_client(&self, player_id: &PlayerId) {
        let mut registry = self.registry.lock().await;
        registry.clients.remove(player_id);
        registry.rooms.retain(|_, members| {
            members.remove(player_id);
            !members.is_empty()
        });
        tracing::debug!("Client '{}' unregistered from MessagePusher", player_id);
    }

    async fn join_room(&self, player_id: &PlayerId, game_id: &GameId) {
        let mut registry = self.registry.lock().await;
        registry
            .rooms
            .entry(game_id.clone())
            .or_default()
            .insert(player_id.clone());
        tracing::debug!("Client '{}' joined room '{}'", player_id, game_id);
    }

    async fn close_room(&self, game_id: &GameId) {
        let mut registry = self.registry.lock().await;
        if registry.rooms.remove(game_id).is_some() {
            tracing::debug!("Room '{}' closed", game_id);
        }
    }

    async fn push_to(
        &self,
        player_id: &PlayerId,
        event: &GameEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let registry = self.registry.lock().await;

        if let Some(sender) = registry.clients.get(player_id) {
            sender
                .send(content)
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed '{}' to client '{}'", event.name(), player_id);
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(
                player_id.as_str().to_string(),
            ))
        }
    }

    async fn push_to_room(
        &self,
        game_id: &GameId,
        event: &GameEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let registry = self.registry.lock().await;

        let Some(members) = registry.rooms.get(game_id) else {
            tracing::warn!("Room '{}' not found, '{}' dropped", game_id, event.name());
            return Ok(());
        };

        for member in members {
            match registry.clients.get(member) {
                // ルーム送信では一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.clone()) {
                        tracing::warn!("Failed to push message to client '{}': {}", member, e);
                    } else {
                        tracing::debug!(
                            "Pushed '{}' to client '{}' in room '{}'",
                            event.name(),
                            member,
                            game_id
                        );
                    }
                }
                None => {
                    tracing::warn!(
                        "Client '{}' not found in room '{}', skipping",
                        member,
                        game_id
                    );
                }
            }
        }

        Ok(())
    }
}
