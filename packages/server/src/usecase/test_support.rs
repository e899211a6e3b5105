//! UseCase テスト用のヘルパー

use std::sync::Arc;

use doodleduel_shared::time::ManualClock;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        Difficulty, Game, GameId, Label, LabelCatalog, MessagePusher, PairingKey, PlayerId,
        SessionRepository, Timestamp, label_catalog::MockLabelCatalog,
    },
    infrastructure::{
        InMemorySessionRepository, WebSocketMessagePusher, dto::websocket::ServerEvent,
        repository::inmemory::SessionTables,
    },
};

/// テスト用のゲーム環境
pub struct TestBed {
    /// repository が保持するテーブル（ロックを直接握るテスト用）
    pub tables: Arc<Mutex<SessionTables>>,
    pub repository: Arc<InMemorySessionRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub clock: Arc<ManualClock>,
}

impl TestBed {
    pub fn new() -> Self {
        let tables = Arc::new(Mutex::new(SessionTables::default()));
        Self {
            repository: Arc::new(InMemorySessionRepository::new(tables.clone())),
            tables,
            pusher: Arc::new(WebSocketMessagePusher::default()),
            clock: Arc::new(ManualClock::new(0)),
        }
    }

    /// クライアントを接続状態にする
    pub async fn connect(&self, name: &str) -> (PlayerId, mpsc::UnboundedReceiver<String>) {
        let player_id = pid(name);
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register_client(player_id.clone(), tx).await;
        (player_id, rx)
    }

    /// 2 人をキー "x" でペアにし、ルームに参加させる
    pub async fn pair(&self, first: &PlayerId, second: &PlayerId, labels: &[&str]) -> GameId {
        let result = self
            .repository
            .join_or_open(
                first.clone(),
                PairingKey::from_optional(Some("x".to_string())).unwrap(),
                game("g1", first, labels),
                Timestamp::new(0),
            )
            .await
            .unwrap();
        self.repository
            .join_or_open(
                second.clone(),
                PairingKey::from_optional(Some("x".to_string())).unwrap(),
                game("g2", second, labels),
                Timestamp::new(0),
            )
            .await
            .unwrap();
        self.pusher.join_room(first, &result.game_id).await;
        self.pusher.join_room(second, &result.game_id).await;
        result.game_id
    }
}

pub fn pid(value: &str) -> PlayerId {
    PlayerId::new(value.to_string()).unwrap()
}

pub fn game(id: &str, host: &PlayerId, labels: &[&str]) -> Game {
    Game::new(
        GameId::new(id.to_string()).unwrap(),
        labels.iter().map(|name| Label::new(*name, None)).collect(),
        Difficulty::new(1).unwrap(),
        host.clone(),
        Timestamp::new(0),
    )
}

/// 翻訳表だけを持つラベルカタログのモック
pub fn translating_catalog(pairs: &[(&str, &str)]) -> Arc<dyn LabelCatalog> {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(en, no)| (en.to_string(), no.to_string()))
        .collect();
    let mut catalog = MockLabelCatalog::new();
    catalog
        .expect_translate()
        .returning(move |name| pairs.iter().find(|(en, _)| en == name).map(|(_, no)| no.clone()));
    catalog.expect_is_valid_difficulty().returning(|d| d.value() <= 3);
    Arc::new(catalog)
}

/// 受信済みのイベントをすべて取り出す
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(message) = rx.try_recv() {
        events.push(serde_json::from_str(&message).unwrap());
    }
    events
}

/// イベント名の列
pub fn names(events: &[ServerEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|event| match event {
            ServerEvent::JoinGame(_) => "joinGame",
            ServerEvent::GetLabel(_) => "getLabel",
            ServerEvent::Prediction(_) => "prediction",
            ServerEvent::RoundOver(_) => "roundOver",
            ServerEvent::PlayerDisconnected(_) => "playerDisconnected",
            ServerEvent::EndGame(_) => "endGame",
            ServerEvent::ViewHighScore(_) => "viewHighScore",
            ServerEvent::ScorePosted(_) => "scorePosted",
            ServerEvent::Error(_) => "error",
        })
        .collect()
}
