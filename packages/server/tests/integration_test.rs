//! Integration tests for the game server over real WebSocket connections.

use std::{io::Cursor, net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use futures_util::{SinkExt, StreamExt};
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

use doodleduel_server::{
    config::{GameConfig, LabelEntry},
    domain::{Classification, Classifier, ClassifierError},
    ui::{AppState, Server},
};
use doodleduel_shared::time::SystemClock;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Classifier that always sees a sun.
struct SunClassifier;

#[async_trait]
impl Classifier for SunClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Classification, ClassifierError> {
        Classification::from_predictions(vec![
            ("sun".to_string(), 0.9),
            ("moon".to_string(), 0.1),
        ])
    }
}

/// Helper struct to manage an in-process server
struct TestServer {
    addr: SocketAddr,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server with a one-round, one-label game and a short round limit
    async fn start() -> Self {
        let config = GameConfig {
            rounds: 1,
            round_time_limit_secs: 0.5,
            time_tolerance_secs: 2.0,
            min_resolution: 64,
            difficulties: vec![1],
            labels: vec![LabelEntry {
                name: "sun".to_string(),
                translation: Some("sol".to_string()),
                difficulty: 1,
            }],
            ..GameConfig::default()
        };
        config.validate().unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state = AppState::new(&config, Arc::new(SunClassifier), Arc::new(SystemClock));
        let server = Server::new(state, Duration::from_secs(60));
        let handle = tokio::spawn(async move {
            server.serve(listener).await.unwrap();
        });

        Self {
            addr,
            _handle: handle,
        }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn connect(&self) -> WsClient {
        let (stream, _) = tokio_tungstenite::connect_async(self.ws_url()).await.unwrap();
        stream
    }

    async fn get_json(&self, path: &str) -> Value {
        reqwest::get(self.http_url(path))
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

async fn send(client: &mut WsClient, event: &str, data: Value) {
    let text = json!({ "event": event, "data": data }).to_string();
    client.send(Message::Text(text.into())).await.unwrap();
}

/// Receive the next event, failing the test after 5 seconds
async fn recv(client: &mut WsClient) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for an event")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Assert that nothing arrives within a short window
async fn assert_silent(client: &mut WsClient) {
    let result = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(result.is_err(), "unexpected event: {:?}", result);
}

fn sketch_png() -> String {
    let mut img = RgbImage::from_pixel(64, 64, Rgb([255, 255, 255]));
    for x in 16..48 {
        img.put_pixel(x, 32, Rgb([0, 0, 0]));
    }
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    STANDARD.encode(buf.into_inner())
}

/// Join two players with pair_id "x" and return (alice, bob, game_id)
async fn paired(server: &TestServer) -> (WsClient, WsClient, String) {
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;

    send(&mut alice, "joinGame", json!({"pair_id": "x", "difficulty_id": 1})).await;
    let alice_joined = recv(&mut alice).await;
    send(&mut bob, "joinGame", json!({"pair_id": "x", "difficulty_id": 1})).await;
    let bob_joined = recv(&mut bob).await;
    let alice_ready = recv(&mut alice).await;

    assert_eq!(alice_joined["data"]["player_nr"], "player_1");
    assert_eq!(alice_joined["data"]["ready"], false);
    assert_eq!(bob_joined["data"]["player_nr"], "player_2");
    assert_eq!(bob_joined["data"]["ready"], true);
    assert_eq!(alice_ready["data"]["ready"], true);
    assert_eq!(alice_joined["data"]["game_id"], bob_joined["data"]["game_id"]);

    let game_id = bob_joined["data"]["game_id"].as_str().unwrap().to_string();
    (alice, bob, game_id)
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body = server.get_json("/api/health").await;

    // then (期待する結果):
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_two_players_are_paired_and_listed() {
    // テスト項目: 同じ pair_id の 2 人が同じゲームに入り、ゲーム一覧に表示される
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let (_alice, _bob, game_id) = paired(&server).await;
    let games = server.get_json("/api/games").await;

    // then (期待する結果):
    assert_eq!(games.as_array().unwrap().len(), 1);
    assert_eq!(games[0]["id"], game_id.as_str());
    assert_eq!(games[0]["players"].as_array().unwrap().len(), 2);
    assert_eq!(games[0]["players"][0]["state"], "Ready");
}

#[tokio::test]
async fn test_full_game_flow() {
    // テスト項目: お題取得 → 両者の勝利 → roundOver → スコアの受け渡し → ゲーム削除
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, mut bob, _game_id) = paired(&server).await;

    // when (操作): お題を取得
    send(&mut alice, "getLabel", json!({})).await;
    let label = recv(&mut alice).await;

    // then (期待する結果):
    assert_eq!(label["event"], "getLabel");
    assert_eq!(label["data"]["label"], "sun");
    assert_eq!(label["data"]["translated_label"], "sol");
    assert_eq!(label["data"]["round"], 1);

    // when (操作): A が勝つ
    send(
        &mut alice,
        "classify",
        json!({"time_left": 0.4, "round": 1, "image": sketch_png()}),
    )
    .await;
    let prediction = recv(&mut alice).await;

    // then (期待する結果): A には prediction だけが届き、B には何も届かない
    assert_eq!(prediction["event"], "prediction");
    assert_eq!(prediction["data"]["has_won"], true);
    assert_eq!(prediction["data"]["game_state"], "Done");
    assert_silent(&mut bob).await;

    // when (操作): B も勝つ（ノルウェー語）
    send(
        &mut bob,
        "classify",
        json!({"time_left": 0.3, "lang": "NO", "image": sketch_png()}),
    )
    .await;

    // then (期待する結果): B には prediction → roundOver、A には roundOver
    let bob_prediction = recv(&mut bob).await;
    assert_eq!(bob_prediction["event"], "prediction");
    assert_eq!(bob_prediction["data"]["guess"], "sol");
    assert_eq!(recv(&mut bob).await["event"], "roundOver");
    let round_over = recv(&mut alice).await;
    assert_eq!(round_over, json!({"event": "roundOver", "data": {"round_over": true}}));

    // when (操作): 最後のラウンドの後はお題を取得できない
    send(&mut alice, "getLabel", json!({})).await;
    let error = recv(&mut alice).await;

    // then (期待する結果):
    assert_eq!(error["event"], "error");
    assert_eq!(error["data"]["kind"], "client");

    // when (操作): スコアを受け渡す
    send(&mut alice, "endGame", json!({"score": 8.5})).await;
    let to_bob = recv(&mut bob).await;
    send(&mut bob, "endGame", json!({"score": 6.0})).await;
    let to_alice = recv(&mut alice).await;

    // then (期待する結果):
    assert_eq!(to_bob["data"]["score"], 8.5);
    assert_eq!(to_alice["data"]["score"], 6.0);
    assert_eq!(server.get_json("/api/games").await, json!([]));
}

#[tokio::test]
async fn test_simultaneous_timeouts_end_round_once() {
    // テスト項目: 2 人が同時に時間切れで提出しても roundOver は各自 1 回
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, mut bob, _game_id) = paired(&server).await;
    let image = sketch_png();

    // when (操作):
    send(&mut alice, "classify", json!({"time_left": 0, "image": image})).await;
    send(&mut bob, "classify", json!({"time_left": 0, "image": image})).await;

    // then (期待する結果):
    for client in [&mut alice, &mut bob] {
        let prediction = recv(client).await;
        assert_eq!(prediction["event"], "prediction");
        assert_eq!(prediction["data"]["has_won"], false);
        assert_eq!(recv(client).await["event"], "roundOver");
        assert_silent(client).await;
    }
}

#[tokio::test]
async fn test_opponent_disconnect_is_broadcast() {
    // テスト項目: 相手が切断すると playerDisconnected が届き、両者の切断でゲームが消える
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, mut bob, _game_id) = paired(&server).await;

    // when (操作):
    bob.close(None).await.unwrap();
    let notice = recv(&mut alice).await;

    // then (期待する結果):
    assert_eq!(
        notice,
        json!({"event": "playerDisconnected", "data": {"player_disconnected": true}})
    );

    // when (操作):
    alice.close(None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // then (期待する結果):
    assert_eq!(server.get_json("/api/games").await, json!([]));
}

#[tokio::test]
async fn test_invalid_requests_are_reported_to_sender() {
    // テスト項目: 不正なイベントや難易度なしの参加は本人にエラーとして返る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;

    // when (操作):
    alice
        .send(Message::Text("not json".to_string().into()))
        .await
        .unwrap();
    let invalid = recv(&mut alice).await;
    send(&mut alice, "joinGame", json!({"pair_id": "x"})).await;
    let missing = recv(&mut alice).await;
    send(&mut alice, "getLabel", json!({})).await;
    let lookup = recv(&mut alice).await;

    // then (期待する結果):
    assert_eq!(invalid["event"], "error");
    assert_eq!(invalid["data"]["kind"], "client");
    assert_eq!(missing["data"]["message"], "difficulty_id is required");
    assert_eq!(lookup["data"]["kind"], "lookup");
    assert_eq!(lookup["data"]["message"], "game invalid or expired");
}

#[tokio::test]
async fn test_high_scores_roundtrip() {
    // テスト項目: 登録したスコアがハイスコア一覧に降順で表示される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    send(&mut alice, "postScore", json!({"score": 3.0, "difficulty_id": 1})).await;
    let first = recv(&mut alice).await;
    send(&mut alice, "postScore", json!({"score": 9.0, "difficulty_id": 1})).await;
    recv(&mut alice).await;

    // when (操作):
    send(&mut alice, "viewHighScore", json!({"difficulty_id": 1})).await;
    let board = recv(&mut alice).await;

    // then (期待する結果):
    assert_eq!(first["event"], "scorePosted");
    assert_eq!(board["event"], "viewHighScore");
    assert_eq!(board["data"]["total"][0]["score"], 9.0);
    assert_eq!(board["data"]["total"][1]["score"], 3.0);
    assert_eq!(board["data"]["daily"].as_array().unwrap().len(), 2);
}
