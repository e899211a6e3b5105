//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ErrorKind, GameEvent, PlayerId},
    infrastructure::dto::websocket::{ClassifyRequest, ClientEvent},
    ui::state::AppState,
    usecase::{ReportableError, SubmitDrawingRequest},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Every event addressed to this player (private or room-wide) arrives through `rx`,
/// in the order it was pushed.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Create a channel for this player to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Use ConnectPlayerUseCase to issue a player id
    // (register_client is called inside the UseCase)
    let player_id = match state.connect_player_usecase.execute(tx).await {
        Ok(player_id) => player_id,
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            return;
        }
    };
    tracing::info!("Player '{}' connected", player_id);

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let player_id_clone = player_id.clone();
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    // Spawn a task to receive events from this player.
    // Only the wait for the next frame is interruptible; an event that is
    // already being dispatched always runs to completion.
    let mut recv_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                msg = receiver.next() => msg,
                _ = &mut stop_rx => break,
            };
            let msg = match msg {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error from '{}': {}", player_id_clone, e);
                    break;
                }
                None => break,
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&state_clone, &player_id_clone, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Player '{}' requested close", player_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward pushed events to this player
    let mut send_task = pusher_loop(rx, sender);

    // The pusher loop can be aborted at any point. The receive loop is asked
    // to stop and then awaited, so a round completion in flight is never cut off.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            let _ = stop_tx.send(());
            if let Err(e) = recv_task.await {
                tracing::warn!("Receive task for '{}' failed: {}", player_id, e);
            }
        }
    };

    // Use DisconnectPlayerUseCase to handle disconnection
    match state.disconnect_player_usecase.execute(&player_id).await {
        Ok(Some(result)) => {
            tracing::info!(
                "Player '{}' disconnected from game '{}' (torn down: {})",
                player_id,
                result.game_id,
                result.torn_down
            );
        }
        Ok(None) => {
            tracing::info!("Player '{}' disconnected", player_id);
        }
        Err(e) => {
            tracing::warn!("Failed to disconnect player '{}': {}", player_id, e);
        }
    }
}

async fn handle_text(state: &AppState, player_id: &PlayerId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse event from '{}': {}", player_id, e);
            let error = GameEvent::Error {
                kind: ErrorKind::Client,
                message: format!("invalid event: {}", e),
            };
            reply(state, player_id, &error).await;
            return;
        }
    };

    if let Err(error) = dispatch(state, player_id, event).await {
        reply(state, player_id, &error).await;
    }
}

/// Run the usecase for one client event. Successful results are pushed by the usecase itself.
async fn dispatch(
    state: &AppState,
    player_id: &PlayerId,
    event: ClientEvent,
) -> Result<(), GameEvent> {
    match event {
        ClientEvent::JoinGame(request) => state
            .join_game_usecase
            .execute(player_id.clone(), request.pair_id, request.difficulty_id)
            .await
            .map(|_| ())
            .map_err(|e| report(player_id, "joinGame", &e)),
        ClientEvent::GetLabel(_) => state
            .get_label_usecase
            .execute(player_id)
            .await
            .map(|_| ())
            .map_err(|e| report(player_id, "getLabel", &e)),
        ClientEvent::Classify(request) => {
            let request = decode_classify_request(request, state.max_image_bytes)?;
            state
                .submit_drawing_usecase
                .execute(player_id, request)
                .await
                .map(|_| ())
                .map_err(|e| report(player_id, "classify", &e))
        }
        ClientEvent::PostScore(request) => state
            .post_score_usecase
            .execute(player_id, request.score, request.difficulty_id)
            .await
            .map(|_| ())
            .map_err(|e| report(player_id, "postScore", &e)),
        ClientEvent::ViewHighScore(request) => state
            .view_high_score_usecase
            .execute(player_id, request.difficulty_id)
            .await
            .map(|_| ())
            .map_err(|e| report(player_id, "viewHighScore", &e)),
        ClientEvent::EndGame(request) => state
            .end_game_usecase
            .execute(player_id, request.score)
            .await
            .map(|_| ())
            .map_err(|e| report(player_id, "endGame", &e)),
    }
}

/// Decode the base64 image of a classify event. A `data:` URL prefix is accepted.
fn decode_classify_request(
    request: ClassifyRequest,
    max_image_bytes: usize,
) -> Result<SubmitDrawingRequest, GameEvent> {
    let encoded = match request.image.split_once("base64,") {
        Some((_, data)) => data,
        None => request.image.as_str(),
    };

    if encoded.len() > max_image_bytes.div_ceil(3) * 4 {
        return Err(GameEvent::Error {
            kind: ErrorKind::Client,
            message: format!("Wrong image format: image exceeds {} bytes", max_image_bytes),
        });
    }

    let image = STANDARD.decode(encoded.trim()).map_err(|e| GameEvent::Error {
        kind: ErrorKind::Client,
        message: format!("Wrong image format: {}", e),
    })?;

    Ok(SubmitDrawingRequest {
        time_left: request.time_left,
        round: request.round,
        lang: request.lang,
        image,
    })
}

fn report<E: ReportableError>(player_id: &PlayerId, event: &str, error: &E) -> GameEvent {
    match error.kind() {
        ErrorKind::Internal | ErrorKind::Upstream => {
            tracing::error!("'{}' from '{}' failed: {}", event, player_id, error);
        }
        ErrorKind::Client | ErrorKind::Lookup => {
            tracing::warn!("'{}' from '{}' rejected: {}", event, player_id, error);
        }
    }
    error.to_event()
}

async fn reply(state: &AppState, player_id: &PlayerId, event: &GameEvent) {
    if let Err(e) = state.message_pusher.push_to(player_id, event).await {
        tracing::warn!("Failed to push error to '{}': {}", player_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(image: &str) -> ClassifyRequest {
        ClassifyRequest {
            time_left: 3.0,
            round: Some(1),
            lang: None,
            image: image.to_string(),
        }
    }

    #[test]
    fn test_decode_accepts_data_url() {
        // テスト項目: data URL 形式の画像も base64 としてデコードできる
        // given (前提条件):
        let request = classify("data:image/png;base64,AQID");

        // when (操作):
        let decoded = decode_classify_request(request, 1024).unwrap();

        // then (期待する結果):
        assert_eq!(decoded.image, vec![1, 2, 3]);
        assert_eq!(decoded.round, Some(1));
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        // テスト項目: base64 でない画像はクライアントエラー
        // when (操作):
        let result = decode_classify_request(classify("not base64!"), 1024);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(GameEvent::Error {
                kind: ErrorKind::Client,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_rejects_oversized_payload() {
        // テスト項目: 上限を超える画像はデコードせずに拒否される
        // when (操作):
        let result = decode_classify_request(classify(&"A".repeat(64)), 8);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(GameEvent::Error {
                kind: ErrorKind::Client,
                ..
            })
        ));
    }
}
