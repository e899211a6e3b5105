//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{health_check, list_games};
pub use websocket::websocket_handler;
