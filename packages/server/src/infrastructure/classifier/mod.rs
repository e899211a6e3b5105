//! 分類器の実装
//!
//! - `http`: HTTP で画像を送信するクラウド分類サービスのクライアント

pub mod http;

pub use http::HttpClassifier;
