//! UseCase: プレイヤー接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectPlayerUseCase::execute() メソッド
//! - 接続ごとのプレイヤー ID の発行と MessagePusher への登録
//!
//! ### なぜこのテストが必要か
//! - プレイヤー ID は接続ごとにユニークでなければならない
//! - 登録されたチャンネルに個別送信が届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続
//! - エッジケース：同時に複数の接続

use std::sync::Arc;

use crate::domain::{MessagePusher, PlayerId, PlayerIdFactory, PusherChannel, ValueObjectError};

/// プレイヤー接続のユースケース
pub struct ConnectPlayerUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectPlayerUseCase {
    /// 新しい ConnectPlayerUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// プレイヤー接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(PlayerId)` - 発行したプレイヤー ID
    /// * `Err(ValueObjectError)` - ID の生成に失敗
    pub async fn execute(&self, sender: PusherChannel) -> Result<PlayerId, ValueObjectError> {
        let player_id = PlayerIdFactory::generate()?;
        self.message_pusher
            .register_client(player_id.clone(), sender)
            .await;
        Ok(player_id)
    }
}
