//! ID の生成

use uuid::Uuid;

use super::{
    error::ValueObjectError,
    value_object::{GameId, PlayerId},
};

/// ゲーム ID の生成
pub struct GameIdFactory;

impl GameIdFactory {
    pub fn generate() -> Result<GameId, ValueObjectError> {
        GameId::new(Uuid::new_v4().simple().to_string())
    }
}

/// プレイヤー ID の生成（接続ごと）
pub struct PlayerIdFactory;

impl PlayerIdFactory {
    pub fn generate() -> Result<PlayerId, ValueObjectError> {
        PlayerId::new(Uuid::new_v4().simple().to_string())
    }
}
