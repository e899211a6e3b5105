//! マッチングのルール
//!
//! 開いているペアリングスロットの中から、参加者が入れるものを選びます。

use super::{
    entity::PairingSlot,
    error::RuleViolation,
    value_object::{Difficulty, PairingKey, PlayerId},
};

/// 参加先のスロットを選ぶ
///
/// # Returns
///
/// * `Ok(Some(index))` - `slots[index]` に 2 人目として参加する
/// * `Ok(None)` - 一致するスロットがないため、新しいゲームを作成する
/// * `Err(RuleViolation)` - 自分が作成したスロットへの参加、または既に別のゲームに参加済み
///
/// 一致するスロットが複数ある場合は最も古いものを選ぶ。
pub fn select_slot(
    slots: &[PairingSlot],
    player_id: &PlayerId,
    key: &PairingKey,
    difficulty: Difficulty,
    already_in_game: bool,
) -> Result<Option<usize>, RuleViolation> {
    if slots
        .iter()
        .any(|slot| slot.matches(key, difficulty) && &slot.host == player_id)
    {
        return Err(RuleViolation::SelfPairing);
    }

    if already_in_game {
        return Err(RuleViolation::AlreadyInGame(player_id.as_str().to_string()));
    }

    Ok(slots
        .iter()
        .position(|slot| slot.matches(key, difficulty)))
}
