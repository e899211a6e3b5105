//! エンティティ
//!
//! Session Store が保持する Game / Player / PairingSlot と、
//! ハイスコア用の ScoreRecord を定義します。

use chrono::NaiveDate;

use super::{
    error::RuleViolation,
    value_object::{Difficulty, GameId, Label, PairingKey, PlayerId, Score, Timestamp},
};

/// プレイヤーの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// 対戦相手を待っている
    Waiting,
    /// ペアが成立し、最初のラウンドを待っている
    Ready,
    /// ラウンドをプレイ中
    Playing,
    /// 現在のラウンドを終えた
    Done,
    /// 切断済み
    Disconnected,
}

impl PlayerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Waiting => "Waiting",
            PlayerState::Ready => "Ready",
            PlayerState::Playing => "Playing",
            PlayerState::Done => "Done",
            PlayerState::Disconnected => "Disconnected",
        }
    }

    /// 状態遷移を検証して次の状態を返す
    pub fn transition(self, to: PlayerState) -> Result<PlayerState, RuleViolation> {
        use PlayerState::*;

        let allowed = match (self, to) {
            (Disconnected, _) => false,
            (_, Disconnected) => true,
            (Waiting, Ready) => true,
            (Ready | Playing, Done) => true,
            (Done, Playing) => true,
            _ => false,
        };

        if allowed {
            Ok(to)
        } else {
            Err(RuleViolation::InvalidTransition {
                from: self.as_str(),
                to: to.as_str(),
            })
        }
    }
}

/// プレイヤー
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub game_id: GameId,
    pub state: PlayerState,
    /// endGame で相手に渡した最終スコア
    pub final_score: Option<Score>,
}

impl Player {
    pub fn new(id: PlayerId, game_id: GameId, state: PlayerState) -> Self {
        Self {
            id,
            game_id,
            state,
            final_score: None,
        }
    }

    pub fn mark_ready(&mut self) -> Result<(), RuleViolation> {
        self.state = self.state.transition(PlayerState::Ready)?;
        Ok(())
    }

    pub fn finish_round(&mut self) -> Result<(), RuleViolation> {
        match self.state {
            PlayerState::Waiting => Err(RuleViolation::GameNotReady),
            PlayerState::Done => Err(RuleViolation::RoundAlreadyCompleted),
            state => {
                self.state = state.transition(PlayerState::Done)?;
                Ok(())
            }
        }
    }

    pub fn start_next_round(&mut self) -> Result<(), RuleViolation> {
        self.state = self.state.transition(PlayerState::Playing)?;
        Ok(())
    }

    /// 切断状態にする（既に切断済みなら何もしない）
    pub fn disconnect(&mut self) {
        self.state = PlayerState::Disconnected;
    }

    pub fn is_connected(&self) -> bool {
        self.state != PlayerState::Disconnected
    }
}

/// ゲーム（2 人対戦の 1 マッチ）
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: GameId,
    /// 作成時に固定されるお題の列
    pub labels: Vec<Label>,
    /// 1 始まりのラウンド番号。`labels.len() + 1` でゲーム終了
    pub round_index: u32,
    pub difficulty: Difficulty,
    pub player_1: PlayerId,
    pub player_2: Option<PlayerId>,
    pub created_at: Timestamp,
    /// 現在のラウンドの開始時刻（ペア成立前は None）
    pub round_started_at: Option<Timestamp>,
}

impl Game {
    pub fn new(
        id: GameId,
        labels: Vec<Label>,
        difficulty: Difficulty,
        player_1: PlayerId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            labels,
            round_index: 1,
            difficulty,
            player_1,
            player_2: None,
            created_at,
            round_started_at: None,
        }
    }

    pub fn total_rounds(&self) -> u32 {
        self.labels.len() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.round_index > self.total_rounds()
    }

    /// 現在のラウンドのお題（ゲーム終了後は None）
    pub fn current_label(&self) -> Option<&Label> {
        if self.is_complete() {
            return None;
        }
        self.labels.get(self.round_index as usize - 1)
    }

    /// 2 人目のプレイヤーを着席させ、最初のラウンドを開始する
    pub fn seat_second_player(&mut self, player_id: PlayerId, now: Timestamp) {
        self.player_2 = Some(player_id);
        self.round_started_at = Some(now);
    }

    /// ラウンドを 1 つ進める。`total_rounds + 1` を超えることはない
    pub fn advance_round(&mut self, now: Timestamp) -> u32 {
        if !self.is_complete() {
            self.round_index += 1;
            self.round_started_at = Some(now);
        }
        self.round_index
    }

    pub fn opponent_of(&self, player_id: &PlayerId) -> Option<&PlayerId> {
        if &self.player_1 == player_id {
            self.player_2.as_ref()
        } else if self.player_2.as_ref() == Some(player_id) {
            Some(&self.player_1)
        } else {
            None
        }
    }

    pub fn seats(&self) -> impl Iterator<Item = &PlayerId> {
        std::iter::once(&self.player_1).chain(self.player_2.iter())
    }
}

/// ペアリングスロット
///
/// 2 人目の席が空いている Game とペアリングキーの対応。
/// 2 人目が参加した時点で削除されます。
#[derive(Debug, Clone, PartialEq)]
pub struct PairingSlot {
    pub key: PairingKey,
    pub difficulty: Difficulty,
    pub game_id: GameId,
    /// スロットを作成したプレイヤー（player_1）
    pub host: PlayerId,
}

impl PairingSlot {
    /// キーが完全一致し、難易度も一致するか
    pub fn matches(&self, key: &PairingKey, difficulty: Difficulty) -> bool {
        &self.key == key && self.difficulty == difficulty
    }
}

/// ゲームとその参加者のスナップショット
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub game: Game,
    pub players: Vec<Player>,
}

/// ハイスコアのレコード
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub id: u64,
    pub player_id: PlayerId,
    pub score: Score,
    pub date: NaiveDate,
    pub difficulty: Difficulty,
}
