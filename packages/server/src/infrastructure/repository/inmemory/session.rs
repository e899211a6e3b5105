//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! Game / Player / PairingSlot の 3 つのテーブルを 1 つの Mutex で保護します。
//!
//! ## 原子性
//!
//! 各操作はロックを取得してから解放するまでの間に読み出し・判定・書き込みを完結させます。
//! 判定ロジックはドメイン層の純粋関数（`select_slot` / `resolve_completion`）に任せ、
//! ここではテーブルの出し入れだけを行います。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    DisconnectResult, FinalScoreResult, Game, GameId, GameSnapshot, JoinResult, PairingKey,
    PairingSlot, Player, PlayerId, PlayerState, RepositoryError, Role, RoundCompletion,
    RuleViolation, Score, SessionRepository, Timestamp, matchmaking::select_slot,
    round::resolve_completion,
};

/// Session Store のテーブル
#[derive(Debug, Default)]
pub struct SessionTables {
    games: HashMap<GameId, Game>,
    players: HashMap<PlayerId, Player>,
    /// 作成順（古い順）
    slots: Vec<PairingSlot>,
}

impl SessionTables {
    fn game(&self, game_id: &GameId) -> Result<&Game, RepositoryError> {
        self.games
            .get(game_id)
            .ok_or_else(|| RepositoryError::GameNotFound(game_id.as_str().to_string()))
    }

    fn player(&self, player_id: &PlayerId) -> Result<&Player, RepositoryError> {
        self.players
            .get(player_id)
            .ok_or_else(|| RepositoryError::PlayerNotFound(player_id.as_str().to_string()))
    }

    fn opponent(&self, player_id: &PlayerId) -> Result<Option<&Player>, RepositoryError> {
        let player = self.player(player_id)?;
        let game = self.game(&player.game_id)?;
        Ok(game
            .opponent_of(player_id)
            .and_then(|opponent_id| self.players.get(opponent_id)))
    }

    /// ゲームと参加者・スロットを削除
    fn remove_game(&mut self, game_id: &GameId) -> bool {
        let Some(game) = self.games.remove(game_id) else {
            return false;
        };
        for seat in game.seats() {
            self.players.remove(seat);
        }
        self.slots.retain(|slot| &slot.game_id != game_id);
        true
    }
}

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    tables: Arc<Mutex<SessionTables>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new(tables: Arc<Mutex<SessionTables>>) -> Self {
        Self { tables }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(SessionTables::default())))
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn get_game(&self, game_id: &GameId) -> Result<Game, RepositoryError> {
        let tables = self.tables.lock().await;
        tables.game(game_id).cloned()
    }

    async fn get_player(&self, player_id: &PlayerId) -> Result<Player, RepositoryError> {
        let tables = self.tables.lock().await;
        tables.player(player_id).cloned()
    }

    async fn join_or_open(
        &self,
        player_id: PlayerId,
        key: PairingKey,
        candidate: Game,
        now: Timestamp,
    ) -> Result<JoinResult, RepositoryError> {
        let mut tables = self.tables.lock().await;

        let already_in_game = tables.players.contains_key(&player_id);
        let selected = select_slot(
            &tables.slots,
            &player_id,
            &key,
            candidate.difficulty,
            already_in_game,
        )?;

        match selected {
            Some(index) => {
                let slot = tables.slots.remove(index);

                let host = tables
                    .players
                    .get_mut(&slot.host)
                    .ok_or_else(|| RepositoryError::PlayerNotFound(slot.host.to_string()))?;
                host.mark_ready()?;

                let game = tables
                    .games
                    .get_mut(&slot.game_id)
                    .ok_or_else(|| RepositoryError::GameNotFound(slot.game_id.to_string()))?;
                game.seat_second_player(player_id.clone(), now);

                tables.players.insert(
                    player_id.clone(),
                    Player::new(player_id, slot.game_id.clone(), PlayerState::Ready),
                );

                Ok(JoinResult {
                    role: Role::Player2,
                    game_id: slot.game_id,
                    opponent: Some(slot.host),
                    ready: true,
                })
            }
            None => {
                let game_id = candidate.id.clone();
                tables.slots.push(PairingSlot {
                    key,
                    difficulty: candidate.difficulty,
                    game_id: game_id.clone(),
                    host: player_id.clone(),
                });
                tables.players.insert(
                    player_id.clone(),
                    Player::new(player_id, game_id.clone(), PlayerState::Waiting),
                );
                tables.games.insert(game_id.clone(), candidate);

                Ok(JoinResult {
                    role: Role::Player1,
                    game_id,
                    opponent: None,
                    ready: false,
                })
            }
        }
    }

    async fn complete_round(
        &self,
        player_id: &PlayerId,
        round: u32,
        now: Timestamp,
    ) -> Result<RoundCompletion, RepositoryError> {
        let mut tables = self.tables.lock().await;

        let mut player = tables.player(player_id)?.clone();
        let mut game = tables.game(&player.game_id)?.clone();
        let mut opponent = tables.opponent(player_id)?.cloned();

        let completion =
            resolve_completion(&mut game, &mut player, opponent.as_mut(), round, now)?;

        if let Some(opponent) = opponent {
            tables.players.insert(opponent.id.clone(), opponent);
        }
        tables.players.insert(player.id.clone(), player);
        tables.games.insert(game.id.clone(), game);

        Ok(completion)
    }

    async fn disconnect_player(
        &self,
        player_id: &PlayerId,
    ) -> Result<DisconnectResult, RepositoryError> {
        let mut tables = self.tables.lock().await;

        let game_id = tables.player(player_id)?.game_id.clone();
        let opponent = tables
            .opponent(player_id)?
            .filter(|opponent| opponent.is_connected())
            .map(|opponent| opponent.id.clone());

        if opponent.is_some() {
            if let Some(player) = tables.players.get_mut(player_id) {
                player.disconnect();
            }
        } else {
            tables.remove_game(&game_id);
        }

        Ok(DisconnectResult {
            game_id,
            torn_down: opponent.is_none(),
            opponent,
        })
    }

    async fn record_final_score(
        &self,
        player_id: &PlayerId,
        score: Score,
    ) -> Result<FinalScoreResult, RepositoryError> {
        let mut tables = self.tables.lock().await;

        let player = tables.player(player_id)?;
        let game_id = player.game_id.clone();
        if !tables.game(&game_id)?.is_complete() {
            return Err(RuleViolation::GameNotFinished.into());
        }

        let opponent = tables.opponent(player_id)?.filter(|o| o.is_connected());
        let opponent_id = opponent.map(|o| o.id.clone());
        let finalized = opponent.is_none_or(|o| o.final_score.is_some());

        if finalized {
            tables.remove_game(&game_id);
        } else if let Some(player) = tables.players.get_mut(player_id) {
            player.final_score = Some(score);
        }

        Ok(FinalScoreResult {
            game_id,
            opponent: opponent_id,
            finalized,
        })
    }

    async fn delete_games_created_before(&self, cutoff: Timestamp) -> Vec<GameId> {
        let mut tables = self.tables.lock().await;
        let expired: Vec<GameId> = tables
            .games
            .values()
            .filter(|game| game.created_at < cutoff)
            .map(|game| game.id.clone())
            .collect();
        for game_id in &expired {
            tables.remove_game(game_id);
        }
        expired
    }

    async fn list_games(&self) -> Vec<GameSnapshot> {
        let tables = self.tables.lock().await;
        let mut snapshots: Vec<GameSnapshot> = tables
            .games
            .values()
            .map(|game| GameSnapshot {
                game: game.clone(),
                players: game
                    .seats()
                    .filter_map(|seat| tables.players.get(seat).cloned())
                    .collect(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.game.created_at);
        snapshots
    }
}
