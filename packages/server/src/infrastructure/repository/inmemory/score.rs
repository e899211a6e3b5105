//! InMemory Score Repository 実装
//!
//! ハイスコアを登録順の Vec で保持します。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::domain::{Difficulty, PlayerId, Score, ScoreRecord, ScoreRepository};

#[derive(Debug, Default)]
pub struct ScoreTable {
    records: Vec<ScoreRecord>,
    next_id: u64,
}

/// インメモリ Score Repository 実装
pub struct InMemoryScoreRepository {
    table: Arc<Mutex<ScoreTable>>,
}

impl InMemoryScoreRepository {
    pub fn new(table: Arc<Mutex<ScoreTable>>) -> Self {
        Self { table }
    }
}

impl Default for InMemoryScoreRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(ScoreTable::default())))
    }
}

/// スコア降順（同点なら登録順）
fn sort_by_score_desc(records: &mut [ScoreRecord]) {
    records.sort_by(|a, b| {
        b.score
            .value()
            .total_cmp(&a.score.value())
            .then(a.id.cmp(&b.id))
    });
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    async fn insert_score(
        &self,
        player_id: PlayerId,
        score: Score,
        date: NaiveDate,
        difficulty: Difficulty,
    ) -> u64 {
        let mut table = self.table.lock().await;
        table.next_id += 1;
        let id = table.next_id;
        table.records.push(ScoreRecord {
            id,
            player_id,
            score,
            date,
            difficulty,
        });
        id
    }

    async fn top_scores(&self, difficulty: Difficulty, limit: usize) -> Vec<ScoreRecord> {
        let table = self.table.lock().await;
        let mut records: Vec<ScoreRecord> = table
            .records
            .iter()
            .filter(|record| record.difficulty == difficulty)
            .cloned()
            .collect();
        sort_by_score_desc(&mut records);
        records.truncate(limit);
        records
    }

    async fn daily_scores(&self, difficulty: Difficulty, date: NaiveDate) -> Vec<ScoreRecord> {
        let table = self.table.lock().await;
        let mut records: Vec<ScoreRecord> = table
            .records
            .iter()
            .filter(|record| record.difficulty == difficulty && record.date == date)
            .cloned()
            .collect();
        sort_by_score_desc(&mut records);
        records
    }
}
