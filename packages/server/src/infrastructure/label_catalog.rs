//! 設定ファイルのラベル一覧を使った LabelCatalog 実装

use std::collections::HashMap;

use rand::seq::IndexedRandom;

use crate::{
    config::LabelEntry,
    domain::{Difficulty, Label, LabelCatalog, LabelCatalogError},
};

/// 設定ベースのラベルカタログ
pub struct ConfigLabelCatalog {
    difficulties: Vec<u8>,
    labels: Vec<LabelEntry>,
    translations: HashMap<String, String>,
}

impl ConfigLabelCatalog {
    pub fn new(difficulties: Vec<u8>, labels: Vec<LabelEntry>) -> Self {
        let translations = labels
            .iter()
            .filter_map(|entry| {
                entry
                    .translation
                    .as_ref()
                    .map(|t| (entry.name.clone(), t.clone()))
            })
            .collect();
        Self {
            difficulties,
            labels,
            translations,
        }
    }
}

impl LabelCatalog for ConfigLabelCatalog {
    fn is_valid_difficulty(&self, difficulty: Difficulty) -> bool {
        self.difficulties.contains(&difficulty.value())
    }

    fn sample_labels(
        &self,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Label>, LabelCatalogError> {
        if !self.is_valid_difficulty(difficulty) {
            return Err(LabelCatalogError::UnknownDifficulty(difficulty.value()));
        }

        let eligible: Vec<&LabelEntry> = self
            .labels
            .iter()
            .filter(|entry| entry.difficulty <= difficulty.value())
            .collect();
        if eligible.len() < count {
            return Err(LabelCatalogError::NotEnoughLabels {
                difficulty: difficulty.value(),
                available: eligible.len(),
                requested: count,
            });
        }

        let mut rng = rand::rng();
        Ok(eligible
            .choose_multiple(&mut rng, count)
            .map(|entry| Label::new(entry.name.clone(), entry.translation.clone()))
            .collect())
    }

    fn translate(&self, name: &str) -> Option<String> {
        self.translations.get(name).cloned()
    }
}
