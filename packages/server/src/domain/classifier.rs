//! 分類器のインターフェース
//!
//! 画像の分類は外部のクラウドモデルに委譲します。
//! ドメイン層は結果の形だけを定義し、具体的な実装は Infrastructure 層が提供します。

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::error::ClassifierError;

/// 分類結果
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// ラベル → 確信度
    pub certainty: BTreeMap<String, f64>,
    /// 確信度が最も高いラベル
    pub best_guess: String,
}

impl Classification {
    /// (ラベル, 確信度) の列から分類結果を作成
    pub fn from_predictions(
        predictions: impl IntoIterator<Item = (String, f64)>,
    ) -> Result<Self, ClassifierError> {
        let certainty: BTreeMap<String, f64> = predictions.into_iter().collect();
        let best_guess = certainty
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(label, _)| label.clone())
            .ok_or(ClassifierError::NoPredictions)?;

        Ok(Self {
            certainty,
            best_guess,
        })
    }

    /// 白紙の画像に対する固定の擬似分類
    pub fn blank(guess: &str) -> Self {
        let mut certainty = BTreeMap::new();
        certainty.insert(guess.to_string(), 1.0);
        Self {
            certainty,
            best_guess: guess.to_string(),
        }
    }

    /// 最有力ラベルの確信度
    pub fn best_confidence(&self) -> f64 {
        self.certainty
            .get(&self.best_guess)
            .copied()
            .unwrap_or_default()
    }
}

/// 分類器 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Classifier: Send + Sync {
    /// 画像（PNG バイト列）を分類する
    async fn classify(&self, image: &[u8]) -> Result<Classification, ClassifierError>;
}
