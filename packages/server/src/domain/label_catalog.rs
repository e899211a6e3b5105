//! ラベルカタログのインターフェース
//!
//! 難易度ごとのお題の抽選と、ラベルの翻訳を提供します。

use super::{
    error::LabelCatalogError,
    value_object::{Difficulty, Label},
};

/// ラベルカタログ trait
#[cfg_attr(test, mockall::automock)]
pub trait LabelCatalog: Send + Sync {
    /// 難易度が有効なティアか
    fn is_valid_difficulty(&self, difficulty: Difficulty) -> bool;

    /// 難易度以下のラベルから重複なしで `count` 個を抽選する
    fn sample_labels(
        &self,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Label>, LabelCatalogError>;

    /// ラベル名の翻訳
    fn translate(&self, name: &str) -> Option<String>;
}
