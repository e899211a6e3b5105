//! Game configuration, loaded from a TOML file.
//!
//! Every field has a default so an empty (or missing) file yields a playable
//! setup. Labels are configured as `[[labels]]` tables.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::DrawingConstraints;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// One prompt of the label catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelEntry {
    /// Label name as returned by the classifier.
    pub name: String,
    /// Norwegian translation.
    #[serde(default)]
    pub translation: Option<String>,
    /// Lowest difficulty tier the label is used for.
    #[serde(default = "default_label_difficulty")]
    pub difficulty: u8,
}

fn default_label_difficulty() -> u8 {
    1
}

/// Top-level game configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rounds per game (N).
    pub rounds: u32,
    /// Minimum confidence of the best guess for a win.
    pub certainty_threshold: f64,
    /// Length of a round as shown by the client.
    pub round_time_limit_secs: f64,
    /// Allowed skew between client-reported and server-observed time.
    pub time_tolerance_secs: f64,
    /// Upper bound of the random delay applied to timeout completions. 0 disables it.
    pub timeout_jitter_ms: u64,
    pub max_image_bytes: usize,
    pub min_resolution: u32,
    /// Guess reported for a blank canvas.
    pub blank_guess: String,
    pub high_score_top_n: usize,
    /// Games older than this are swept.
    pub game_ttl_secs: u64,
    pub sweep_interval_secs: u64,
    /// Valid difficulty tiers.
    pub difficulties: Vec<u8>,
    pub labels: Vec<LabelEntry>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            certainty_threshold: 0.5,
            round_time_limit_secs: 22.0,
            time_tolerance_secs: 2.0,
            timeout_jitter_ms: 0,
            max_image_bytes: 4 * 1024 * 1024,
            min_resolution: 256,
            blank_guess: "blank".to_string(),
            high_score_top_n: 10,
            game_ttl_secs: 3600,
            sweep_interval_secs: 60,
            difficulties: vec![1, 2, 3],
            labels: default_labels(),
        }
    }
}

fn default_labels() -> Vec<LabelEntry> {
    [
        ("sun", "sol", 1),
        ("house", "hus", 1),
        ("tree", "tre", 1),
        ("fish", "fisk", 1),
        ("apple", "eple", 1),
        ("bicycle", "sykkel", 2),
        ("umbrella", "paraply", 2),
        ("guitar", "gitar", 2),
        ("lighthouse", "fyrtårn", 3),
        ("helicopter", "helikopter", 3),
        ("saxophone", "saksofon", 3),
    ]
    .into_iter()
    .map(|(name, translation, difficulty)| LabelEntry {
        name: name.to_string(),
        translation: Some(translation.to_string()),
        difficulty,
    })
    .collect()
}

impl GameConfig {
    /// Load the configuration from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                        path: path.display().to_string(),
                        source,
                    })?;
                let config = toml::from_str::<GameConfig>(&content)?;
                tracing::info!("Loaded game configuration from {}", path.display());
                config
            }
            None => {
                tracing::info!("No config file given, using default game configuration");
                GameConfig::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::Invalid("rounds must be > 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.certainty_threshold) {
            return Err(ConfigError::Invalid(
                "certainty_threshold must be within [0, 1]".to_string(),
            ));
        }
        if self.round_time_limit_secs <= 0.0 {
            return Err(ConfigError::Invalid(
                "round_time_limit_secs must be > 0".to_string(),
            ));
        }
        if self.time_tolerance_secs < 0.0 {
            return Err(ConfigError::Invalid(
                "time_tolerance_secs must not be negative".to_string(),
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "sweep_interval_secs must be > 0".to_string(),
            ));
        }
        if self.difficulties.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one difficulty tier is required".to_string(),
            ));
        }
        if self.difficulties.contains(&0) {
            return Err(ConfigError::Invalid(
                "difficulty tiers start at 1".to_string(),
            ));
        }

        for &tier in &self.difficulties {
            let eligible = self
                .labels
                .iter()
                .filter(|label| label.difficulty <= tier)
                .count();
            if eligible < self.rounds as usize {
                return Err(ConfigError::Invalid(format!(
                    "difficulty {} has {} labels, {} rounds need at least as many",
                    tier, eligible, self.rounds
                )));
            }
        }

        Ok(())
    }

    pub fn drawing_constraints(&self) -> DrawingConstraints {
        DrawingConstraints {
            max_bytes: self.max_image_bytes,
            min_resolution: self.min_resolution,
        }
    }
}
