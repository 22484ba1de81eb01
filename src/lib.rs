//! Slugging outcome prediction from pitch and hit physics
//!
//! Harvests a season of MLB play-by-play data, extracts batted-ball and
//! pitch-trajectory measurements into a flat dataset, and trains a gradient
//! boosted tree regressor to predict a discretized slugging outcome (0-4).

pub mod data;
pub mod features;
pub mod training;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for one scheduled game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GamePk(pub i64);

impl fmt::Display for GamePk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Game({})", self.0)
    }
}

/// Unique identifier for a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub i64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team({})", self.0)
    }
}

/// One fully-resolved play: the measurements of its final tracked event plus
/// the slugging label.
///
/// A row only exists if every field was present in the source play; partial
/// plays are dropped during extraction, never padded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub angle: f64,
    pub velo: f64,
    pub pitch_speed_start: f64,
    pub pitch_speed_end: f64,
    pub pitch_break_angle: f64,
    pub pitch_spin_rate: f64,
    pub pitch_break_length: f64,
    #[serde(rename = "pitch_breakY")]
    pub pitch_break_y: f64,
    pub pitch_break_vertical: f64,
    pub pitch_break_vertical_induced: f64,
    pub pitch_extension: f64,
    pub pitch_spin_direction: f64,
    pub total_distance: f64,
    pub slg: f64,
}

impl FeatureRow {
    /// Column order of the exported table (label last)
    pub const COLUMNS: [&'static str; 14] = [
        "angle",
        "velo",
        "pitch_speed_start",
        "pitch_speed_end",
        "pitch_break_angle",
        "pitch_spin_rate",
        "pitch_break_length",
        "pitch_breakY",
        "pitch_break_vertical",
        "pitch_break_vertical_induced",
        "pitch_extension",
        "pitch_spin_direction",
        "total_distance",
        "slg",
    ];

    /// Columns fed to the model. `pitch_breakY` is kept in the table but
    /// excluded here, matching the original trainer's input set.
    pub const PREDICTORS: [&'static str; 12] = [
        "angle",
        "velo",
        "pitch_speed_start",
        "pitch_speed_end",
        "pitch_break_angle",
        "pitch_spin_rate",
        "pitch_break_length",
        "pitch_break_vertical",
        "pitch_break_vertical_induced",
        "pitch_extension",
        "pitch_spin_direction",
        "total_distance",
    ];

    /// All 14 values in [`Self::COLUMNS`] order
    pub fn values(&self) -> [f64; 14] {
        [
            self.angle,
            self.velo,
            self.pitch_speed_start,
            self.pitch_speed_end,
            self.pitch_break_angle,
            self.pitch_spin_rate,
            self.pitch_break_length,
            self.pitch_break_y,
            self.pitch_break_vertical,
            self.pitch_break_vertical_induced,
            self.pitch_extension,
            self.pitch_spin_direction,
            self.total_distance,
            self.slg,
        ]
    }

    /// Predictor values in [`Self::PREDICTORS`] order
    pub fn predictor_values(&self) -> [f64; 12] {
        [
            self.angle,
            self.velo,
            self.pitch_speed_start,
            self.pitch_speed_end,
            self.pitch_break_angle,
            self.pitch_spin_rate,
            self.pitch_break_length,
            self.pitch_break_vertical,
            self.pitch_break_vertical_induced,
            self.pitch_extension,
            self.pitch_spin_direction,
            self.total_distance,
        ]
    }

    /// Build a row from 14 values in [`Self::COLUMNS`] order
    pub fn from_values(v: [f64; 14]) -> Self {
        FeatureRow {
            angle: v[0],
            velo: v[1],
            pitch_speed_start: v[2],
            pitch_speed_end: v[3],
            pitch_break_angle: v[4],
            pitch_spin_rate: v[5],
            pitch_break_length: v[6],
            pitch_break_y: v[7],
            pitch_break_vertical: v[8],
            pitch_break_vertical_induced: v[9],
            pitch_extension: v[10],
            pitch_spin_direction: v[11],
            total_distance: v[12],
            slg: v[13],
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum SlgError {
    #[error("No season record found for {0}")]
    SeasonNotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed after {attempts} attempts: {url}: {message}")]
    Fetch {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("Insufficient data: {rows} usable rows ({context})")]
    InsufficientData { rows: usize, context: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SlgError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub data: DataConfig,
    pub training: TrainingConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the MLB Stats API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per request before giving up
    pub max_attempts: u32,
    /// Base delay between retries in milliseconds (grows linearly)
    pub retry_backoff_ms: u64,
    /// Skip a game whose play-by-play fetch keeps failing instead of
    /// aborting the whole run
    pub skip_failed_games: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset path template; `{season}` is replaced by the season key
    pub dataset_template: String,
}

impl DataConfig {
    /// Resolve the export path for a season
    pub fn dataset_path(&self, season: &str) -> String {
        self.dataset_template.replace("{season}", season)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,
    /// Seed for the train/test shuffle
    pub split_seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of boosting rounds (trees)
    pub n_trees: usize,
    /// Learning rate (shrinkage)
    pub learning_rate: f64,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples per leaf
    pub min_samples_leaf: usize,
    /// Row subsample ratio per tree
    pub subsample: f64,
    /// Seed for row subsampling
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig {
                base_url: "https://statsapi.mlb.com/api/v1".to_string(),
                timeout_secs: 30,
                max_attempts: 3,
                retry_backoff_ms: 1000,
                skip_failed_games: true,
            },
            data: DataConfig {
                dataset_template: "data/slg_{season}.csv".to_string(),
            },
            training: TrainingConfig {
                test_fraction: 0.15,
                split_seed: 42,
            },
            model: ModelConfig {
                n_trees: 100,
                learning_rate: 0.1,
                max_depth: 6,
                min_samples_leaf: 1,
                subsample: 0.8,
                seed: 42,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SlgError::Config(format!("Failed to read config file {}: {}", path, e)))?;
        toml::from_str(&content)
            .map_err(|e| SlgError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SlgError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
