//! Error types
//!
//! Only failures that abort game start surface as errors. Missing assets,
//! animations and level data are logged and replaced with fallbacks.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid level data: {0}")]
    LevelData(#[from] serde_json::Error),

    #[error("level data contains no encounters")]
    EmptyLevelData,

    #[error("browser setup failed: {0}")]
    Browser(String),
}
