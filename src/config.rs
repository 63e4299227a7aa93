//! Runtime configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ChessResult;

/// What to do when a pawn reaches the last rank without a named piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionPolicy {
    #[default]
    AutoQueen,
    Explicit,
}

/// Header values written to PGN when the caller supplies none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgnDefaults {
    pub event: String,
    pub site: String,
    pub round: String,
    pub white: String,
    pub black: String,
}

impl Default for PgnDefaults {
    fn default() -> Self {
        Self {
            event: "Casual Game".to_owned(),
            site: "Chess App".to_owned(),
            round: "1".to_owned(),
            white: "Player 1".to_owned(),
            black: "Player 2".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub promotion: PromotionPolicy,
    pub pgn: PgnDefaults,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> ChessResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ChessResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
