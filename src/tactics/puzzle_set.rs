//! In-memory puzzle collection with rating and theme lookups.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;

use crate::errors::ChessResult;
use crate::tactics::puzzle::Puzzle;

/// Puzzles within this many rating points count as a match.
pub const RATING_WINDOW: u32 = 200;

#[derive(Debug, Clone, Default)]
pub struct PuzzleSet {
    puzzles: Vec<Puzzle>,
}

impl PuzzleSet {
    /// The collection shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_json_str(include_str!("data/puzzles.json")).unwrap_or_default()
    }

    /// Load a JSON array of puzzle records.
    pub fn from_json_str(json: &str) -> ChessResult<Self> {
        let puzzles: Vec<Puzzle> = serde_json::from_str(json)?;
        debug!(count = puzzles.len(), "loaded puzzle set");
        Ok(Self { puzzles })
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
        self.puzzles.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Puzzle> {
        self.puzzles.iter().find(|puzzle| puzzle.id == id)
    }

    /// Random puzzle near `rating`, or any puzzle when none is close.
    pub fn next_puzzle<R: Rng + ?Sized>(&self, rating: u32, rng: &mut R) -> Option<&Puzzle> {
        let near: Vec<&Puzzle> = self
            .puzzles
            .iter()
            .filter(|puzzle| puzzle.rating.abs_diff(rating) <= RATING_WINDOW)
            .collect();

        if near.is_empty() {
            if self.puzzles.is_empty() {
                return None;
            }
            return Some(&self.puzzles[rng.random_range(0..self.puzzles.len())]);
        }

        Some(near[rng.random_range(0..near.len())])
    }

    /// Case-insensitive theme match.
    pub fn by_theme(&self, theme: &str) -> Vec<&Puzzle> {
        self.puzzles
            .iter()
            .filter(|puzzle| puzzle.theme.eq_ignore_ascii_case(theme))
            .collect()
    }

    /// Distinct themes in sorted order.
    pub fn themes(&self) -> Vec<&str> {
        self.puzzles
            .iter()
            .map(|puzzle| puzzle.theme.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
