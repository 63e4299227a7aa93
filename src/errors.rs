//! Error types for the rules engine.
//!
//! Every fallible operation returns [`ChessResult`]. A rejected operation
//! never leaves a partially built position behind.

use std::fmt;

use crate::game_state::chess_types::{Color, Square};

/// Why a move request was refused.
///
/// Callers that only care whether the move went through should treat every
/// reason the same way; the distinction exists for diagnostics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    /// The origin square is empty.
    NoPiece,
    /// The origin piece belongs to the side not on move.
    WrongSide,
    /// The piece cannot reach the destination (including blocked paths,
    /// own-piece destinations and refused castling).
    GeometricallyIllegal,
    /// The move would leave the mover's own king attacked.
    LeavesKingInCheck,
    /// A pawn reached the last rank without a promotion kind under the
    /// explicit promotion policy.
    MissingPromotion,
    /// The requested promotion kind is not queen, rook, bishop or knight.
    InvalidPromotion,
}

impl fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IllegalMoveReason::NoPiece => "no piece on origin square",
            IllegalMoveReason::WrongSide => "piece does not belong to side to move",
            IllegalMoveReason::GeometricallyIllegal => "piece cannot move there",
            IllegalMoveReason::LeavesKingInCheck => "move leaves own king in check",
            IllegalMoveReason::MissingPromotion => "promotion piece required",
            IllegalMoveReason::InvalidPromotion => "invalid promotion piece",
        };
        f.write_str(text)
    }
}

/// Errors produced by the rules engine and its codecs.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    /// FEN text that could not be parsed.
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    /// Square text outside `a1..h8`.
    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    /// A move request that was rejected.
    #[error("Illegal move {from}{to}: {reason}")]
    IllegalMove {
        from: Square,
        to: Square,
        reason: IllegalMoveReason,
    },

    /// SAN token that matches no legal move.
    #[error("Invalid SAN move: {0}")]
    InvalidSan(String),

    /// SAN token that matches more than one legal move.
    #[error("Ambiguous SAN move: {0}")]
    AmbiguousSan(String),

    /// Structurally malformed PGN.
    #[error("Invalid PGN: {0}")]
    InvalidPgn(String),

    /// Coordinate move token such as `e7e8q` that could not be decoded.
    #[error("Invalid move token: {0}")]
    InvalidMoveToken(String),

    /// A side has no king where a playable game needs one.
    #[error("Missing {0} king")]
    MissingKing(Color),

    /// A side has more than one king.
    #[error("More than one {0} king")]
    TooManyKings(Color),

    /// Engine configuration that could not be deserialized.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Puzzle collection that could not be deserialized.
    #[error("Invalid puzzle data: {0}")]
    PuzzleData(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChessError {
    #[inline]
    pub fn illegal(from: Square, to: Square, reason: IllegalMoveReason) -> Self {
        ChessError::IllegalMove { from, to, reason }
    }
}

/// Result type alias for rules-engine operations.
pub type ChessResult<T> = Result<T, ChessError>;
