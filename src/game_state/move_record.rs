use crate::game_state::chess_types::{CastleSide, PieceKind, Square};
use crate::utils::long_algebraic::encode_move_token;

/// One applied move as it appears in game history. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub san: String,
    /// FEN of the position after the move.
    pub fen: String,
    pub castle: Option<CastleSide>,
    pub en_passant: bool,
}

impl MoveRecord {
    /// Coordinate token, e.g. `e2e4` or `e7e8q`.
    pub fn coordinate_token(&self) -> String {
        encode_move_token(self.from, self.to, self.promotion)
    }
}
