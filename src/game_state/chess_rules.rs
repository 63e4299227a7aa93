//! Canonical chess-rule constants.
//!
//! Static literals for the standard starting setup and the fixed squares the
//! castling rule works with.

use crate::game_state::chess_types::{CastleSide, Color, PieceKind, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Back-rank piece order from the a-file to the h-file.
pub const BACK_RANK_ORDER: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Fixed squares involved in one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingSquares {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Square the king passes over; must not be attacked.
    pub king_transit: Square,
}

pub const fn castling_squares(color: Color, side: CastleSide) -> CastlingSquares {
    match (color, side) {
        (Color::White, CastleSide::Kingside) => CastlingSquares {
            king_from: Square::E1,
            king_to: Square::G1,
            rook_from: Square::H1,
            rook_to: Square::F1,
            king_transit: Square::F1,
        },
        (Color::White, CastleSide::Queenside) => CastlingSquares {
            king_from: Square::E1,
            king_to: Square::C1,
            rook_from: Square::A1,
            rook_to: Square::D1,
            king_transit: Square::D1,
        },
        (Color::Black, CastleSide::Kingside) => CastlingSquares {
            king_from: Square::E8,
            king_to: Square::G8,
            rook_from: Square::H8,
            rook_to: Square::F8,
            king_transit: Square::F8,
        },
        (Color::Black, CastleSide::Queenside) => CastlingSquares {
            king_from: Square::E8,
            king_to: Square::C8,
            rook_from: Square::A8,
            rook_to: Square::D8,
            king_transit: Square::D8,
        },
    }
}

/// Castling wing implied by a king move, if it is a two-file shift along a rank.
pub fn castle_side_for_king_move(from: Square, to: Square) -> Option<CastleSide> {
    if from.rank() != to.rank() {
        return None;
    }
    match to.file() as i8 - from.file() as i8 {
        2 => Some(CastleSide::Kingside),
        -2 => Some(CastleSide::Queenside),
        _ => None,
    }
}
