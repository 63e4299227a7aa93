//! Piece-movement rules, ignoring whether the mover's king ends up in check.
//!
//! Everything here is a pure predicate over a borrowed position.

use crate::game_state::chess_rules::{castle_side_for_king_move, castling_squares};
use crate::game_state::{chess_types::*, position::Position};
use crate::move_generation::attack_checks::{is_in_check, is_square_attacked};
use crate::moves::leaper_attacks::{king_attacks, knight_attacks, pawn_attacks};
use crate::moves::slider_attacks::{is_diagonal, is_orthogonal, squares_between};

/// True when every square strictly between `from` and `to` is empty.
/// Squares that do not share a line have nothing in between.
#[inline]
pub fn is_path_clear(position: &Position, from: Square, to: Square) -> bool {
    squares_between(from, to) & position.occupancy() == 0
}

/// Whether the piece on `from` may move to `to` by its movement rules.
///
/// Returns false when `from` is empty or not owned by the side to move, or
/// when `to` holds a piece of the mover's own colour. King two-file shifts
/// are judged by the castling rule.
pub fn is_geometrically_legal(position: &Position, from: Square, to: Square) -> bool {
    let Some(piece) = position.piece_at(from) else {
        return false;
    };
    if piece.color != position.side_to_move() || from == to {
        return false;
    }
    if position.occupancy_of(piece.color) & to.bit() != 0 {
        return false;
    }

    match piece.kind {
        PieceKind::Pawn => is_pawn_move_legal(position, piece.color, from, to),
        PieceKind::Knight => knight_attacks(from) & to.bit() != 0,
        PieceKind::Bishop => is_diagonal(from, to) && is_path_clear(position, from, to),
        PieceKind::Rook => is_orthogonal(from, to) && is_path_clear(position, from, to),
        PieceKind::Queen => {
            (is_diagonal(from, to) || is_orthogonal(from, to)) && is_path_clear(position, from, to)
        }
        PieceKind::King => {
            if king_attacks(from) & to.bit() != 0 {
                return true;
            }
            match castle_side_for_king_move(from, to) {
                Some(side) => can_castle(position, piece.color, side),
                None => false,
            }
        }
    }
}

fn is_pawn_move_legal(position: &Position, color: Color, from: Square, to: Square) -> bool {
    let direction = color.pawn_direction();
    let occupied = |square: Square| position.occupancy() & square.bit() != 0;

    if from.file() == to.file() {
        let Some(one_step) = from.offset(0, direction) else {
            return false;
        };
        if occupied(one_step) {
            return false;
        }
        if to == one_step {
            return true;
        }
        return from.rank() == color.pawn_start_rank()
            && from.offset(0, 2 * direction) == Some(to)
            && !occupied(to);
    }

    if pawn_attacks(color, from) & to.bit() == 0 {
        return false;
    }
    if position.occupancy_of(color.opposite()) & to.bit() != 0 {
        return true;
    }
    is_en_passant_target(position, color, to)
}

/// `to` is the live en-passant target and sits on the rank a capturing pawn
/// of `color` lands on.
pub(crate) fn is_en_passant_target(position: &Position, color: Color, to: Square) -> bool {
    let landing_rank = match color {
        Color::White => 5,
        Color::Black => 2,
    };
    position.en_passant_square() == Some(to) && to.rank() == landing_rank
}

/// Castling rule: the right is still held, king and rook stand on their home
/// squares, everything between them is empty, and the king's origin, transit
/// and destination squares are not attacked.
pub fn can_castle(position: &Position, color: Color, side: CastleSide) -> bool {
    if !position.has_castling_right(color, side) {
        return false;
    }

    let squares = castling_squares(color, side);
    if position.piece_at(squares.king_from) != Some(Piece::new(PieceKind::King, color))
        || position.piece_at(squares.rook_from) != Some(Piece::new(PieceKind::Rook, color))
    {
        return false;
    }
    if !is_path_clear(position, squares.king_from, squares.rook_from) {
        return false;
    }

    // Cannot castle out of, through, or into check.
    let enemy = color.opposite();
    !is_in_check(position, color)
        && !is_square_attacked(position, squares.king_transit, enemy)
        && !is_square_attacked(position, squares.king_to, enemy)
}
