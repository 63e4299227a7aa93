//! Attack and check analysis.
//!
//! Pawns attack along their capture diagonals only. A side without a king
//! is never in check.

use crate::game_state::{chess_types::*, position::Position};
use crate::moves::leaper_attacks::{king_attacks, knight_attacks, pawn_attacks};
use crate::moves::slider_attacks::{bishop_attacks, rook_attacks};

#[inline]
pub fn is_in_check(position: &Position, color: Color) -> bool {
    let Some(king_sq) = position.king_square(color) else {
        return false;
    };
    is_square_attacked(position, king_sq, color.opposite())
}

/// True if any piece of `attacker_color` reaches `square` given the
/// current occupancy.
pub fn is_square_attacked(position: &Position, square: Square, attacker_color: Color) -> bool {
    let bb = |kind: PieceKind| position.bitboard(attacker_color, kind);

    // A pawn of `attacker_color` hits `square` exactly when a pawn of the
    // other colour standing on `square` would hit the pawn's square.
    if pawn_attacks(attacker_color.opposite(), square) & bb(PieceKind::Pawn) != 0 {
        return true;
    }

    if knight_attacks(square) & bb(PieceKind::Knight) != 0 {
        return true;
    }

    if king_attacks(square) & bb(PieceKind::King) != 0 {
        return true;
    }

    let occupancy = position.occupancy();

    let diagonal_sliders = bb(PieceKind::Bishop) | bb(PieceKind::Queen);
    if bishop_attacks(square, occupancy) & diagonal_sliders != 0 {
        return true;
    }

    let straight_sliders = bb(PieceKind::Rook) | bb(PieceKind::Queen);
    rook_attacks(square, occupancy) & straight_sliders != 0
}

#[cfg(test)]
mod tests {
    use super::{is_in_check, is_square_attacked};
    use crate::game_state::chess_types::{Color, Square};
    use crate::game_state::position::Position;

    fn sq(text: &str) -> Square {
        text.parse().expect("square should parse")
    }

    #[test]
    fn starting_position_attack_map() {
        let game = Position::new_game();

        assert!(is_square_attacked(&game, sq("f3"), Color::White));
        assert!(is_square_attacked(&game, sq("e3"), Color::White));
        assert!(!is_square_attacked(&game, sq("e4"), Color::White));
        assert!(is_square_attacked(&game, sq("c6"), Color::Black));
        assert!(!is_in_check(&game, Color::White));
        assert!(!is_in_check(&game, Color::Black));
    }

    #[test]
    fn pawns_do_not_attack_forward() {
        let position = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        assert!(!is_square_attacked(&position, sq("e3"), Color::White));
        assert!(is_square_attacked(&position, sq("d3"), Color::White));
        assert!(is_square_attacked(&position, sq("f3"), Color::White));
    }

    #[test]
    fn slider_check_is_blocked_by_interposed_piece() {
        let open = Position::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").expect("FEN should parse");
        assert!(is_in_check(&open, Color::White));

        let blocked = Position::from_fen("4k3/8/8/8/8/8/8/4KB1r w - - 0 1").expect("FEN should parse");
        assert!(!is_in_check(&blocked, Color::White));
    }

    #[test]
    fn missing_king_is_never_in_check() {
        let position = Position::from_fen("8/8/8/8/8/8/8/r7 w - - 0 1").expect("FEN should parse");
        assert!(!is_in_check(&position, Color::White));
    }
}
