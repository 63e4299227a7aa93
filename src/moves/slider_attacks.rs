//! Occupancy-aware ray attacks for rooks, bishops and queens, plus the
//! line geometry the move validator needs (alignment and in-between squares).

use crate::game_state::chess_types::Square;

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    ROOK_DIRECTIONS
        .iter()
        .fold(0u64, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    BISHOP_DIRECTIONS
        .iter()
        .fold(0u64, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: u64) -> u64 {
    rook_attacks(square, occupancy) | bishop_attacks(square, occupancy)
}

/// Squares reached walking one direction until the edge or the first
/// occupied square (which is included).
fn trace_ray(square: Square, file_step: i8, rank_step: i8, occupancy: u64) -> u64 {
    let mut attacks = 0u64;
    let mut current = square.offset(file_step, rank_step);

    while let Some(target) = current {
        attacks |= target.bit();
        if occupancy & target.bit() != 0 {
            break;
        }
        current = target.offset(file_step, rank_step);
    }

    attacks
}

/// Same rank or same file.
#[inline]
pub fn is_orthogonal(from: Square, to: Square) -> bool {
    from != to && (from.file() == to.file() || from.rank() == to.rank())
}

/// Same diagonal or anti-diagonal.
#[inline]
pub fn is_diagonal(from: Square, to: Square) -> bool {
    from != to && from.file().abs_diff(to.file()) == from.rank().abs_diff(to.rank())
}

/// Bitboard of the squares strictly between two aligned squares; empty when
/// the squares do not share a rank, file or diagonal.
pub fn squares_between(from: Square, to: Square) -> u64 {
    if !is_orthogonal(from, to) && !is_diagonal(from, to) {
        return 0;
    }

    let file_step = (to.file() as i8 - from.file() as i8).signum();
    let rank_step = (to.rank() as i8 - from.rank() as i8).signum();
    let mut between = 0u64;
    let mut current = from.offset(file_step, rank_step);

    while let Some(square) = current {
        if square == to {
            break;
        }
        between |= square.bit();
        current = square.offset(file_step, rank_step);
    }

    between
}

#[cfg(test)]
mod tests {
    use super::{bishop_attacks, is_diagonal, is_orthogonal, rook_attacks, squares_between};
    use crate::game_state::chess_types::Square;

    fn sq(text: &str) -> Square {
        text.parse().expect("square should parse")
    }

    #[test]
    fn empty_board_ray_counts() {
        assert_eq!(rook_attacks(sq("d4"), 0).count_ones(), 14);
        assert_eq!(bishop_attacks(sq("d4"), 0).count_ones(), 13);
    }

    #[test]
    fn blocker_stops_ray_but_is_included() {
        let attacks = rook_attacks(Square::A1, sq("a4").bit());
        assert_ne!(attacks & sq("a4").bit(), 0);
        assert_eq!(attacks & sq("a5").bit(), 0);

        let attacks = bishop_attacks(Square::C1, sq("e3").bit());
        assert_ne!(attacks & sq("e3").bit(), 0);
        assert_eq!(attacks & sq("f4").bit(), 0);
    }

    #[test]
    fn between_squares_for_lines() {
        assert_eq!(squares_between(Square::E1, Square::H1), Square::F1.bit() | Square::G1.bit());
        assert_eq!(squares_between(sq("c1"), sq("f4")), sq("d2").bit() | sq("e3").bit());
        assert_eq!(squares_between(sq("e4"), sq("e5")), 0);
        assert_eq!(squares_between(sq("b1"), sq("c3")), 0);
    }

    #[test]
    fn alignment_predicates() {
        assert!(is_orthogonal(sq("a1"), sq("a8")));
        assert!(!is_orthogonal(sq("a1"), sq("b2")));
        assert!(is_diagonal(sq("a1"), sq("h8")));
        assert!(!is_diagonal(sq("a1"), sq("a1")));
    }
}
