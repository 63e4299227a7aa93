//! Legal move enumeration.
//!
//! Every own piece is tried against every board square, filtered first by
//! movement rules and then by the self-check test. With a fixed 64-square
//! board this brute-force scan is bounded and needs no pruning.

use crate::game_state::{chess_types::*, position::Position};
use crate::move_generation::move_apply::{check_move, play_unchecked};
use crate::utils::long_algebraic::encode_move_token;

/// A legal move in coordinate form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegalMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl LegalMove {
    /// Coordinate token, e.g. `g1f3` or `b7b8n`.
    pub fn token(&self) -> String {
        encode_move_token(self.from, self.to, self.promotion)
    }
}

/// All legal moves for the side to move. Promotions appear once per
/// promotion kind.
pub fn legal_moves(position: &Position) -> Vec<LegalMove> {
    let side = position.side_to_move();
    let mut out = Vec::with_capacity(64);

    for (from, piece) in position.pieces_of(side) {
        for to in Square::all() {
            if check_move(position, from, to).is_err() {
                continue;
            }

            if piece.kind == PieceKind::Pawn && to.rank() == side.promotion_rank() {
                out.extend(PieceKind::PROMOTIONS.iter().map(|&kind| LegalMove {
                    from,
                    to,
                    promotion: Some(kind),
                }));
            } else {
                out.push(LegalMove {
                    from,
                    to,
                    promotion: None,
                });
            }
        }
    }

    out
}

/// Destinations the piece on `from` may legally reach. Empty when the
/// square is empty or holds a piece of the side not on move.
pub fn legal_destinations(position: &Position, from: Square) -> Vec<Square> {
    Square::all()
        .filter(|&to| check_move(position, from, to).is_ok())
        .collect()
}

/// Early-exit scan used by termination detection.
pub fn has_any_legal_move(position: &Position) -> bool {
    position
        .pieces_of(position.side_to_move())
        .any(|(from, _)| Square::all().any(|to| check_move(position, from, to).is_ok()))
}

/// Leaf-node count of the legal move tree to `depth` plies.
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|mv| {
            let next = play_unchecked(position, mv.from, mv.to, mv.promotion);
            perft(&next, depth - 1)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::{has_any_legal_move, legal_destinations, legal_moves, perft};
    use crate::game_state::chess_types::{PieceKind, Square};
    use crate::game_state::position::Position;

    fn sq(text: &str) -> Square {
        text.parse().expect("square should parse")
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        let game = Position::new_game();
        assert_eq!(legal_moves(&game).len(), 20);
        assert!(has_any_legal_move(&game));
    }

    #[test]
    fn destinations_for_single_piece() {
        let game = Position::new_game();
        assert_eq!(legal_destinations(&game, sq("g1")), vec![sq("f3"), sq("h3")]);
        assert_eq!(legal_destinations(&game, sq("e2")), vec![sq("e3"), sq("e4")]);
        assert!(legal_destinations(&game, sq("e7")).is_empty());
        assert!(legal_destinations(&game, sq("e4")).is_empty());
    }

    #[test]
    fn promotions_expand_to_four_kinds() {
        let position = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").expect("FEN should parse");
        let promotions: Vec<_> = legal_moves(&position)
            .into_iter()
            .filter(|mv| mv.from == sq("a7"))
            .collect();

        assert_eq!(promotions.len(), 4);
        assert!(promotions.iter().any(|mv| mv.promotion == Some(PieceKind::Knight)));
        assert_eq!(promotions[0].token(), "a7a8q");
    }

    #[test]
    fn perft_shallow_counts() {
        let game = Position::new_game();
        assert_eq!(perft(&game, 1), 20);
        assert_eq!(perft(&game, 2), 400);
    }
}
