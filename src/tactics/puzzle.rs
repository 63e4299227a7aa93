//! Static tactics puzzles and the solution matcher.

use serde::{Deserialize, Serialize};

use crate::errors::ChessResult;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::game_state::position::Position;
use crate::utils::long_algebraic::encode_move_token;

/// Read-only puzzle record. Solution tokens use lowercase coordinate form
/// (`d1h5`, `e7e8q`), the same form `encode_move_token` produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub fen: String,
    pub side_to_move: Color,
    pub solution: String,
    #[serde(default)]
    pub moves: Vec<String>,
    pub theme: String,
    pub rating: u32,
    pub description: String,
}

impl Puzzle {
    pub fn starting_position(&self) -> ChessResult<Position> {
        Position::from_fen(&self.fen)
    }
}

/// Exact token comparison of a played move against the puzzle's accepted
/// answers. Legality is the caller's concern.
pub fn check_solution(
    puzzle: &Puzzle,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> bool {
    let token = encode_move_token(from, to, promotion);
    std::iter::once(&puzzle.solution)
        .chain(puzzle.moves.iter())
        .any(|accepted| *accepted == token)
}

#[cfg(test)]
mod tests {
    use super::{check_solution, Puzzle};
    use crate::game_state::chess_types::{Color, PieceKind, Square};

    fn sq(text: &str) -> Square {
        text.parse().expect("square should parse")
    }

    fn promotion_puzzle() -> Puzzle {
        Puzzle {
            id: "promo".to_owned(),
            fen: "8/4P1k1/8/8/8/8/6K1/8 w - - 0 1".to_owned(),
            side_to_move: Color::White,
            solution: "e7e8q".to_owned(),
            moves: vec!["e7e8r".to_owned()],
            theme: "Promotion".to_owned(),
            rating: 700,
            description: "Promote.".to_owned(),
        }
    }

    #[test]
    fn matches_solution_and_accepted_moves() {
        let puzzle = promotion_puzzle();

        assert!(check_solution(&puzzle, sq("e7"), sq("e8"), Some(PieceKind::Queen)));
        assert!(check_solution(&puzzle, sq("e7"), sq("e8"), Some(PieceKind::Rook)));
        assert!(!check_solution(&puzzle, sq("e7"), sq("e8"), Some(PieceKind::Knight)));
        assert!(!check_solution(&puzzle, sq("e7"), sq("e8"), None));
        assert!(!check_solution(&puzzle, sq("g2"), sq("g3"), None));
    }

    #[test]
    fn comparison_is_exact_token_equality() {
        let mut puzzle = promotion_puzzle();
        puzzle.solution = "E7E8Q".to_owned();
        puzzle.moves.clear();

        assert!(!check_solution(&puzzle, sq("e7"), sq("e8"), Some(PieceKind::Queen)));
    }

    #[test]
    fn starting_position_parses_fen() {
        let position = promotion_puzzle().starting_position().expect("FEN should parse");
        assert_eq!(position.side_to_move(), Color::White);
    }

    #[test]
    fn deserializes_without_accepted_moves() {
        let json = r#"{
            "id": "x", "fen": "8/8/8/8/8/8/8/8 w - - 0 1", "side_to_move": "black",
            "solution": "a1a2", "theme": "Test", "rating": 1, "description": ""
        }"#;
        let puzzle: Puzzle = serde_json::from_str(json).expect("puzzle JSON should parse");

        assert!(puzzle.moves.is_empty());
        assert_eq!(puzzle.side_to_move, Color::Black);
    }
}
