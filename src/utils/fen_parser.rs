//! FEN-to-Position parser.
//!
//! Accepts exactly six space-separated fields. Move history and the derived
//! check/mate/stalemate flags are not part of FEN and start cleared.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, position::Position};

pub fn parse_fen(fen: &str) -> ChessResult<Position> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let [board_part, side_part, castling_part, en_passant_part, halfmove_part, fullmove_part] =
        fields[..]
    else {
        return Err(invalid(format!(
            "expected 6 fields, found {} in '{fen}'",
            fields.len()
        )));
    };

    let mut position = Position::new_empty();

    parse_board(board_part, &mut position)?;
    position.side_to_move = parse_side_to_move(side_part)?;
    position.castling_rights = parse_castling_rights(castling_part)?;
    position.en_passant_square = parse_en_passant_square(en_passant_part)?;
    position.halfmove_clock = halfmove_part
        .parse::<u32>()
        .map_err(|_| invalid(format!("halfmove clock '{halfmove_part}'")))?;
    position.fullmove_number = fullmove_part
        .parse::<u32>()
        .map_err(|_| invalid(format!("fullmove number '{fullmove_part}'")))?;

    Ok(position)
}

fn invalid(message: String) -> ChessError {
    ChessError::InvalidFen(message)
}

fn parse_board(board_part: &str, position: &mut Position) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks".to_owned()));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(format!("empty-square count '{ch}'")));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(invalid(format!("rank '{rank_str}' has more than 8 files")));
                }
                continue;
            }

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| invalid(format!("piece character '{ch}'")))?;
            let square = Square::from_file_rank(file, board_rank)
                .ok_or_else(|| invalid(format!("rank '{rank_str}' has more than 8 files")))?;

            position.put_piece(square, piece);
            file += 1;
        }

        if file != 8 {
            return Err(invalid(format!("rank '{rank_str}' does not sum to 8 files")));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(invalid(format!("side-to-move field '{side_part}'"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    castling_part.chars().try_fold(0, |rights, ch| {
        let flag = match ch {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            _ => return Err(invalid(format!("castling rights character '{ch}'"))),
        };
        Ok(rights | flag)
    })
}

fn parse_en_passant_square(en_passant_part: &str) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square: Square = en_passant_part
        .parse()
        .map_err(|_| invalid(format!("en-passant square '{en_passant_part}'")))?;
    if square.rank() != 2 && square.rank() != 5 {
        return Err(invalid(format!("en-passant square '{en_passant_part}' not on rank 3 or 6")));
    }
    Ok(Some(square))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::errors::ChessError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, Piece, PieceKind, Square, CASTLE_ALL};
    use crate::utils::render_game_state::render_position;

    #[test]
    fn parse_starting_fen_and_render_board() {
        let position = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        println!("\n{}", render_position(&position));

        assert_eq!(position.side_to_move(), Color::White);
        assert_eq!(position.castling_rights(), CASTLE_ALL);
        assert_eq!(position.fullmove_number(), 1);
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.occupancy().count_ones(), 32);
        assert!(!position.in_check());
    }

    #[test]
    fn parses_metadata_fields() {
        let position = parse_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1").expect("FEN should parse");

        assert_eq!(position.side_to_move(), Color::Black);
        assert_eq!(position.en_passant_square(), Some("e3".parse::<Square>().expect("square")));
        assert_eq!(position.castling_rights(), 0);
        assert_eq!(
            position.piece_at("e4".parse().expect("square")),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
    }

    #[test]
    fn rejects_wrong_field_count() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra",
            "",
        ] {
            assert!(matches!(parse_fen(fen), Err(ChessError::InvalidFen(_))), "{fen}");
        }
    }

    #[test]
    fn rejects_malformed_fields() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNRR w KQkq - 0 1",
            "rnbqkbnx/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - -1 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 one",
        ] {
            assert!(matches!(parse_fen(fen), Err(ChessError::InvalidFen(_))), "{fen}");
        }
    }
}
