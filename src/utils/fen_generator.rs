//! Position-to-FEN generator, the structural inverse of `fen_parser`.

use crate::game_state::{chess_types::*, position::Position};

pub fn generate_fen(position: &Position) -> String {
    let en_passant = position
        .en_passant_square()
        .map_or_else(|| "-".to_owned(), |square| square.to_string());

    format!(
        "{} {} {} {} {} {}",
        generate_board_field(position),
        position.side_to_move().fen_char(),
        generate_castling_field(position.castling_rights()),
        en_passant,
        position.halfmove_clock(),
        position.fullmove_number()
    )
}

fn generate_board_field(position: &Position) -> String {
    let mut out = String::with_capacity(72);

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            let piece = Square::from_file_rank(file, rank).and_then(|sq| position.piece_at(sq));
            match piece {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece.fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let out: String = [
        (CASTLE_WHITE_KINGSIDE, 'K'),
        (CASTLE_WHITE_QUEENSIDE, 'Q'),
        (CASTLE_BLACK_KINGSIDE, 'k'),
        (CASTLE_BLACK_QUEENSIDE, 'q'),
    ]
    .iter()
    .filter(|(flag, _)| rights & flag != 0)
    .map(|(_, ch)| *ch)
    .collect();

    if out.is_empty() {
        "-".to_owned()
    } else {
        out
    }
}
