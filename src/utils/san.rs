//! Standard Algebraic Notation.
//!
//! Generation is context-free: it needs only the moved piece, the squares,
//! and the classified status of the resulting position. Files and ranks are
//! never added for disambiguation. Resolution goes the other way and does
//! honour disambiguation qualifiers.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::castling_squares;
use crate::game_state::{chess_types::*, position::Position, position::PositionStatus};
use crate::move_generation::legal_moves::{legal_moves, LegalMove};

/// SAN for a move. `status` describes the position after the move.
pub fn generate_san(
    kind: PieceKind,
    from: Square,
    to: Square,
    is_capture: bool,
    promotion: Option<PieceKind>,
    castle: Option<CastleSide>,
    status: &PositionStatus,
) -> String {
    let mut out = match castle {
        Some(CastleSide::Kingside) => "O-O".to_owned(),
        Some(CastleSide::Queenside) => "O-O-O".to_owned(),
        None => {
            let mut body = String::with_capacity(7);
            match kind.san_letter() {
                Some(letter) => body.push(letter),
                None if is_capture => body.push(from.file_char()),
                None => {}
            }
            if is_capture {
                body.push('x');
            }
            body.push_str(&to.to_string());
            if let Some(letter) = promotion.and_then(PieceKind::san_letter) {
                body.push('=');
                body.push(letter);
            }
            body
        }
    };

    if status.is_checkmate {
        out.push('#');
    } else if status.in_check {
        out.push('+');
    }
    out
}

/// Find the unique legal move a SAN token names in `position`.
///
/// Check, mate and annotation suffixes are ignored. Castling accepts both
/// letter and digit forms. A promoting pawn move written without `=X`
/// resolves to a queen promotion.
pub fn resolve_san(position: &Position, san: &str) -> ChessResult<LegalMove> {
    let invalid = || ChessError::InvalidSan(san.to_owned());

    let token = san
        .trim()
        .trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'));
    if !token.is_ascii() || token.is_empty() {
        return Err(invalid());
    }

    if let Some(side) = castle_side_from_token(token) {
        let color = position.side_to_move();
        let squares = castling_squares(color, side);
        let castle = LegalMove {
            from: squares.king_from,
            to: squares.king_to,
            promotion: None,
        };
        let king_home = position.piece_at(squares.king_from) == Some(Piece::new(PieceKind::King, color));
        return if king_home && legal_moves(position).contains(&castle) {
            Ok(castle)
        } else {
            Err(invalid())
        };
    }

    let (body, promotion) = split_promotion(token).ok_or_else(invalid)?;

    let (kind, rest) = match body.chars().next() {
        Some(letter @ ('N' | 'B' | 'R' | 'Q' | 'K')) => {
            (PieceKind::from_letter(letter).ok_or_else(invalid)?, &body[1..])
        }
        Some(_) => (PieceKind::Pawn, body),
        None => return Err(invalid()),
    };
    if rest.len() < 2 {
        return Err(invalid());
    }

    let (qualifier, destination) = rest.split_at(rest.len() - 2);
    let to: Square = destination.parse().map_err(|_| invalid())?;
    let qualifier = qualifier.strip_suffix('x').unwrap_or(qualifier);
    let (file_hint, rank_hint) = parse_qualifier(qualifier).ok_or_else(invalid)?;

    let wanted_promotion = promotion.unwrap_or(PieceKind::Queen);
    let candidates: Vec<LegalMove> = legal_moves(position)
        .into_iter()
        .filter(|mv| {
            position.piece_at(mv.from).map(|p| p.kind) == Some(kind)
                && mv.to == to
                && file_hint.map_or(true, |file| mv.from.file() == file)
                && rank_hint.map_or(true, |rank| mv.from.rank() == rank)
                && match mv.promotion {
                    Some(promoted) => promoted == wanted_promotion,
                    None => promotion.is_none(),
                }
        })
        .collect();

    match candidates.as_slice() {
        [single] => Ok(*single),
        [] => Err(invalid()),
        _ => Err(ChessError::AmbiguousSan(san.to_owned())),
    }
}

fn castle_side_from_token(token: &str) -> Option<CastleSide> {
    match token {
        "O-O" | "0-0" => Some(CastleSide::Kingside),
        "O-O-O" | "0-0-0" => Some(CastleSide::Queenside),
        _ => None,
    }
}

/// Accepts `e8=Q` and the bare `e8Q` form. `None` means a malformed suffix.
fn split_promotion(token: &str) -> Option<(&str, Option<PieceKind>)> {
    if let Some((body, suffix)) = token.split_once('=') {
        let mut chars = suffix.chars();
        let kind = chars.next().and_then(PieceKind::from_letter)?;
        if chars.next().is_some() || !kind.is_promotion_target() {
            return None;
        }
        return Some((body, Some(kind)));
    }

    let bytes = token.as_bytes();
    if let [.., rank, letter @ (b'Q' | b'R' | b'B' | b'N')] = bytes {
        if rank.is_ascii_digit() {
            let kind = PieceKind::from_letter(char::from(*letter))?;
            return Some((&token[..token.len() - 1], Some(kind)));
        }
    }
    Some((token, None))
}

/// File and/or rank of the origin square, e.g. `a`, `1` or `a1`.
fn parse_qualifier(qualifier: &str) -> Option<(Option<u8>, Option<u8>)> {
    let mut file = None;
    let mut rank = None;
    for byte in qualifier.bytes() {
        match byte {
            b'a'..=b'h' if file.is_none() && rank.is_none() => file = Some(byte - b'a'),
            b'1'..=b'8' if rank.is_none() => rank = Some(byte - b'1'),
            _ => return None,
        }
    }
    Some((file, rank))
}

#[cfg(test)]
mod tests {
    use super::{generate_san, resolve_san};
    use crate::errors::ChessError;
    use crate::game_state::chess_types::{CastleSide, PieceKind, Square};
    use crate::game_state::position::{Position, PositionStatus};

    fn sq(text: &str) -> Square {
        text.parse().expect("square should parse")
    }

    #[test]
    fn generates_piece_pawn_and_castle_notation() {
        let quiet = PositionStatus::default();
        let check = PositionStatus {
            in_check: true,
            ..PositionStatus::default()
        };
        let mate = PositionStatus {
            in_check: true,
            is_checkmate: true,
            is_stalemate: false,
        };

        assert_eq!(generate_san(PieceKind::Knight, sq("g1"), sq("f3"), false, None, None, &quiet), "Nf3");
        assert_eq!(generate_san(PieceKind::Pawn, sq("e4"), sq("d5"), true, None, None, &quiet), "exd5");
        assert_eq!(generate_san(PieceKind::Bishop, sq("c4"), sq("f7"), true, None, None, &check), "Bxf7+");
        assert_eq!(generate_san(PieceKind::Queen, sq("d8"), sq("h4"), false, None, None, &mate), "Qh4#");
        assert_eq!(
            generate_san(PieceKind::Pawn, sq("b7"), sq("a8"), true, Some(PieceKind::Rook), None, &quiet),
            "bxa8=R"
        );
        assert_eq!(
            generate_san(PieceKind::King, Square::E1, Square::C1, false, None, Some(CastleSide::Queenside), &check),
            "O-O-O+"
        );
    }

    #[test]
    fn resolves_simple_moves() {
        let game = Position::new_game();

        let knight = resolve_san(&game, "Nf3").expect("Nf3 should resolve");
        assert_eq!((knight.from, knight.to), (sq("g1"), sq("f3")));

        let pawn = resolve_san(&game, "e4!?").expect("e4 should resolve");
        assert_eq!((pawn.from, pawn.to), (sq("e2"), sq("e4")));
    }

    #[test]
    fn resolves_pawn_captures_and_promotions() {
        let position =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                .expect("FEN should parse");
        let capture = resolve_san(&position, "exd5").expect("exd5 should resolve");
        assert_eq!((capture.from, capture.to), (sq("e4"), sq("d5")));

        let promo = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").expect("FEN should parse");
        assert_eq!(
            resolve_san(&promo, "a8=N").expect("underpromotion").promotion,
            Some(PieceKind::Knight)
        );
        assert_eq!(resolve_san(&promo, "a8Q+").expect("bare suffix").promotion, Some(PieceKind::Queen));
        assert_eq!(resolve_san(&promo, "a8").expect("implicit queen").promotion, Some(PieceKind::Queen));
    }

    #[test]
    fn resolves_castling_in_both_spellings() {
        let position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");

        let short = resolve_san(&position, "O-O").expect("O-O should resolve");
        assert_eq!((short.from, short.to), (Square::E1, Square::G1));

        let long = resolve_san(&position, "0-0-0").expect("0-0-0 should resolve");
        assert_eq!((long.from, long.to), (Square::E1, Square::C1));

        let no_rights =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").expect("FEN should parse");
        assert!(matches!(resolve_san(&no_rights, "O-O"), Err(ChessError::InvalidSan(_))));
    }

    #[test]
    fn disambiguation_is_required_and_honoured() {
        let position = Position::from_fen("k7/8/8/8/4K3/8/8/R6R w - - 0 1").expect("FEN should parse");

        assert!(matches!(resolve_san(&position, "Rd1"), Err(ChessError::AmbiguousSan(_))));
        assert_eq!(resolve_san(&position, "Rad1").expect("Rad1").from, Square::A1);
        assert_eq!(resolve_san(&position, "Rhd1").expect("Rhd1").from, Square::H1);
        assert_eq!(resolve_san(&position, "Ra1d1").expect("Ra1d1").from, Square::A1);
    }

    #[test]
    fn rejects_unplayable_or_malformed_tokens() {
        let game = Position::new_game();
        for token in ["Nf6", "Ke2", "e5", "zz", "", "Qx", "e8=K", "N"] {
            assert!(matches!(resolve_san(&game, token), Err(ChessError::InvalidSan(_))), "{token}");
        }
    }
}
