//! Coordinate move tokens such as `e2e4` or `e7e8q`.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{PieceKind, Square};

pub fn encode_move_token(from: Square, to: Square, promotion: Option<PieceKind>) -> String {
    let mut out = String::with_capacity(5);
    out.push_str(&from.to_string());
    out.push_str(&to.to_string());
    if let Some(kind) = promotion {
        out.push(kind.letter());
    }
    out
}

/// Split a coordinate token into its squares and optional promotion kind.
/// The promotion letter is case-insensitive and must name a promotion target.
pub fn decode_move_token(token: &str) -> ChessResult<(Square, Square, Option<PieceKind>)> {
    let invalid = || ChessError::InvalidMoveToken(token.to_owned());

    if !token.is_ascii() || !(4..=5).contains(&token.len()) {
        return Err(invalid());
    }

    let from: Square = token[0..2].parse().map_err(|_| invalid())?;
    let to: Square = token[2..4].parse().map_err(|_| invalid())?;

    let promotion = match token[4..].chars().next() {
        None => None,
        Some(ch) => {
            let kind = PieceKind::from_letter(ch).ok_or_else(invalid)?;
            if !kind.is_promotion_target() {
                return Err(invalid());
            }
            Some(kind)
        }
    };

    Ok((from, to, promotion))
}
