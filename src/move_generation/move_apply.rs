//! Move application: validation plus the state transition.
//!
//! `apply_move` is atomic. Either the move is legal and a fresh `Position`
//! with its `MoveRecord` comes back, or an `IllegalMove` error does and the
//! input position is untouched (it is only ever borrowed).

use tracing::debug;

use crate::config::PromotionPolicy;
use crate::errors::{ChessError, ChessResult, IllegalMoveReason};
use crate::game_state::chess_rules::{castle_side_for_king_move, castling_squares};
use crate::game_state::move_record::MoveRecord;
use crate::game_state::{chess_types::*, position::Position};
use crate::move_generation::attack_checks::is_in_check;
use crate::move_generation::move_validator::{is_en_passant_target, is_geometrically_legal};
use crate::move_generation::termination::classify;
use crate::utils::san::generate_san;

/// Result of a successful transition.
#[derive(Debug, Clone)]
pub struct AppliedMove {
    pub position: Position,
    pub record: MoveRecord,
}

/// Pure legality check: geometric rules plus "does not leave own king in
/// check". Promotion policy is not consulted.
pub fn is_legal_move(position: &Position, from: Square, to: Square) -> bool {
    check_move(position, from, to).is_ok()
}

/// Legality check with the specific rejection reason.
pub fn check_move(position: &Position, from: Square, to: Square) -> Result<(), IllegalMoveReason> {
    let piece = position.piece_at(from).ok_or(IllegalMoveReason::NoPiece)?;
    if piece.color != position.side_to_move() {
        return Err(IllegalMoveReason::WrongSide);
    }
    if !is_geometrically_legal(position, from, to) {
        return Err(IllegalMoveReason::GeometricallyIllegal);
    }

    // Simulate on a derived copy; the original is never touched.
    let next = play_unchecked(position, from, to, Some(PieceKind::Queen));
    if is_in_check(&next, piece.color) {
        return Err(IllegalMoveReason::LeavesKingInCheck);
    }

    Ok(())
}

/// Apply a move with the default auto-queen promotion policy.
pub fn apply_move(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> ChessResult<AppliedMove> {
    apply_move_with_policy(position, from, to, promotion, PromotionPolicy::AutoQueen)
}

pub fn apply_move_with_policy(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
    policy: PromotionPolicy,
) -> ChessResult<AppliedMove> {
    let reject = |reason: IllegalMoveReason| {
        debug!(%from, %to, %reason, "move rejected");
        ChessError::illegal(from, to, reason)
    };

    check_move(position, from, to).map_err(reject)?;

    let piece = position.piece_at(from).ok_or_else(|| reject(IllegalMoveReason::NoPiece))?;
    let promotes = piece.kind == PieceKind::Pawn && to.rank() == piece.color.promotion_rank();
    let promotion = if promotes {
        match (promotion, policy) {
            (Some(kind), _) if kind.is_promotion_target() => Some(kind),
            (Some(_), _) => return Err(reject(IllegalMoveReason::InvalidPromotion)),
            (None, PromotionPolicy::AutoQueen) => Some(PieceKind::Queen),
            (None, PromotionPolicy::Explicit) => {
                return Err(reject(IllegalMoveReason::MissingPromotion))
            }
        }
    } else {
        None
    };

    let en_passant =
        piece.kind == PieceKind::Pawn && from.file() != to.file() && position.piece_at(to).is_none();
    let captured = if en_passant {
        Some(PieceKind::Pawn)
    } else {
        position.piece_at(to).map(|p| p.kind)
    };
    let castle = if piece.kind == PieceKind::King {
        castle_side_for_king_move(from, to)
    } else {
        None
    };

    let mut next = play_unchecked(position, from, to, promotion);
    next.status = classify(&next);

    let san = generate_san(piece.kind, from, to, captured.is_some(), promotion, castle, &next.status);
    let record = MoveRecord {
        from,
        to,
        piece: piece.kind,
        captured,
        promotion,
        san,
        fen: next.get_fen(),
        castle,
        en_passant,
    };

    debug!(san = %record.san, fen = %record.fen, "move applied");

    Ok(AppliedMove {
        position: next,
        record,
    })
}

/// Build the successor position without any legality checks. The returned
/// status flags are cleared; callers classify when they need them.
pub(crate) fn play_unchecked(
    position: &Position,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> Position {
    let mut next = position.clone();
    next.status = Default::default();

    let Some(piece) = next.remove_piece(from) else {
        return next;
    };
    let mover = piece.color;
    let enemy = mover.opposite();

    let mut is_capture = next.remove_piece(to).is_some();

    // En-passant: the captured pawn sits one rank behind the destination.
    if piece.kind == PieceKind::Pawn
        && from.file() != to.file()
        && !is_capture
        && is_en_passant_target(position, mover, to)
    {
        if let Some(victim_sq) = to.offset(0, -mover.pawn_direction()) {
            if next.piece_at(victim_sq) == Some(Piece::new(PieceKind::Pawn, enemy)) {
                next.remove_piece(victim_sq);
                is_capture = true;
            }
        }
    }

    let placed_kind = match promotion {
        Some(kind) if piece.kind == PieceKind::Pawn && to.rank() == mover.promotion_rank() => kind,
        _ if piece.kind == PieceKind::Pawn && to.rank() == mover.promotion_rank() => PieceKind::Queen,
        _ => piece.kind,
    };
    next.put_piece(to, Piece::new(placed_kind, mover));

    // Castling rook move.
    if piece.kind == PieceKind::King {
        if let Some(side) = castle_side_for_king_move(from, to) {
            let squares = castling_squares(mover, side);
            if let Some(rook) = next.remove_piece(squares.rook_from) {
                next.put_piece(squares.rook_to, rook);
            }
        }
    }

    update_castling_rights(&mut next, mover, from, to, piece.kind);

    next.en_passant_square = if piece.kind == PieceKind::Pawn && from.rank().abs_diff(to.rank()) == 2 {
        from.offset(0, mover.pawn_direction())
    } else {
        None
    };

    if piece.kind == PieceKind::Pawn || is_capture {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if mover == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy;
    next
}

fn update_castling_rights(
    position: &mut Position,
    moving_color: Color,
    from: Square,
    to: Square,
    moved_piece: PieceKind,
) {
    if moved_piece == PieceKind::King {
        position.castling_rights &= !(castling_flag(moving_color, CastleSide::Kingside)
            | castling_flag(moving_color, CastleSide::Queenside));
    }

    // A rook leaving its home corner, or anything landing on it, ends that right.
    for color in [Color::White, Color::Black] {
        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            let rook_home = castling_squares(color, side).rook_from;
            if from == rook_home || to == rook_home {
                position.castling_rights &= !castling_flag(color, side);
            }
        }
    }
}
