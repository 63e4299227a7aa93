//! Check, checkmate and stalemate classification.

use crate::game_state::position::{Position, PositionStatus};
use crate::move_generation::attack_checks::is_in_check;
use crate::move_generation::legal_moves::has_any_legal_move;

/// Classify the side to move. Pure: calling it twice gives the same answer.
pub fn classify(position: &Position) -> PositionStatus {
    let in_check = is_in_check(position, position.side_to_move());
    let can_move = has_any_legal_move(position);

    PositionStatus {
        in_check,
        is_checkmate: in_check && !can_move,
        is_stalemate: !in_check && !can_move,
    }
}
