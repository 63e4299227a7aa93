//! Board state representation.
//!
//! `Position` is the central value of the engine: piece bitboards with
//! occupancy caches, side to move, castling rights, en-passant target,
//! clocks and the derived check/mate/stalemate status. Transitions never
//! mutate a position in place; they return a new value.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::BACK_RANK_ORDER;
use crate::game_state::chess_types::*;
use crate::move_generation::termination::classify;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Derived flags, recomputed after every transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionStatus {
    pub in_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
}

impl PositionStatus {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.is_checkmate || self.is_stalemate
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    // [color][piece_kind]
    pub(crate) pieces: [[u64; 6]; 2],

    pub(crate) occupancy_by_color: [u64; 2],
    pub(crate) occupancy_all: u64,

    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,

    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,

    pub(crate) status: PositionStatus,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            status: PositionStatus::default(),
        }
    }
}

impl Position {
    /// Empty board, white to move, no rights.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// The standard initial array.
    pub fn new_game() -> Self {
        let mut position = Self::new_empty();

        for (file, kind) in BACK_RANK_ORDER.iter().enumerate() {
            let file = file as u8;
            for (color, back_rank, pawn_rank) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                if let (Some(back), Some(pawn)) = (
                    Square::from_file_rank(file, back_rank),
                    Square::from_file_rank(file, pawn_rank),
                ) {
                    position.put_piece(back, Piece::new(*kind, color));
                    position.put_piece(pawn, Piece::new(PieceKind::Pawn, color));
                }
            }
        }

        position.castling_rights = CASTLE_ALL;
        position
    }

    /// Parse a FEN string. Derived status flags start cleared; see
    /// [`Position::classified`].
    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// Same position with its status flags computed from the board.
    pub fn classified(mut self) -> Self {
        self.status = classify(&self);
        self
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn has_castling_right(&self, color: Color, side: CastleSide) -> bool {
        self.castling_rights & castling_flag(color, side) != 0
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn status(&self) -> PositionStatus {
        self.status
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.status.in_check
    }

    #[inline]
    pub fn is_checkmate(&self) -> bool {
        self.status.is_checkmate
    }

    #[inline]
    pub fn is_stalemate(&self) -> bool {
        self.status.is_stalemate
    }

    /// Bitboard of one colour's pieces of one kind.
    #[inline]
    pub fn bitboard(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn occupancy(&self) -> u64 {
        self.occupancy_all
    }

    #[inline]
    pub fn occupancy_of(&self, color: Color) -> u64 {
        self.occupancy_by_color[color.index()]
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let mask = square.bit();
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in [Color::White, Color::Black] {
            if self.occupancy_by_color[color.index()] & mask == 0 {
                continue;
            }
            for kind in PieceKind::ALL {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some(Piece::new(kind, color));
                }
            }
        }
        None
    }

    /// Every piece of one colour with its square.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        BitIter(self.occupancy_by_color[color.index()]).filter_map(move |square| {
            self.piece_at(square).map(|piece| (square, piece))
        })
    }

    /// Square of the given side's king, if it has one.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::lowest(self.pieces[color.index()][PieceKind::King.index()])
    }

    /// Checks the one-king-per-side invariant required for play.
    pub fn validate_kings(&self) -> ChessResult<()> {
        for color in [Color::White, Color::Black] {
            match self.bitboard(color, PieceKind::King).count_ones() {
                0 => return Err(ChessError::MissingKing(color)),
                1 => {}
                _ => return Err(ChessError::TooManyKings(color)),
            }
        }
        Ok(())
    }

    pub(crate) fn put_piece(&mut self, square: Square, piece: Piece) {
        self.remove_piece(square);
        let mask = square.bit();
        self.pieces[piece.color.index()][piece.kind.index()] |= mask;
        self.occupancy_by_color[piece.color.index()] |= mask;
        self.occupancy_all |= mask;
    }

    pub(crate) fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let piece = self.piece_at(square)?;
        let mask = !square.bit();
        self.pieces[piece.color.index()][piece.kind.index()] &= mask;
        self.occupancy_by_color[piece.color.index()] &= mask;
        self.occupancy_all &= mask;
        Some(piece)
    }
}
