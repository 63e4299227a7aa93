//! Caller-owned game: current position, append-only history, undo.
//!
//! Positions themselves carry no history. The session keeps every prior
//! position so undo is a pop rather than a replay.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::EngineConfig;
use crate::errors::ChessResult;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::game_state::move_record::MoveRecord;
use crate::game_state::position::Position;
use crate::move_generation::legal_moves::legal_destinations;
use crate::move_generation::move_apply::apply_move_with_policy;
use crate::utils::long_algebraic::decode_move_token;
use crate::utils::pgn::{read_pgn, write_pgn};
use crate::utils::san::resolve_san;

/// Response to a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    pub success: bool,
    pub in_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
}

impl MoveOutcome {
    pub fn rejected() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameOutcome {
    /// PGN result token.
    pub fn result_token(self) -> &'static str {
        match self {
            GameOutcome::Ongoing => "*",
            GameOutcome::Checkmate { winner: Color::White } => "1-0",
            GameOutcome::Checkmate { winner: Color::Black } => "0-1",
            GameOutcome::Stalemate => "1/2-1/2",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    config: EngineConfig,
    initial: Position,
    position: Position,
    history: Vec<MoveRecord>,
    prior_positions: Vec<Position>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Standard starting position, default configuration.
    pub fn new() -> Self {
        Self::starting_from(Position::new_game())
    }

    /// Start from a FEN position. Each side must have exactly one king.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let position = Position::from_fen(fen)?;
        position.validate_kings()?;
        Ok(Self::starting_from(position.classified()))
    }

    /// Replay a PGN game from its headers and SAN movetext.
    pub fn from_pgn(pgn: &str) -> ChessResult<Self> {
        let game = read_pgn(pgn)?;
        let start = game.starting_position()?;
        start.validate_kings()?;

        let mut session = Self::starting_from(start.classified());
        for san in &game.moves {
            session.make_san_move(san)?;
        }
        Ok(session)
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    fn starting_from(position: Position) -> Self {
        Self {
            config: EngineConfig::default(),
            initial: position.clone(),
            position,
            history: Vec::new(),
            prior_positions: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn initial_position(&self) -> &Position {
        &self.initial
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    /// Apply a move under the configured promotion policy. On error the
    /// session is unchanged.
    pub fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> ChessResult<MoveOutcome> {
        let applied =
            apply_move_with_policy(&self.position, from, to, promotion, self.config.promotion)?;

        let previous = std::mem::replace(&mut self.position, applied.position);
        self.prior_positions.push(previous);
        self.history.push(applied.record);

        match self.outcome() {
            GameOutcome::Ongoing => {}
            outcome => info!(?outcome, fen = %self.position.get_fen(), "game over"),
        }

        let status = self.position.status();
        Ok(MoveOutcome {
            success: true,
            in_check: status.in_check,
            is_checkmate: status.is_checkmate,
            is_stalemate: status.is_stalemate,
        })
    }

    /// Boolean-style boundary: failures collapse into `success == false`.
    pub fn try_move(&mut self, from: Square, to: Square, promotion: Option<PieceKind>) -> MoveOutcome {
        self.make_move(from, to, promotion)
            .unwrap_or_else(|_| MoveOutcome::rejected())
    }

    /// Apply a coordinate token such as `e2e4` or `e7e8n`.
    pub fn make_token_move(&mut self, token: &str) -> ChessResult<MoveOutcome> {
        let (from, to, promotion) = decode_move_token(token)?;
        self.make_move(from, to, promotion)
    }

    pub fn make_san_move(&mut self, san: &str) -> ChessResult<MoveOutcome> {
        let mv = resolve_san(&self.position, san)?;
        self.make_move(mv.from, mv.to, mv.promotion)
    }

    /// Take back the last move, returning its record.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let previous = self.prior_positions.pop()?;
        self.position = previous;
        self.history.pop()
    }

    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        legal_destinations(&self.position, from)
    }

    pub fn outcome(&self) -> GameOutcome {
        let status = self.position.status();
        if !status.is_terminal() {
            GameOutcome::Ongoing
        } else if status.is_checkmate {
            GameOutcome::Checkmate {
                winner: self.position.side_to_move().opposite(),
            }
        } else {
            GameOutcome::Stalemate
        }
    }

    /// Export as PGN. A caller `Result` header wins over the computed one.
    pub fn to_pgn(&self, headers: &BTreeMap<String, String>) -> String {
        let mut headers = headers.clone();
        headers
            .entry("Result".to_owned())
            .or_insert_with(|| self.outcome().result_token().to_owned());
        write_pgn(&self.initial, &self.history, &headers, &self.config.pgn)
    }
}
