//! Line-oriented stdin front-end over a `GameSession`.
//!
//! Commands: `move <token>` (or a bare coordinate/SAN token), `fen`,
//! `board`, `moves [square]`, `undo`, `pgn`, `load <fen>`, `new`,
//! `puzzle [rating]`, `themes`, `quit`.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use rand::rngs::ThreadRng;

use crate::config::EngineConfig;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Square;
use crate::move_generation::legal_moves::legal_moves;
use crate::session::game_session::{GameOutcome, GameSession, MoveOutcome};
use crate::tactics::puzzle::{check_solution, Puzzle};
use crate::tactics::puzzle_set::PuzzleSet;
use crate::utils::long_algebraic::decode_move_token;
use crate::utils::render_game_state::render_position;

const DEFAULT_PUZZLE_RATING: u32 = 1000;

pub fn run_stdio_loop(config: EngineConfig) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut state = CommandState::new(config, PuzzleSet::builtin());

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = state.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

pub struct CommandState {
    config: EngineConfig,
    session: GameSession,
    puzzles: PuzzleSet,
    active_puzzle: Option<Puzzle>,
    rng: ThreadRng,
}

impl CommandState {
    pub fn new(config: EngineConfig, puzzles: PuzzleSet) -> Self {
        Self {
            session: GameSession::new().with_config(config.clone()),
            config,
            puzzles,
            active_puzzle: None,
            rng: rand::rng(),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Handle one input line. Returns `true` when the loop should stop.
    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();

        match cmd {
            "quit" | "exit" => return Ok(true),
            "fen" => writeln!(out, "{}", self.session.position().get_fen())?,
            "board" => writeln!(out, "{}", render_position(self.session.position()))?,
            "moves" => self.handle_moves(parts.next(), out)?,
            "undo" => match self.session.undo() {
                Some(record) => writeln!(out, "undid {}", record.san)?,
                None => writeln!(out, "nothing to undo")?,
            },
            "pgn" => write!(out, "{}", self.session.to_pgn(&BTreeMap::new()))?,
            "new" => {
                self.session = GameSession::new().with_config(self.config.clone());
                self.active_puzzle = None;
                writeln!(out, "new game")?;
            }
            "load" => {
                let fen = trimmed["load".len()..].trim();
                match GameSession::from_fen(fen) {
                    Ok(session) => {
                        self.session = session.with_config(self.config.clone());
                        self.active_puzzle = None;
                        writeln!(out, "loaded {}", self.session.position().get_fen())?;
                    }
                    Err(err) => writeln!(out, "error: {err}")?,
                }
            }
            "puzzle" => self.handle_puzzle(parts.next(), out)?,
            "themes" => writeln!(out, "{}", self.puzzles.themes().join(", "))?,
            "move" => match parts.next() {
                Some(token) => self.handle_move(token, out)?,
                None => writeln!(out, "error: move needs a token")?,
            },
            token => self.handle_move(token, out)?,
        }

        Ok(false)
    }

    fn handle_moves(&self, square: Option<&str>, out: &mut impl Write) -> io::Result<()> {
        let tokens: Vec<String> = match square.map(str::parse::<Square>) {
            None => legal_moves(self.session.position())
                .iter()
                .map(|mv| mv.token())
                .collect(),
            Some(Ok(from)) => self
                .session
                .legal_destinations(from)
                .iter()
                .map(|to| to.to_string())
                .collect(),
            Some(Err(err)) => return writeln!(out, "error: {err}"),
        };
        writeln!(out, "{}", tokens.join(" "))
    }

    fn handle_puzzle(&mut self, rating: Option<&str>, out: &mut impl Write) -> io::Result<()> {
        let rating = rating
            .and_then(|text| text.parse::<u32>().ok())
            .unwrap_or(DEFAULT_PUZZLE_RATING);
        let Some(puzzle) = self.puzzles.next_puzzle(rating, &mut self.rng).cloned() else {
            return writeln!(out, "no puzzles available");
        };

        match GameSession::from_fen(&puzzle.fen) {
            Ok(session) => {
                self.session = session.with_config(self.config.clone());
                writeln!(
                    out,
                    "puzzle {} ({}, {}): {} to move. {}",
                    puzzle.id, puzzle.theme, puzzle.rating, puzzle.side_to_move, puzzle.description
                )?;
                self.active_puzzle = Some(puzzle);
            }
            Err(err) => writeln!(out, "error: {err}")?,
        }
        Ok(())
    }

    fn handle_move(&mut self, token: &str, out: &mut impl Write) -> io::Result<()> {
        let outcome = match self.play(token) {
            Ok(outcome) => outcome,
            Err(err) => return writeln!(out, "error: {err}"),
        };
        let Some(record) = self.session.last_move() else {
            return Ok(());
        };
        writeln!(out, "{} {}", record.san, describe(outcome, self.session.outcome()))?;

        if let Some(puzzle) = self.active_puzzle.take() {
            let solved = check_solution(&puzzle, record.from, record.to, record.promotion);
            writeln!(out, "{}", if solved { "correct" } else { "incorrect" })?;
        }
        Ok(())
    }

    /// Coordinate tokens first, then SAN.
    fn play(&mut self, token: &str) -> ChessResult<MoveOutcome> {
        match decode_move_token(token) {
            Ok((from, to, promotion)) => self.session.make_move(from, to, promotion),
            Err(ChessError::InvalidMoveToken(_)) => self.session.make_san_move(token),
            Err(err) => Err(err),
        }
    }
}

fn describe(outcome: MoveOutcome, game: GameOutcome) -> String {
    match game {
        GameOutcome::Checkmate { winner } => format!("checkmate, {winner} wins"),
        GameOutcome::Stalemate => "stalemate".to_owned(),
        GameOutcome::Ongoing if outcome.in_check => "check".to_owned(),
        GameOutcome::Ongoing => "ok".to_owned(),
    }
}
