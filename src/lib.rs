//! Crate root module declarations for the chess rules engine.
//!
//! Exposes the position model, move legality and application, termination
//! detection, notation codecs (FEN, SAN, PGN), the puzzle matcher, and the
//! caller-owned game session.

pub mod config;
pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod move_record;
    pub mod position;
}

pub mod moves {
    pub mod leaper_attacks;
    pub mod slider_attacks;
}

pub mod move_generation {
    pub mod attack_checks;
    pub mod legal_moves;
    pub mod move_apply;
    pub mod move_validator;
    pub mod termination;
}

pub mod session {
    pub mod game_session;
}

pub mod tactics {
    pub mod puzzle;
    pub mod puzzle_set;
}

pub mod cli {
    pub mod command_loop;
}

pub mod utils {
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod render_game_state;
    pub mod san;
}
