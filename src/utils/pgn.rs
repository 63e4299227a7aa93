//! PGN read/write for game import and export.
//!
//! Reading is purely textual: headers plus the ordered SAN tokens. Turning
//! the tokens back into positions is the session's job (`GameSession::from_pgn`).

use std::collections::BTreeMap;

use tracing::warn;

use crate::config::PgnDefaults;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::Color;
use crate::game_state::move_record::MoveRecord;
use crate::game_state::position::Position;

/// Header keys written first, in this order.
pub const SEVEN_TAG_ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

/// Custom-start headers, written right after the roster in this order.
const SETUP_TAGS: [&str; 2] = ["SetUp", "FEN"];

const MAX_LINE_WIDTH: usize = 79;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnGame {
    pub headers: BTreeMap<String, String>,
    /// SAN tokens in play order, annotations removed.
    pub moves: Vec<String>,
    pub result: String,
}

impl PgnGame {
    /// The position the movetext starts from: the `FEN` header when
    /// present, otherwise the standard setup.
    pub fn starting_position(&self) -> ChessResult<Position> {
        match self.headers.get("FEN") {
            Some(fen) => Position::from_fen(fen),
            None if self.headers.get("SetUp").map(String::as_str) == Some("1") => Err(
                ChessError::InvalidPgn("SetUp is 1 but the FEN header is missing".to_owned()),
            ),
            None => Ok(Position::new_game()),
        }
    }
}

/// Serialize a game. `moves` must be the history played from `initial`.
///
/// Roster headers take caller values first, then `defaults`; `Date` falls
/// back to today. `SetUp` and `FEN` come next, then the remaining caller
/// headers in key order.
pub fn write_pgn(
    initial: &Position,
    moves: &[MoveRecord],
    headers: &BTreeMap<String, String>,
    defaults: &PgnDefaults,
) -> String {
    let mut merged = headers.clone();
    let mut fallback = |key: &str, value: String| {
        merged.entry(key.to_owned()).or_insert(value);
    };
    fallback("Event", defaults.event.clone());
    fallback("Site", defaults.site.clone());
    fallback("Date", chrono::Local::now().format("%Y.%m.%d").to_string());
    fallback("Round", defaults.round.clone());
    fallback("White", defaults.white.clone());
    fallback("Black", defaults.black.clone());
    fallback("Result", "*".to_owned());

    let initial_fen = initial.get_fen();
    if initial_fen != STARTING_POSITION_FEN {
        fallback("SetUp", "1".to_owned());
        fallback("FEN", initial_fen);
    }

    let mut out = String::new();
    let roster = SEVEN_TAG_ROSTER.iter().map(|key| (*key, &merged[*key]));
    let setup = SETUP_TAGS
        .iter()
        .filter_map(|key| merged.get(*key).map(|value| (*key, value)));
    let rest = merged
        .iter()
        .filter(|(key, _)| {
            !SEVEN_TAG_ROSTER.contains(&key.as_str()) && !SETUP_TAGS.contains(&key.as_str())
        })
        .map(|(key, value)| (key.as_str(), value));
    for (key, value) in roster.chain(setup).chain(rest) {
        out.push_str(&format!("[{key} \"{}\"]\n", escape_pgn_value(value)));
    }
    out.push('\n');

    let result = normalize_result(&merged["Result"]);
    let units = movetext_units(initial, moves, result);
    out.push_str(&wrap_movetext(&units));
    out.push('\n');

    out
}

/// Number-prefixed movetext units, e.g. `1. e4`, `e5`, `2. Nf3`, then the result.
fn movetext_units(initial: &Position, moves: &[MoveRecord], result: &str) -> Vec<String> {
    let mut units = Vec::with_capacity(moves.len() + 1);
    let mut move_number = initial.fullmove_number();
    let mut side = initial.side_to_move();

    for (ply, record) in moves.iter().enumerate() {
        match side {
            Color::White => units.push(format!("{move_number}. {}", record.san)),
            Color::Black if ply == 0 => units.push(format!("{move_number}... {}", record.san)),
            Color::Black => units.push(record.san.clone()),
        }
        if side == Color::Black {
            move_number = move_number.saturating_add(1);
        }
        side = side.opposite();
    }

    units.push(result.to_owned());
    units
}

fn wrap_movetext(units: &[String]) -> String {
    let mut out = String::new();
    let mut line_len = 0usize;

    for unit in units {
        if line_len > 0 && line_len + 1 + unit.len() > MAX_LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(unit);
        line_len += unit.len();
    }

    out
}

pub fn read_pgn(pgn: &str) -> ChessResult<PgnGame> {
    let mut headers = BTreeMap::<String, String>::new();
    let mut movetext_lines = Vec::<&str>::new();

    for line in pgn.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        if trimmed.starts_with('[') {
            let (key, value) = parse_header_line(trimmed)?;
            headers.insert(key, value);
        } else {
            movetext_lines.push(trimmed);
        }
    }

    // Line breaks survive until comments are gone; they end `;` comments.
    let movetext = strip_pgn_comments_and_variations(&movetext_lines.join("\n"));

    let mut moves = Vec::<String>::new();
    let mut movetext_result = None;
    for token in movetext.split_whitespace() {
        if movetext_result.is_some() {
            warn!(token = %token, "ignoring movetext after the game result");
            continue;
        }
        if is_result_token(token) {
            movetext_result = Some(token.to_owned());
            continue;
        }

        let token = strip_move_number(token);
        if token.is_empty() || token.starts_with('$') {
            continue;
        }

        let cleaned = token.trim_end_matches(|c: char| matches!(c, '!' | '?'));
        if cleaned.is_empty() {
            warn!(token = %token, "skipping annotation-only token");
            continue;
        }
        moves.push(cleaned.to_owned());
    }

    if headers.is_empty() && moves.is_empty() && movetext_result.is_none() {
        return Err(ChessError::InvalidPgn("no headers or movetext".to_owned()));
    }

    let result = match (headers.get("Result"), movetext_result) {
        (Some(header), Some(movetext)) if normalize_result(header) != movetext => {
            warn!(header = %header, movetext = %movetext, "result header disagrees with movetext");
            normalize_result(header).to_owned()
        }
        (Some(header), _) => normalize_result(header).to_owned(),
        (None, Some(movetext)) => movetext,
        (None, None) => "*".to_owned(),
    };

    Ok(PgnGame {
        headers,
        moves,
        result,
    })
}

fn parse_header_line(line: &str) -> ChessResult<(String, String)> {
    let invalid = || ChessError::InvalidPgn(format!("malformed header line: {line}"));

    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(invalid)?;
    let (key, value_raw) = inner.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid());
    }

    let value_raw = value_raw.trim();
    let quoted = value_raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(invalid)?;

    Ok((key.to_owned(), unescape_pgn_value(quoted)))
}

fn strip_pgn_comments_and_variations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;
    let mut line_comment = false;

    for ch in text.chars() {
        if line_comment {
            if ch == '\n' {
                line_comment = false;
                out.push(ch);
            }
            continue;
        }
        match ch {
            // Inside braces `;` is plain comment text.
            ';' if brace_depth == 0 => line_comment = true,
            '{' => brace_depth = brace_depth.saturating_add(1),
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '(' if brace_depth == 0 => paren_depth = paren_depth.saturating_add(1),
            ')' if brace_depth == 0 => paren_depth = paren_depth.saturating_sub(1),
            _ if brace_depth == 0 && paren_depth == 0 => out.push(ch),
            _ => {}
        }
        // Keep tokens on either side of a removed block apart.
        if matches!(ch, '}' | ')') && brace_depth == 0 && paren_depth == 0 {
            out.push(' ');
        }
    }

    out
}

/// `12.`, `12...` and glued forms such as `1.e4` lose their number prefix.
fn strip_move_number(token: &str) -> &str {
    let rest = token.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() < token.len() && rest.starts_with('.') {
        rest.trim_start_matches('.')
    } else {
        token
    }
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape_pgn_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{read_pgn, write_pgn, SEVEN_TAG_ROSTER};
    use std::collections::BTreeMap;

    use crate::config::PgnDefaults;
    use crate::errors::ChessError;
    use crate::game_state::move_record::MoveRecord;
    use crate::game_state::position::Position;
    use crate::move_generation::move_apply::apply_move;
    use crate::utils::long_algebraic::decode_move_token;

    fn play(initial: &Position, tokens: &[&str]) -> Vec<MoveRecord> {
        let mut position = initial.clone();
        let mut history = Vec::new();
        for token in tokens {
            let (from, to, promotion) = decode_move_token(token).expect("token should decode");
            let applied = apply_move(&position, from, to, promotion).expect("move should apply");
            position = applied.position;
            history.push(applied.record);
        }
        history
    }

    #[test]
    fn writes_roster_in_order_with_defaults() {
        let initial = Position::new_game();
        let history = play(&initial, &["f2f3", "e7e5", "g2g4", "d8h4"]);

        let mut headers = BTreeMap::new();
        headers.insert("White".to_owned(), "Alice".to_owned());
        headers.insert("Result".to_owned(), "0-1".to_owned());
        headers.insert("Annotator".to_owned(), "Bob".to_owned());

        let pgn = write_pgn(&initial, &history, &headers, &PgnDefaults::default());
        let lines: Vec<&str> = pgn.lines().collect();

        let keys: Vec<&str> = lines[..7]
            .iter()
            .map(|line| line[1..].split(' ').next().expect("header key"))
            .collect();
        assert_eq!(keys, SEVEN_TAG_ROSTER);
        assert_eq!(lines[0], "[Event \"Casual Game\"]");
        assert_eq!(lines[1], "[Site \"Chess App\"]");
        assert!(lines[2].starts_with("[Date \"20"));
        assert_eq!(lines[4], "[White \"Alice\"]");
        assert_eq!(lines[5], "[Black \"Player 2\"]");
        assert_eq!(lines[7], "[Annotator \"Bob\"]");
        assert_eq!(lines[8], "");
        assert_eq!(lines[9], "1. f3 e5 2. g4 Qh4# 0-1");
        assert!(!pgn.contains("SetUp"));
    }

    #[test]
    fn custom_start_adds_setup_and_black_move_number() {
        let initial = Position::from_fen("4k3/8/8/8/8/8/4p3/K7 b - - 0 12").expect("FEN should parse");
        let history = play(&initial, &["e2e1r", "a1b2"]);

        let pgn = write_pgn(&initial, &history, &BTreeMap::new(), &PgnDefaults::default());

        let lines: Vec<&str> = pgn.lines().collect();
        assert_eq!(lines[7], "[SetUp \"1\"]");
        assert_eq!(lines[8], "[FEN \"4k3/8/8/8/8/8/4p3/K7 b - - 0 12\"]");
        assert!(pgn.contains("12... e1=R+ 13. Kb2 *"));
    }

    #[test]
    fn reads_back_written_game() {
        let initial = Position::new_game();
        let history = play(&initial, &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"]);
        let pgn = write_pgn(&initial, &history, &BTreeMap::new(), &PgnDefaults::default());

        let parsed = read_pgn(&pgn).expect("PGN should parse");
        let sans: Vec<&str> = history.iter().map(|record| record.san.as_str()).collect();

        assert_eq!(parsed.moves, sans);
        assert_eq!(parsed.result, "*");
        assert_eq!(parsed.headers["Event"], "Casual Game");
        assert_eq!(parsed.starting_position().expect("start"), initial);
    }

    #[test]
    fn long_games_wrap_before_eighty_columns() {
        let initial = Position::new_game();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        let tokens: Vec<&str> = shuffle.iter().cycle().take(40).copied().collect();
        let history = play(&initial, &tokens);

        let pgn = write_pgn(&initial, &history, &BTreeMap::new(), &PgnDefaults::default());
        let movetext: Vec<&str> = pgn.split("\n\n").nth(1).expect("movetext").lines().collect();

        assert!(movetext.len() > 1);
        assert!(movetext.iter().all(|line| line.len() < 80));
        assert_eq!(read_pgn(&pgn).expect("PGN should parse").moves.len(), 40);
    }

    #[test]
    fn strips_comments_variations_nags_and_numbers() {
        let pgn = r#"[Event "Club \"Open\""]
[Result "1-0"]

1.e4 {best by test} e5 2. Nf3 (2. f4 exf4) Nc6 $1 3.Bb5!? a6?
; a line comment
4... Nf6 1-0
"#;
        let parsed = read_pgn(pgn).expect("PGN should parse");

        assert_eq!(parsed.headers["Event"], "Club \"Open\"");
        assert_eq!(parsed.moves, ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Nf6"]);
        assert_eq!(parsed.result, "1-0");
    }

    #[test]
    fn semicolon_inside_brace_comment_is_comment_text() {
        let parsed = read_pgn("1. e4 {good; really} e5 2. Nf3 *").expect("PGN should parse");
        assert_eq!(parsed.moves, ["e4", "e5", "Nf3"]);

        let multiline = "1. e4 {a; b\nstill comment} e5 ; rest {ignored\n2. Nf3 Nc6 *";
        let parsed = read_pgn(multiline).expect("PGN should parse");
        assert_eq!(parsed.moves, ["e4", "e5", "Nf3", "Nc6"]);
        assert_eq!(parsed.result, "*");
    }

    #[test]
    fn move_numbers_past_u16_range_do_not_overflow() {
        let initial = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 65535").expect("FEN should parse");
        let history = play(&initial, &["e8d8", "e1e2"]);

        let pgn = write_pgn(&initial, &history, &BTreeMap::new(), &PgnDefaults::default());
        assert!(pgn.contains("65535... Kd8 65536. Ke2 *"));
    }

    #[test]
    fn result_falls_back_to_movetext_then_star() {
        assert_eq!(read_pgn("1. e4 e5 1/2-1/2").expect("parse").result, "1/2-1/2");
        assert_eq!(read_pgn("1. e4 e5").expect("parse").result, "*");
    }

    #[test]
    fn rejects_structurally_broken_input() {
        for pgn in ["", "   \n\n", "[Event Casual]\n1. e4", "[Event \"Casual\"\n1. e4", "[ \"x\"]"] {
            assert!(matches!(read_pgn(pgn), Err(ChessError::InvalidPgn(_))), "{pgn:?}");
        }
    }

    #[test]
    fn setup_without_fen_is_rejected() {
        let parsed = read_pgn("[SetUp \"1\"]\n\n*").expect("PGN should parse");
        assert!(matches!(parsed.starting_position(), Err(ChessError::InvalidPgn(_))));
    }
}
