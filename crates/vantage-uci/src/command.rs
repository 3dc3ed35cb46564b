//! UCI command parsing.

use std::time::Duration;

use vantage_core::{Board, Color, Game};
use vantage_engine::TimeBudget;

use crate::error::UciError;

/// Parameters for the `go` command.
///
/// All fields are optional; a bare `go` uses defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub wtime: Option<Duration>,
    pub btime: Option<Duration>,
    pub winc: Option<Duration>,
    pub binc: Option<Duration>,
    /// Moves until next time control.
    pub movestogo: Option<u32>,
    /// Search to this depth only.
    pub depth: Option<u8>,
    /// Search for exactly this duration.
    pub movetime: Option<Duration>,
    /// Search until `stop` (no time limit).
    pub infinite: bool,
}

impl GoParams {
    /// Time budget for `side` under these parameters.
    pub fn budget(&self, side: Color) -> TimeBudget {
        TimeBudget::from_go(
            self.wtime,
            self.btime,
            self.winc,
            self.binc,
            self.movestogo,
            self.movetime,
            self.infinite,
            side,
        )
    }
}

/// Options accepted by `setoption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciOption {
    /// Transposition table size in MiB.
    Hash(usize),
    /// `true` starts every search with an empty history table.
    ClearHistory(bool),
}

/// A parsed UCI command.
#[derive(Debug)]
pub enum Command {
    Uci,
    IsReady,
    UciNewGame,
    /// `position`, with the listed moves already played.
    Position(Game),
    Go(GoParams),
    Stop,
    SetOption(UciOption),
    /// `d`: print the current position.
    Display,
    /// `perft N`: per-move node counts at depth N.
    Perft(u32),
    Quit,
    /// Unrecognized command (silently ignored per UCI convention).
    Unknown(String),
}

/// Parse a single line of UCI input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = tokens.split_first() else {
        return Ok(Command::Unknown(String::new()));
    };

    match head {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "d" => Ok(Command::Display),
        "position" => parse_position(args),
        "go" => parse_go(args),
        "setoption" => parse_setoption(args),
        "perft" => parse_perft(args),
        _ => Ok(Command::Unknown(head.to_string())),
    }
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves e2e4 d7d5 ...]`
/// - `position fen <fen-string> [moves e2e4 d7d5 ...]`
///
/// The FEN runs up to the `moves` keyword, so the four-field form works too.
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    let moves_at = tokens.iter().position(|t| *t == "moves").unwrap_or(tokens.len());
    let (setup, moves) = tokens.split_at(moves_at);

    let board = match setup.split_first() {
        Some((&"startpos", _)) => Board::starting_position(),
        Some((&"fen", fields)) => {
            let fen = fields.join(" ");
            fen.parse::<Board>()
                .map_err(|source| UciError::InvalidFen { fen: fen.clone(), source })?
        }
        _ => return Err(UciError::MalformedPosition),
    };

    let mut game = Game::new(board);
    for text in moves.iter().skip(1) {
        game.play_uci(text).map_err(|source| UciError::InvalidMove {
            uci_move: text.to_string(),
            source,
        })?;
    }

    Ok(Command::Position(game))
}

/// Parse the `go` command arguments.
///
/// Supports: wtime, btime, winc, binc, movestogo, depth, movetime,
/// infinite. Unknown tokens are silently skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();

    let mut i = 0;
    while i < tokens.len() {
        let value = tokens.get(i + 1);
        match tokens[i] {
            "wtime" => params.wtime = Some(parse_millis(value, "wtime")?),
            "btime" => params.btime = Some(parse_millis(value, "btime")?),
            "winc" => params.winc = Some(parse_millis(value, "winc")?),
            "binc" => params.binc = Some(parse_millis(value, "binc")?),
            "movestogo" => params.movestogo = Some(parse_int(value, "movestogo")?),
            "depth" => params.depth = Some(parse_int(value, "depth")?),
            "movetime" => params.movetime = Some(parse_millis(value, "movetime")?),
            "infinite" => {
                params.infinite = true;
                i += 1;
                continue;
            }
            // Unknown token -- skip per UCI convention
            _ => {
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    Ok(Command::Go(params))
}

/// Parse a millisecond value from a token.
///
/// GUIs send negative clock values when a side has flagged; those clamp to
/// zero.
fn parse_millis(token: Option<&&str>, param: &str) -> Result<Duration, UciError> {
    let ms: i64 = parse_int(token, param)?;
    Ok(Duration::from_millis(ms.max(0) as u64))
}

/// Parse an integer value from a token.
fn parse_int<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, UciError> {
    let value = token.ok_or_else(|| UciError::MissingGoValue {
        param: param.to_string(),
    })?;
    value.parse().map_err(|_| UciError::InvalidGoValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}

/// Parse `setoption name <id> [value <x>]`. Option names may contain spaces
/// and are matched case-insensitively.
fn parse_setoption(tokens: &[&str]) -> Result<Command, UciError> {
    let Some((&"name", rest)) = tokens.split_first() else {
        return Err(UciError::MalformedSetOption);
    };
    let value_at = rest.iter().position(|t| *t == "value").unwrap_or(rest.len());
    let name = rest[..value_at].join(" ");
    let value = rest.get(value_at + 1..).map(|v| v.join(" ")).unwrap_or_default();
    if name.is_empty() {
        return Err(UciError::MalformedSetOption);
    }

    let invalid = || UciError::InvalidOptionValue {
        name: name.clone(),
        value: value.clone(),
    };
    let option = match name.to_ascii_lowercase().as_str() {
        "hash" => UciOption::Hash(value.parse().map_err(|_| invalid())?),
        "clearhistory" => UciOption::ClearHistory(match value.as_str() {
            "true" => true,
            "false" => false,
            _ => return Err(invalid()),
        }),
        _ => return Err(UciError::UnknownOption { name }),
    };
    Ok(Command::SetOption(option))
}

fn parse_perft(tokens: &[&str]) -> Result<Command, UciError> {
    let value = tokens.first().copied().unwrap_or_default();
    value
        .parse()
        .map(Command::Perft)
        .map_err(|_| UciError::InvalidPerftDepth { value: value.to_string() })
}
