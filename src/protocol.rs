//! Line-based text protocol for driving the engine.
//!
//! The command loop follows the Go Text Protocol conventions: an optional
//! numeric id, a command and its arguments on one line, and a reply of the
//! form `=id response` or `?id error` followed by a blank line.
//!
//! Squares are written `row,col` with both components 1-based, so the White
//! queen that starts on internal `(0, 3)` is `1,4`. A move is three squares:
//! queen source, queen destination, arrow.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `clear_board` - Reset to the starting position, Black to move
//! - `play <from> <to> <arrow>` - Play a move for the side to move
//! - `genmove` - Search, play and print a move (`none` if the side to move has lost)
//! - `has_legal_move` - `true` if the side to move can still act
//! - `to_move` - `black` or `white`
//! - `showboard` - Print the board
//! - `time_ms <ms>` - Set the thinking time per move

use std::io::{self, BufRead, Write};

use fastrand::Rng;
use log::info;

use crate::board::{Cell, Color, Point};
use crate::config::SearchConfig;
use crate::constants::N;
use crate::error::{ProtocolError, Result};
use crate::mcts::{TreeNode, advance_root, initialize_root, tree_search};
use crate::movegen::{generate, has_legal_move};
use crate::position::Move;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "genmove",
    "has_legal_move",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "time_ms",
    "to_move",
    "version",
];

/// Parse a 1-based `row,col` square into an internal point.
pub fn parse_point(s: &str) -> Result<Point> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| ProtocolError::InvalidCoordinate(s.to_string()))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|_| ProtocolError::InvalidCoordinate(s.to_string()))
    };
    let (row, col) = (parse(row)?, parse(col)?);
    if row == 0 || col == 0 || row > N || col > N {
        return Err(ProtocolError::OffBoard(s.to_string()));
    }
    Ok((row - 1, col - 1))
}

/// Format an internal point as 1-based `row,col`.
pub fn format_point(pt: Point) -> String {
    format!("{},{}", pt.0 + 1, pt.1 + 1)
}

/// Parse `<from> <to> <arrow>`.
pub fn parse_move(args: &[&str]) -> Result<Move> {
    if args.len() != 3 {
        return Err(ProtocolError::ArgumentCount {
            expected: 3,
            got: args.len(),
        });
    }
    Ok(Move::new(
        parse_point(args[0])?,
        parse_point(args[1])?,
        parse_point(args[2])?,
    ))
}

pub fn format_move(mv: &Move) -> String {
    format!(
        "{} {} {}",
        format_point(mv.from),
        format_point(mv.to),
        format_point(mv.arrow)
    )
}

/// Protocol engine state.
pub struct ProtocolEngine {
    /// Search tree, kept across moves
    root: TreeNode,
    config: SearchConfig,
    rng: Rng,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default(), Rng::new())
    }
}

impl ProtocolEngine {
    pub fn new(config: SearchConfig, rng: Rng) -> Self {
        Self {
            root: initialize_root(Color::Black),
            config,
            rng,
        }
    }

    /// Side to move in the current position.
    pub fn to_move(&self) -> Color {
        self.root.color
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(stdout, "{prefix}{id_str} {message}\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, ProtocolError::MissingArgument.to_string()),
            },

            "quit" => (true, String::new()),

            "clear_board" => {
                self.root = initialize_root(Color::Black);
                (true, String::new())
            }

            "play" => match self.play(args) {
                Ok(()) => (true, String::new()),
                Err(e) => (false, e.to_string()),
            },

            "genmove" => (true, self.genmove()),

            "has_legal_move" => {
                let legal = has_legal_move(&self.root.state, self.root.color);
                (true, legal.to_string())
            }

            "to_move" => (true, self.root.color.to_string()),

            "showboard" => (true, format!("\n{}", self.root.state.board)),

            "time_ms" => match self.set_time(args) {
                Ok(()) => (true, String::new()),
                Err(e) => (false, e.to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn play(&mut self, args: &[&str]) -> Result<()> {
        let mv = parse_move(args)?;
        let color = self.root.color;
        if self.root.state.board.get(mv.from) != Cell::Queen(color) {
            return Err(ProtocolError::NotYourQueen {
                color: color.to_string(),
                square: format_point(mv.from),
            });
        }
        if !generate(&self.root.state, color).contains(&mv) {
            return Err(ProtocolError::IllegalMove(format_move(&mv)));
        }
        self.advance(&mv);
        Ok(())
    }

    fn genmove(&mut self) -> String {
        let result = tree_search(&mut self.root, &self.config, &mut self.rng);
        match result.best {
            Some(mv) => {
                info!("{} plays {}", self.root.color, format_move(&mv));
                self.advance(&mv);
                format_move(&mv)
            }
            None => "none".to_string(),
        }
    }

    fn advance(&mut self, mv: &Move) {
        let root = std::mem::take(&mut self.root);
        self.root = advance_root(root, mv);
    }

    fn set_time(&mut self, args: &[&str]) -> Result<()> {
        let arg = args.first().ok_or(ProtocolError::MissingArgument)?;
        let ms = arg
            .parse::<u64>()
            .map_err(|_| ProtocolError::InvalidTime(arg.to_string()))?;
        self.config = self.config.clone().with_time_ms(ms);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ProtocolEngine {
        ProtocolEngine::new(SearchConfig::default().with_max_iterations(20), Rng::with_seed(4))
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = ProtocolEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = ProtocolEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("1,4"), Ok((0, 3)));
        assert_eq!(parse_point("10,10"), Ok((9, 9)));
        assert!(matches!(parse_point("0,4"), Err(ProtocolError::OffBoard(_))));
        assert!(matches!(parse_point("11,1"), Err(ProtocolError::OffBoard(_))));
        assert!(matches!(parse_point("a,1"), Err(ProtocolError::InvalidCoordinate(_))));
        assert!(matches!(parse_point("14"), Err(ProtocolError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_parse_move_argument_count() {
        assert_eq!(
            parse_move(&["1,4", "5,4"]),
            Err(ProtocolError::ArgumentCount { expected: 3, got: 2 })
        );
        let mv = parse_move(&["10,4", "6,4", "6,5"]).unwrap();
        assert_eq!(mv, Move::new((9, 3), (5, 3), (5, 4)));
        assert_eq!(format_move(&mv), "10,4 6,4 6,5");
    }

    #[test]
    fn test_name_command() {
        let mut engine = engine();
        let (success, response) = engine.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "amazons-mcts");
    }

    #[test]
    fn test_known_command() {
        let mut engine = engine();
        assert_eq!(engine.execute("known_command", &["genmove"]), (true, "true".to_string()));
        assert_eq!(engine.execute("known_command", &["komi"]), (true, "false".to_string()));
        assert!(!engine.execute("known_command", &[]).0);
    }

    #[test]
    fn test_play_and_clear() {
        let mut engine = engine();
        assert_eq!(engine.to_move(), Color::Black);

        let (success, _) = engine.execute("play", &["10,4", "6,4", "6,5"]);
        assert!(success);
        assert_eq!(engine.to_move(), Color::White);
        assert_eq!(engine.root().state.board.get((5, 4)), Cell::Blocked);

        let (success, _) = engine.execute("clear_board", &[]);
        assert!(success);
        assert_eq!(engine.to_move(), Color::Black);
        assert_eq!(engine.root().state.board.get((5, 4)), Cell::Empty);
    }

    #[test]
    fn test_play_rejects_wrong_queen() {
        let mut engine = engine();
        // White queen, but Black is to move
        let (success, message) = engine.execute("play", &["1,4", "5,4", "5,5"]);
        assert!(!success);
        assert_eq!(message, "no black queen on 1,4");
        assert_eq!(engine.to_move(), Color::Black);
    }

    #[test]
    fn test_play_rejects_illegal_moves() {
        let mut engine = engine();
        let before = engine.root().state.clone();

        // Queen stays put and shoots its own square
        let (success, message) = engine.execute("play", &["10,4", "10,4", "10,4"]);
        assert!(!success);
        assert_eq!(message, "illegal move: 10,4 10,4 10,4");

        // Slides up the column over nothing, but lands on White's queen
        let (success, _) = engine.execute("play", &["10,4", "1,4", "1,7"]);
        assert!(!success);

        // Arrow path blocked by the queen on 1,7
        let (success, _) = engine.execute("play", &["10,4", "4,4", "1,7"]);
        assert!(!success);

        assert_eq!(engine.to_move(), Color::Black);
        assert_eq!(engine.root().state, before);
        assert_eq!(engine.root().state.board.queens(Color::White).len(), 4);
        assert_eq!(engine.root().state.board.queens(Color::Black).len(), 4);
    }

    #[test]
    fn test_play_keeps_mobility_consistent() {
        let mut engine = engine();
        assert!(engine.execute("play", &["10,4", "6,4", "6,5"]).0);
        assert!(engine.execute("play", &["1,7", "5,7", "5,3"]).0);
        let state = &engine.root().state;
        assert_eq!(state.mobility, crate::position::mobility_map(&state.board));
    }

    #[test]
    fn test_genmove_plays_for_side_to_move() {
        let mut engine = engine();
        let (success, response) = engine.execute("genmove", &[]);
        assert!(success);
        let args: Vec<&str> = response.split_whitespace().collect();
        let mv = parse_move(&args).unwrap();
        assert_eq!(engine.to_move(), Color::White);
        assert_eq!(engine.root().state.board.get(mv.to), Cell::Queen(Color::Black));
        assert_eq!(engine.root().state.board.get(mv.arrow), Cell::Blocked);
    }

    #[test]
    fn test_time_ms() {
        let mut engine = engine();
        assert!(engine.execute("time_ms", &["500"]).0);
        assert!(!engine.execute("time_ms", &["soon"]).0);
        assert!(!engine.execute("time_ms", &[]).0);
    }
}
