//! Parsing of interactive player input.
//!
//! Card positions are typed 1-based, matching the numbered hand listing the
//! `play` command prints, and converted to the engine's 0-based indices here.

use sabacc_engine::player::PlayerAction;

/// What a line of user input asked for.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    Action(PlayerAction),
    /// `q` or `quit`
    Quit,
    Invalid(String),
}

/// Parse one line of input (case-insensitive).
///
/// - `d` / `draw`
/// - `x N` / `exchange N`
/// - `l N` / `lock N`
/// - `s` / `stand`
/// - `q` / `quit`
///
/// ```rust
/// # use sabacc_cli::validation::{parse_player_action, ParseResult};
/// use sabacc_engine::player::PlayerAction;
///
/// assert_eq!(parse_player_action("draw"), ParseResult::Action(PlayerAction::Draw));
/// assert_eq!(parse_player_action("x 2"), ParseResult::Action(PlayerAction::Exchange(1)));
/// assert_eq!(parse_player_action("Q"), ParseResult::Quit);
/// assert!(matches!(parse_player_action("bet 5"), ParseResult::Invalid(_)));
/// ```
pub fn parse_player_action(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(&verb) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    match verb {
        "q" | "quit" => ParseResult::Quit,
        "d" | "draw" => ParseResult::Action(PlayerAction::Draw),
        "s" | "stand" => ParseResult::Action(PlayerAction::Stand),
        "x" | "exchange" => match parse_position(parts.get(1), "exchange") {
            Ok(i) => ParseResult::Action(PlayerAction::Exchange(i)),
            Err(msg) => ParseResult::Invalid(msg),
        },
        "l" | "lock" => match parse_position(parts.get(1), "lock") {
            Ok(i) => ParseResult::Action(PlayerAction::Lock(i)),
            Err(msg) => ParseResult::Invalid(msg),
        },
        other => ParseResult::Invalid(format!(
            "Unrecognized action '{}'. Valid actions: draw, exchange <n>, lock <n>, stand, q",
            other
        )),
    }
}

fn parse_position(arg: Option<&&str>, verb: &str) -> Result<usize, String> {
    let Some(raw) = arg else {
        return Err(format!("{} requires a card number (e.g., '{} 1')", verb, verb));
    };
    match raw.parse::<usize>() {
        Ok(0) => Err("Card numbers start at 1".to_string()),
        Ok(n) => Ok(n - 1),
        Err(_) => Err(format!("Invalid card number '{}'", raw)),
    }
}
