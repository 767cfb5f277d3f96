//! Parsing of typed commands from the interactive client.

use holdem_engine::player::PlayerAction;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    Action(PlayerAction),
    /// Show the table again.
    Show,
    Quit,
    Invalid(String),
}

/// Parses one line of input (case-insensitive).
///
/// - `f` / `fold`
/// - `c` / `k` / `call` / `check`
/// - `r N` / `raise N` / `bet N`: raise the street bet to N
/// - `a` / `allin` / `all-in`
/// - `s` / `show`, `q` / `quit`
///
/// ```rust
/// use holdem_table::input::{parse_player_action, ParseResult};
/// use holdem_engine::player::PlayerAction;
///
/// assert_eq!(parse_player_action("raise 120"), ParseResult::Action(PlayerAction::Raise(120)));
/// assert_eq!(parse_player_action("Q"), ParseResult::Quit);
/// ```
pub fn parse_player_action(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(&command) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    match command {
        "q" | "quit" => ParseResult::Quit,
        "s" | "show" => ParseResult::Show,
        "f" | "fold" => ParseResult::Action(PlayerAction::Fold),
        "c" | "k" | "call" | "check" => ParseResult::Action(PlayerAction::Call),
        // the engine caps a raise at the stack
        "a" | "allin" | "all-in" => ParseResult::Action(PlayerAction::Raise(u32::MAX)),
        "r" | "raise" | "bet" => match parts.get(1).map(|s| s.parse::<u32>()) {
            None => ParseResult::Invalid(format!("'{command}' needs an amount (e.g. 'raise 120')")),
            Some(Ok(amount)) if amount > 0 => ParseResult::Action(PlayerAction::Raise(amount)),
            Some(Ok(_)) => ParseResult::Invalid("Raise amount must be positive".to_string()),
            Some(Err(_)) => ParseResult::Invalid(format!("Invalid amount: {}", parts[1])),
        },
        other => ParseResult::Invalid(format!("Unrecognized command: {other}")),
    }
}
