//! Operator console input.
//!
//! Lines starting with `/` are console commands; anything else, blank
//! lines included, is chat text for the interpreter.

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `/scenario <id>`
    Scenario(String),
    /// `/health`
    Health,
    /// `/history`
    History,
    /// `/quit` or `/exit`
    Quit,
    /// Text for the command interpreter. Empty for a blank line.
    Chat(String),
    /// A `/` command that could not be understood, with a usage hint.
    Invalid(String),
}

/// Usage shown for bad console commands.
pub const CONSOLE_USAGE: &str =
    "console commands: /scenario <id>, /health, /history, /quit; anything else is sent as a command";

pub fn parse_line(line: &str) -> ConsoleCommand {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return ConsoleCommand::Chat(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match (name.to_ascii_lowercase().as_str(), arg) {
        ("scenario", "") => ConsoleCommand::Invalid("usage: /scenario <id>".to_string()),
        ("scenario", id) => ConsoleCommand::Scenario(id.to_string()),
        ("health", _) => ConsoleCommand::Health,
        ("history", _) => ConsoleCommand::History,
        ("quit" | "exit", _) => ConsoleCommand::Quit,
        (other, _) => ConsoleCommand::Invalid(format!("unknown command /{other}; {CONSOLE_USAGE}")),
    }
}
