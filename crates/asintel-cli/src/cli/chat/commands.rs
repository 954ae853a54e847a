//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and drive batch ingestion and session
//! controls that don't make sense as free-form chat.

use std::path::PathBuf;

use console::style;

use asintel_types::retrieval::RequestedField;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Load a CSV file of ASINs.
    Load(PathBuf),
    /// Paste a block of ASINs, terminated by an empty line.
    Paste,
    /// Run a retrieval for the current batch with the default fields.
    Get,
    /// List the retrievable fields.
    Fields,
    /// Show conversation history for this session.
    History,
    /// Exit the chat session.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts.get(1).map(|s| s.trim().to_string());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/load" => match arg.filter(|a| !a.is_empty()) {
            Some(path) => Some(ChatCommand::Load(PathBuf::from(path))),
            None => Some(ChatCommand::Unknown(
                "/load requires a file path".to_string(),
            )),
        },
        "/paste" => Some(ChatCommand::Paste),
        "/get" | "/fetch" => Some(ChatCommand::Get),
        "/fields" => Some(ChatCommand::Fields),
        "/history" => Some(ChatCommand::History),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!(
        "  {}    {}",
        style("/load <path>").cyan(),
        "Load a CSV file of ASINs"
    );
    println!(
        "  {}         {}",
        style("/paste").cyan(),
        "Paste ASINs, finish with an empty line"
    );
    println!(
        "  {}           {}",
        style("/get").cyan(),
        "Look up the current batch with the default fields"
    );
    println!(
        "  {}        {}",
        style("/fields").cyan(),
        "List the retrievable fields"
    );
    println!(
        "  {}       {}",
        style("/history").cyan(),
        "Show conversation history"
    );
    println!(
        "  {}         {}",
        style("/clear").cyan(),
        "Clear the screen"
    );
    println!(
        "  {}          {}",
        style("/exit").cyan(),
        "End the chat session"
    );
    println!();
    println!(
        "  {}",
        style("Or just ask, e.g. \"price and rating for these\"").dim()
    );
    println!();
}

/// Print the retrievable fields with their aliases spelled out.
pub fn print_fields() {
    println!();
    println!("  {}", style("Retrievable fields:").bold());
    println!();
    for field in RequestedField::ALL {
        println!("  {:<14} {}", style(field.to_string()).cyan(), field.label());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_load() {
        assert_eq!(
            parse("/load data/asins.csv"),
            Some(ChatCommand::Load(PathBuf::from("data/asins.csv")))
        );
        assert_eq!(
            parse("/load"),
            Some(ChatCommand::Unknown("/load requires a file path".to_string()))
        );
    }

    #[test]
    fn test_parse_get_aliases() {
        assert_eq!(parse("/get"), Some(ChatCommand::Get));
        assert_eq!(parse("/fetch"), Some(ChatCommand::Get));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("price and rating please"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo"), Some(ChatCommand::Unknown("/foo".to_string())));
    }
}
