//! Interactive shell commands

use std::path::PathBuf;

/// A line typed at the buddybot prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Start the session (panel, reminders, watching)
    Start,
    /// Stop the session
    Stop,
    /// Show the active document's latest result
    Status,
    /// Dump every tracked document's result as JSON
    StatusAll,
    /// Switch the active document
    Open(PathBuf),
    Help,
    Exit,
    Empty,
    Unknown(String),
}

impl ShellCommand {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (head, rest) = match input.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (input, ""),
        };

        match (head.to_lowercase().as_str(), rest) {
            ("", _) => ShellCommand::Empty,
            ("start", "") => ShellCommand::Start,
            ("stop", "") => ShellCommand::Stop,
            ("status", "") => ShellCommand::Status,
            ("status", "all") => ShellCommand::StatusAll,
            ("open", path) if !path.is_empty() => ShellCommand::Open(PathBuf::from(path)),
            ("help" | "?", "") => ShellCommand::Help,
            ("exit" | "quit", "") => ShellCommand::Exit,
            _ => ShellCommand::Unknown(input.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(ShellCommand::parse("start"), ShellCommand::Start);
        assert_eq!(ShellCommand::parse("  STOP  "), ShellCommand::Stop);
        assert_eq!(ShellCommand::parse("status"), ShellCommand::Status);
        assert_eq!(ShellCommand::parse("status all"), ShellCommand::StatusAll);
        assert_eq!(ShellCommand::parse("help"), ShellCommand::Help);
        assert_eq!(ShellCommand::parse("quit"), ShellCommand::Exit);
        assert_eq!(ShellCommand::parse(""), ShellCommand::Empty);
    }

    #[test]
    fn test_parse_open_keeps_path() {
        assert_eq!(
            ShellCommand::parse("open src/my script.py"),
            ShellCommand::Open(PathBuf::from("src/my script.py"))
        );
        assert_eq!(
            ShellCommand::parse("open"),
            ShellCommand::Unknown("open".to_string())
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            ShellCommand::parse("dance now"),
            ShellCommand::Unknown("dance now".to_string())
        );
        assert_eq!(
            ShellCommand::parse("start please"),
            ShellCommand::Unknown("start please".to_string())
        );
    }
}
