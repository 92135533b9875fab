//! The closed set of chat commands and their parser.

/// One-line usage summary for replies.
pub const USAGE: &str =
    "Commands: /start, /auth <password>, /pending, /completed, /cancel <job_id>. Send a file to print it.";

/// Parsed chat command. Anything starting with `/` maps to exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Auth { password: String },
    Pending,
    Completed,
    Cancel { job_id: u64 },
    /// A `/`-prefixed input that matches no known command, or has malformed arguments.
    Unknown { input: String },
}

impl Command {
    /// Parses a message text. Returns None for plain (non-command) text.
    /// `/cmd@botname` is accepted for any bot name suffix.
    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }
        let mut parts = text.splitn(2, char::is_whitespace);
        let head = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or("").trim();
        let name = head.split('@').next().unwrap_or(head);

        let cmd = match name {
            "/start" => Command::Start,
            "/auth" => Command::Auth {
                password: rest.to_string(),
            },
            "/pending" => Command::Pending,
            "/completed" => Command::Completed,
            "/cancel" => match rest.parse::<u64>() {
                Ok(job_id) => Command::Cancel { job_id },
                Err(_) => Command::Unknown {
                    input: text.to_string(),
                },
            },
            _ => Command::Unknown {
                input: text.to_string(),
            },
        };
        Some(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text_is_not_a_command() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_parse_known_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/pending"), Some(Command::Pending));
        assert_eq!(Command::parse("/completed"), Some(Command::Completed));
        assert_eq!(
            Command::parse("/auth hunter2"),
            Some(Command::Auth {
                password: "hunter2".to_string()
            })
        );
        assert_eq!(
            Command::parse("/cancel 42"),
            Some(Command::Cancel { job_id: 42 })
        );
    }

    #[test]
    fn test_parse_strips_bot_name_suffix() {
        assert_eq!(Command::parse("/start@printer_bot"), Some(Command::Start));
        assert_eq!(
            Command::parse("/cancel@printer_bot 7"),
            Some(Command::Cancel { job_id: 7 })
        );
    }

    #[test]
    fn test_parse_auth_without_argument_has_empty_password() {
        assert_eq!(
            Command::parse("/auth"),
            Some(Command::Auth {
                password: String::new()
            })
        );
    }

    #[test]
    fn test_parse_malformed_cancel_is_unknown() {
        assert!(matches!(
            Command::parse("/cancel abc"),
            Some(Command::Unknown { .. })
        ));
        assert!(matches!(
            Command::parse("/cancel"),
            Some(Command::Unknown { .. })
        ));
        assert!(matches!(
            Command::parse("/cancel -1"),
            Some(Command::Unknown { .. })
        ));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(matches!(
            Command::parse("/frobnicate now"),
            Some(Command::Unknown { .. })
        ));
    }
}
