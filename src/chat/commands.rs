//! Slash command parsing for the chat application.
//!
//! Commands start with `/` and control the session (uploads, resets, settings) without sending
//! anything to the API.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Stage a file for the next message.
    Upload(String),

    /// Show the staged file, if any.
    ShowAttachment,

    /// Start a new conversation.
    New,

    /// Re-render the conversation so far.
    History,

    /// Change the model.
    Model(String),

    /// Set or clear the system prompt.
    /// `None` clears the current system prompt.
    System(Option<String>),

    /// Save the transcript to a file.
    SaveTranscript(String),

    /// Load a transcript from a file.
    LoadTranscript(String),

    /// Display session status.
    Status,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use geminius::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/upload cat.png").is_some());
/// assert!(parse_command("What is in this picture?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "upload" | "file" => match argument {
            Some(path) => ChatCommand::Upload(path.to_string()),
            None => ChatCommand::Invalid("/upload requires a file path".to_string()),
        },
        "attachment" => ChatCommand::ShowAttachment,
        "new" | "reset" => ChatCommand::New,
        "history" => ChatCommand::History,
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a model name".to_string()),
        },
        "system" => ChatCommand::System(argument.map(|s| s.to_string())),
        "save" => match argument {
            Some(arg) => ChatCommand::SaveTranscript(arg.to_string()),
            None => ChatCommand::Invalid("/save requires a file path".to_string()),
        },
        "load" => match argument {
            Some(arg) => ChatCommand::LoadTranscript(arg.to_string()),
            None => ChatCommand::Invalid("/load requires a file path".to_string()),
        },
        "status" | "stats" => ChatCommand::Status,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /upload <path>         Attach a file to your next message (image, audio, video, document)
  /attachment            Show the file waiting to be sent
  /new                   Start a new conversation
  /history               Show the conversation so far
  /model <name>          Change the model (e.g., /model gemini-2.5-pro)
  /system [prompt]       Set system instruction (no argument clears it)
  /save <file>           Save the transcript (attachments are not saved)
  /load <file>           Load a transcript from disk
  /status                Show session status
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_new() {
        assert_eq!(parse_command("/new"), Some(ChatCommand::New));
        assert_eq!(parse_command("/RESET"), Some(ChatCommand::New));
    }

    #[test]
    fn parse_upload() {
        assert_eq!(
            parse_command("/upload ~/Pictures/cat photo.png"),
            Some(ChatCommand::Upload("~/Pictures/cat photo.png".to_string()))
        );
        assert_eq!(
            parse_command("/upload"),
            Some(ChatCommand::Invalid(
                "/upload requires a file path".to_string()
            ))
        );
        assert_eq!(parse_command("/attachment"), Some(ChatCommand::ShowAttachment));
    }

    #[test]
    fn parse_model() {
        assert_eq!(
            parse_command("/model   gemini-2.0-flash  "),
            Some(ChatCommand::Model("gemini-2.0-flash".to_string()))
        );
        assert!(matches!(
            parse_command("/model"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
    }

    #[test]
    fn parse_system() {
        assert_eq!(
            parse_command("/system You are a helpful assistant"),
            Some(ChatCommand::System(Some(
                "You are a helpful assistant".to_string()
            )))
        );
        assert_eq!(parse_command("/system"), Some(ChatCommand::System(None)));
    }

    #[test]
    fn parse_transcript_commands() {
        assert_eq!(
            parse_command("/save session.json"),
            Some(ChatCommand::SaveTranscript("session.json".to_string()))
        );
        assert_eq!(
            parse_command("/load session.json"),
            Some(ChatCommand::LoadTranscript("session.json".to_string()))
        );
        assert!(matches!(parse_command("/load"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_command("/frobnicate"),
            Some(ChatCommand::Invalid("Unknown command: /frobnicate".to_string()))
        );
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello, Gemini!"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/upload"));
        assert!(help.contains("/new"));
        assert!(help.contains("/quit"));
    }
}
