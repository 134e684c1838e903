//! Command-line tool for sending a single message to Gemini.
//!
//! The reply is streamed to stdout.  A staged file can be sent along with the text, which makes
//! this handy for one-off questions about an image or document.
//!
//! # Usage
//!
//! ```bash
//! # Ask a question
//! geminius-prompt What is the capital of France?
//!
//! # Ask about a file
//! geminius-prompt --file cat.png Describe this
//!
//! # Use a different model and no colors
//! geminius-prompt --model gemini-2.5-pro --no-color Summarize the plot of Hamlet
//! ```
//!
//! The exit status is 0 if the reply completed, 1 if the model service failed, and 2 if the
//! tool could not be configured or the arguments were unusable.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use geminius::chat::{ChatConfig, ChatSession, TurnOutcome, load_api_key, read_upload};
use geminius::{Gemini, Model, PlainTextRenderer, Renderer};

/// Command-line arguments for the geminius-prompt tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
struct Args {
    /// Model to ask.
    #[arrrg(optional, "Model to use (default: gemini-2.5-flash)", "MODEL")]
    model: Option<String>,

    /// File to send ahead of the message text.
    #[arrrg(optional, "File to send with the message", "PATH")]
    file: Option<String>,

    /// Secrets file holding the API key.
    #[arrrg(optional, "Secrets file (default: .geminius/secrets.yaml)", "PATH")]
    secrets: Option<String>,

    /// Disable ANSI colors.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    no_color: bool,
}

/// Main entry point for the geminius-prompt command-line tool.
#[tokio::main]
async fn main() -> ExitCode {
    let (args, free) = Args::from_command_line_relaxed("geminius-prompt [OPTIONS] <TEXT>...");
    let text = free.join(" ");
    let mut renderer = PlainTextRenderer::with_color(!args.no_color);
    if text.trim().is_empty() {
        renderer.print_error("No message given.");
        return ExitCode::from(2);
    }

    let mut config = ChatConfig::new().with_secrets_path(args.secrets.as_ref().map(PathBuf::from));
    if let Some(model) = args.model.as_deref() {
        config = config.with_model(Model::from(model));
    }

    let client = match load_api_key(config.secrets_path.as_deref())
        .and_then(|key| Gemini::new(Some(key)))
    {
        Ok(client) => client,
        Err(err) => {
            renderer.print_error(&err.to_string());
            return ExitCode::from(2);
        }
    };
    let mut session = ChatSession::with_client(client, config.settings());

    if let Some(path) = args.file.as_deref() {
        match read_upload(Path::new(path)) {
            Ok(attachment) => session.upload(attachment, &mut renderer),
            Err(err) => {
                renderer.print_error(&err.to_string());
                return ExitCode::from(2);
            }
        }
    }

    match session.submit(&text, &mut renderer).await {
        TurnOutcome::Completed { .. } => ExitCode::SUCCESS,
        TurnOutcome::Failed { .. } => ExitCode::from(1),
        TurnOutcome::Rejected(_) => ExitCode::from(2),
    }
}
