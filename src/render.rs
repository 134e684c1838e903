//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the chat core can stream replies
//! without knowing where they are shown.  The default implementation writes to the terminal with
//! optional ANSI styling.

use std::io::{self, Stdout, Write};

use crate::types::{Message, Role};

/// ANSI escape code for bold text (used for speaker labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for informational notices).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the assistant label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for warnings).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for green text (used for confirmations and the user label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Called before the first fragment of an assistant reply.
    fn start_response(&mut self);

    /// Print a fragment of the reply being streamed.
    ///
    /// This is called incrementally, as soon as each fragment arrives.
    fn print_text(&mut self, text: &str);

    /// Called when a reply is complete.
    fn finish_response(&mut self);

    /// Print a whole message, e.g. when replaying history.
    fn print_message(&mut self, message: &Message);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print a warning that did not change any state.
    fn print_warning(&mut self, warning: &str);

    /// Print a confirmation.
    fn print_success(&mut self, message: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    in_response: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            in_response: false,
        }
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn label(&self, role: Role) -> String {
        let (name, color) = match role {
            Role::User => ("You", ANSI_GREEN),
            Role::Assistant => ("Gemini", ANSI_CYAN),
        };
        if self.use_color {
            format!("{ANSI_BOLD}{color}{name}:{ANSI_RESET}")
        } else {
            format!("{name}:")
        }
    }

    fn styled(&self, color: &str, text: &str) -> String {
        if self.use_color {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    /// Ends a reply left open by an error or notice.
    fn close_response(&mut self) {
        if self.in_response {
            println!();
            self.in_response = false;
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn start_response(&mut self) {
        self.close_response();
        println!("{}", self.label(Role::Assistant));
        self.in_response = true;
        self.flush();
    }

    fn print_text(&mut self, text: &str) {
        print!("{text}");
        self.flush();
    }

    fn finish_response(&mut self) {
        self.close_response();
        println!();
        self.flush();
    }

    fn print_message(&mut self, message: &Message) {
        self.close_response();
        println!("{}", self.label(message.role));
        println!("{}\n", message.content);
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.close_response();
        eprintln!("{}", self.styled(ANSI_RED, &format!("Error: {error}")));
    }

    fn print_warning(&mut self, warning: &str) {
        self.close_response();
        eprintln!("{}", self.styled(ANSI_YELLOW, &format!("Warning: {warning}")));
    }

    fn print_success(&mut self, message: &str) {
        self.close_response();
        println!("{}", self.styled(ANSI_GREEN, message));
    }

    fn print_info(&mut self, info: &str) {
        self.close_response();
        println!("{}", self.styled(ANSI_DIM, info));
    }
}
