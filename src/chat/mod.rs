//! Chat application module for interactive conversations with Gemini.
//!
//! This module provides the conversation core and the terminal pieces built on it:
//!
//! - Streaming replies rendered fragment by fragment
//! - One staged file per turn, sent ahead of the message text
//! - Slash commands for session control
//! - Configuration from the command line and a secrets file
//!
//! # Architecture
//!
//! - [`state`]: the message history and the pending attachment
//! - [`session`]: the turn orchestrator that talks to a [`ModelClient`](crate::ModelClient)
//! - [`intake`]: file validation and reading
//! - [`secrets`]: API key loading
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: slash command parsing
//! - [`interrupt`]: signal handling around turns

pub mod commands;
pub mod config;
pub mod intake;
pub mod interrupt;
pub mod secrets;
pub mod session;
pub mod state;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, parse_temperature};
pub use intake::{ALLOWED_EXTENSIONS, read_upload, upload_notice};
pub use interrupt::{INTERRUPTED_EXIT_CODE, SignalAction, TurnFlag};
pub use secrets::{API_KEY_MISSING, DEFAULT_SECRETS_PATH, Secrets, load_api_key};
pub use session::{
    ChatSession, FALLBACK_REPLY, NOT_CONFIGURED_WARNING, RejectReason, SessionStats, TurnOutcome,
};
pub use state::{ConversationState, GREETING, NEW_CONVERSATION_GREETING};
