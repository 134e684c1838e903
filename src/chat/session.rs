//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns conversation state and runs one
//! streamed turn at a time against a [`ModelClient`].

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};
use time::OffsetDateTime;

use crate::backend::{ChatSettings, ConversationHandle, ModelClient};
use crate::chat::intake::upload_notice;
use crate::chat::secrets::API_KEY_MISSING;
use crate::chat::state::ConversationState;
use crate::error::{Error, Result};
use crate::observability::{
    CHAT_FRAGMENTS, CHAT_TURN_DURATION, CHAT_TURNS_COMPLETED, CHAT_TURNS_FAILED,
    CHAT_TURNS_REJECTED, CHAT_UPLOADS,
};
use crate::render::Renderer;
use crate::types::{Attachment, Message, Model, Part};
use crate::Gemini;

/// The reply recorded when a turn fails.
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble connecting right now. 🥺";

/// The warning shown when a message is sent without a configured client.
pub const NOT_CONFIGURED_WARNING: &str =
    "Chatbot is not active. Please configure your Google API Key correctly.";

const TRANSCRIPT_VERSION: u8 = 1;

/// Why a submission did not start a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The message was empty or only whitespace.
    EmptyInput,
    /// No API client is configured.
    NotConfigured,
}

/// The result of [`ChatSession::submit`].
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// No turn was started and no state changed.
    Rejected(RejectReason),

    /// The reply streamed to completion and was recorded.
    Completed {
        /// The full reply.
        reply: String,
    },

    /// The service failed; the fallback reply was recorded instead of any partial text.
    Failed {
        /// What went wrong.
        error: Error,
        /// The reply recorded in history (always [`FALLBACK_REPLY`]).
        reply: String,
    },
}

impl TurnOutcome {
    /// The reply recorded in history, if a turn ran.
    pub fn reply(&self) -> Option<&str> {
        match self {
            TurnOutcome::Rejected(_) => None,
            TurnOutcome::Completed { reply } | TurnOutcome::Failed { reply, .. } => Some(reply),
        }
    }

    /// Returns true if the turn completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, TurnOutcome::Completed { .. })
    }
}

/// A chat session that manages conversation state and API interactions.
///
/// Every method takes `&mut self`, so one event (upload, send, reset) finishes before the next
/// begins.  A session without a client still accepts uploads and commands; sends are rejected.
pub struct ChatSession<C: ModelClient = Gemini> {
    client: Option<C>,
    configuration_error: Option<Error>,
    settings: ChatSettings,
    state: ConversationState,
    turns_completed: u64,
    turns_failed: u64,
}

/// A snapshot of a session's state.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: Model,
    /// Whether an API client is configured.
    pub configured: bool,
    /// The number of messages in the conversation, including the greeting.
    pub message_count: usize,
    /// The system prompt, if any.
    pub system_prompt: Option<String>,
    /// The name of the staged attachment, if any.
    pub pending_attachment: Option<String>,
    /// Turns that streamed to completion.
    pub turns_completed: u64,
    /// Turns that ended with the fallback reply.
    pub turns_failed: u64,
}

impl<C: ModelClient> ChatSession<C> {
    /// Creates a session from the outcome of configuring a client.
    ///
    /// A configuration error does not prevent the session from existing; it disables sending and
    /// is kept for [`configuration_error`](Self::configuration_error).
    pub fn new(client: Result<C>, settings: ChatSettings) -> Self {
        let (client, configuration_error) = match client {
            Ok(client) => (Some(client), None),
            Err(err) => (None, Some(err)),
        };
        Self {
            client,
            configuration_error,
            settings,
            state: ConversationState::new(),
            turns_completed: 0,
            turns_failed: 0,
        }
    }

    /// Creates a session with a configured client.
    pub fn with_client(client: C, settings: ChatSettings) -> Self {
        Self::new(Ok(client), settings)
    }

    /// Returns true if messages can be sent.
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// The error that left this session without a client.
    pub fn configuration_error(&self) -> Option<&Error> {
        self.configuration_error.as_ref()
    }

    /// The banner to keep showing while the session has no client.
    pub fn banner(&self) -> Option<String> {
        match &self.configuration_error {
            Some(Error::Configuration { message }) if message == API_KEY_MISSING => {
                Some(API_KEY_MISSING.to_string())
            }
            Some(err) => Some(format!("Failed to configure Google API: {err}")),
            None if self.client.is_none() => Some(API_KEY_MISSING.to_string()),
            None => None,
        }
    }

    /// Runs one turn: records `text`, streams the reply to `renderer`, and records the reply.
    ///
    /// Remote failures never escape: they are rendered and turned into [`TurnOutcome::Failed`],
    /// with [`FALLBACK_REPLY`] recorded as the assistant's message.  A staged attachment is sent
    /// ahead of the text and cleared whether or not the turn succeeds.
    pub async fn submit(&mut self, text: &str, renderer: &mut dyn Renderer) -> TurnOutcome {
        if text.trim().is_empty() {
            CHAT_TURNS_REJECTED.click();
            return TurnOutcome::Rejected(RejectReason::EmptyInput);
        }
        let Some(client) = self.client.as_ref() else {
            CHAT_TURNS_REJECTED.click();
            renderer.print_warning(NOT_CONFIGURED_WARNING);
            return TurnOutcome::Rejected(RejectReason::NotConfigured);
        };

        let start = Instant::now();
        self.state.append(Message::user(text));
        let history = self.state.history_before_last();
        let mut parts = Vec::with_capacity(2);
        if let Some(attachment) = self.state.take_attachment() {
            parts.push(Part::from(attachment));
        }
        parts.push(Part::text(text));

        let conversation = client.start_conversation(&self.settings, history);
        renderer.start_response();
        let outcome = match stream_reply(conversation, parts, renderer).await {
            Ok(reply) => {
                renderer.finish_response();
                self.turns_completed += 1;
                CHAT_TURNS_COMPLETED.click();
                TurnOutcome::Completed { reply }
            }
            Err(error) => {
                debug_assert!(error.is_remote_service(), "{error:?}");
                renderer.print_error(&format!(
                    "Oops! An error occurred with the Google API: {error}"
                ));
                renderer.start_response();
                renderer.print_text(FALLBACK_REPLY);
                renderer.finish_response();
                self.turns_failed += 1;
                CHAT_TURNS_FAILED.click();
                TurnOutcome::Failed {
                    error,
                    reply: FALLBACK_REPLY.to_string(),
                }
            }
        };
        if let Some(reply) = outcome.reply() {
            self.state.append(Message::assistant(reply));
        }
        CHAT_TURN_DURATION.add(start.elapsed().as_secs_f64());
        outcome
    }

    /// Stages a file for the next turn, replacing any file already staged.
    pub fn upload(&mut self, attachment: Attachment, renderer: &mut dyn Renderer) {
        let notice = upload_notice(&attachment.name);
        self.state.stage_attachment(attachment);
        CHAT_UPLOADS.click();
        renderer.print_success(&notice);
    }

    /// Starts a new conversation, discarding every message and the staged file.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// The conversation state.
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// The messages so far, oldest first.
    pub fn messages(&self) -> &[Message] {
        self.state.messages()
    }

    /// The staged attachment, if any.
    pub fn pending_attachment(&self) -> Option<&Attachment> {
        self.state.pending_attachment()
    }

    /// Renders every message.
    pub fn render_history(&self, renderer: &mut dyn Renderer) {
        for message in self.state.messages() {
            renderer.print_message(message);
        }
    }

    /// Changes the model used for responses.
    pub fn set_model(&mut self, model: Model) {
        self.settings.model = model;
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.settings.model
    }

    /// Sets or clears the system prompt.
    pub fn set_system_prompt(&mut self, prompt: Option<String>) {
        self.settings.system_instruction = prompt;
    }

    /// Returns the current system prompt, if any.
    pub fn system_prompt(&self) -> Option<&str> {
        self.settings.system_instruction.as_deref()
    }

    /// The settings each turn is started with.
    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Saves the messages to the specified path.  The staged attachment is not saved.
    pub fn save_transcript_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let transcript = TranscriptFile::new(self.state.messages());
        let file = File::create(path.as_ref())
            .map_err(|err| Error::io("failed to create transcript file", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, &transcript).map_err(|err| {
            Error::serialization("failed to serialize transcript", Some(Box::new(err)))
        })
    }

    /// Loads a transcript from disk, replacing the messages and clearing the staged attachment.
    pub fn load_transcript_from<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path.as_ref())
            .map_err(|err| Error::io("failed to open transcript file", err))?;
        let reader = BufReader::new(file);
        let transcript: TranscriptFile = from_reader(reader).map_err(|err| {
            Error::serialization("failed to parse transcript", Some(Box::new(err)))
        })?;
        if transcript.version != TRANSCRIPT_VERSION {
            return Err(Error::validation(
                format!("unsupported transcript version {}", transcript.version),
                Some("version".to_string()),
            ));
        }
        self.state.replace_messages(transcript.messages);
        Ok(())
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.settings.model.clone(),
            configured: self.is_configured(),
            message_count: self.state.len(),
            system_prompt: self.settings.system_instruction.clone(),
            pending_attachment: self.state.pending_attachment().map(|a| a.name.clone()),
            turns_completed: self.turns_completed,
            turns_failed: self.turns_failed,
        }
    }
}

/// Sends `parts` and renders fragments as they arrive, returning the concatenated reply.
async fn stream_reply<H: ConversationHandle>(
    conversation: H,
    parts: Vec<Part>,
    renderer: &mut dyn Renderer,
) -> Result<String> {
    let mut fragments = conversation.send(parts).await?;
    let mut reply = String::new();
    while let Some(fragment) = fragments.next().await {
        let fragment = fragment?;
        CHAT_FRAGMENTS.click();
        renderer.print_text(&fragment);
        reply.push_str(&fragment);
    }
    Ok(reply)
}

#[derive(Serialize, Deserialize)]
struct TranscriptFile {
    version: u8,
    #[serde(with = "crate::utils::time")]
    saved_at: OffsetDateTime,
    messages: Vec<Message>,
}

impl TranscriptFile {
    fn new(messages: &[Message]) -> Self {
        Self {
            version: TRANSCRIPT_VERSION,
            saved_at: OffsetDateTime::now_utc(),
            messages: messages.to_vec(),
        }
    }
}
