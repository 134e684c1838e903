//! The seam between the chat core and a model service.
//!
//! [`ChatSession`](crate::chat::ChatSession) only talks to a [`ModelClient`].  The production
//! implementation is [`Gemini`](crate::Gemini); tests drive the session with scripted clients.

use std::pin::Pin;

use futures::Stream;

use crate::error::Result;
use crate::types::{Content, GenerationConfig, Model, Part};

/// A lazy, finite, single-use sequence of response text fragments.
///
/// An `Err` item may appear at any point.  Fragments yielded before it remain valid.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Per-request settings a conversation is started with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSettings {
    /// The model to ask.
    pub model: Model,

    /// Optional system instruction sent with every request.
    pub system_instruction: Option<String>,

    /// Sampling controls.
    pub generation_config: GenerationConfig,
}

impl ChatSettings {
    /// Create settings for the given model with no system instruction or sampling overrides.
    pub fn new(model: Model) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }
}

/// A conversation seeded with prior history, ready to take the next user turn.
#[async_trait::async_trait]
pub trait ConversationHandle: Send {
    /// Send the next user turn and return its streamed reply.
    ///
    /// The handle is consumed: a reply stream cannot be restarted, and a new turn starts a new
    /// conversation from the updated history.
    async fn send(self, parts: Vec<Part>) -> Result<FragmentStream>;
}

/// A configured client for a model service.
pub trait ModelClient: Send + Sync {
    /// The handle type returned by [`ModelClient::start_conversation`].
    type Conversation: ConversationHandle;

    /// Start a conversation with the given history.
    ///
    /// History is expressed in API roles: the caller maps assistant messages to
    /// [`ContentRole::Model`](crate::types::ContentRole::Model).
    fn start_conversation(&self, settings: &ChatSettings, history: Vec<Content>)
    -> Self::Conversation;
}
