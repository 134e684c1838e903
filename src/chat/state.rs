//! Conversation state for one chat session.

use crate::types::{Attachment, Content, Message};

/// The greeting a brand-new session opens with.
pub const GREETING: &str =
    "Hi! I'm an AI assistant powered by Google Gemini. How can I help you today?";

/// The greeting a session shows after the user starts a new conversation.
pub const NEW_CONVERSATION_GREETING: &str =
    "New conversation started! Go ahead and type your message.";

/// The ordered messages of a conversation plus the single pending-attachment slot.
///
/// The message list is never empty: it starts with a greeting and [`reset`](Self::reset)
/// replaces it with another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    messages: Vec<Message>,
    pending: Option<Attachment>,
}

impl ConversationState {
    /// Creates a state holding only the opening greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
            pending: None,
        }
    }

    /// Discards every message and the pending attachment, leaving only the new-conversation
    /// greeting.
    pub fn reset(&mut self) {
        self.messages = vec![Message::assistant(NEW_CONVERSATION_GREETING)];
        self.pending = None;
    }

    /// Appends a message.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replaces the whole message list, e.g. from a saved transcript.
    ///
    /// An empty list is replaced by the opening greeting, and the pending attachment is cleared.
    pub fn replace_messages(&mut self, messages: Vec<Message>) {
        self.messages = if messages.is_empty() {
            vec![Message::assistant(GREETING)]
        } else {
            messages
        };
        self.pending = None;
    }

    /// The messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false; present for API symmetry with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Stages an attachment for the next turn, returning the one it replaced.
    pub fn stage_attachment(&mut self, attachment: Attachment) -> Option<Attachment> {
        self.pending.replace(attachment)
    }

    /// The attachment staged for the next turn, if any.
    pub fn pending_attachment(&self) -> Option<&Attachment> {
        self.pending.as_ref()
    }

    /// Removes and returns the staged attachment.
    pub fn take_attachment(&mut self) -> Option<Attachment> {
        self.pending.take()
    }

    /// History for the API: every message except the last, with roles mapped to API roles.
    pub fn history_before_last(&self) -> Vec<Content> {
        let end = self.messages.len().saturating_sub(1);
        self.messages[..end].iter().map(Content::from).collect()
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentRole, Role};

    #[test]
    fn new_state_has_greeting() {
        let state = ConversationState::new();
        assert_eq!(state.messages(), &[Message::assistant(GREETING)]);
        assert!(state.pending_attachment().is_none());
    }

    #[test]
    fn reset_always_yields_one_greeting() {
        let mut state = ConversationState::new();
        state.append(Message::user("Hello"));
        state.append(Message::assistant("Hi there!"));
        state.stage_attachment(Attachment::new("a.png", "image/png", vec![1u8]));

        state.reset();

        assert_eq!(state.len(), 1);
        assert_eq!(state.messages()[0].role, Role::Assistant);
        assert_eq!(state.messages()[0].content, NEW_CONVERSATION_GREETING);
        assert!(state.pending_attachment().is_none());

        state.reset();
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn last_upload_wins() {
        let mut state = ConversationState::new();
        let first = Attachment::new("first.txt", "text/plain", &b"one"[..]);
        let second = Attachment::new("second.txt", "text/plain", &b"two"[..]);

        assert!(state.stage_attachment(first.clone()).is_none());
        assert_eq!(state.stage_attachment(second.clone()), Some(first));
        assert_eq!(state.pending_attachment(), Some(&second));

        assert_eq!(state.take_attachment(), Some(second));
        assert!(state.take_attachment().is_none());
    }

    #[test]
    fn history_excludes_last_and_maps_roles() {
        let mut state = ConversationState::new();
        state.append(Message::user("Hello"));

        let history = state.history_before_last();

        assert_eq!(history, vec![Content::text(ContentRole::Model, GREETING)]);
    }

    #[test]
    fn replace_with_empty_restores_greeting() {
        let mut state = ConversationState::new();
        state.stage_attachment(Attachment::new("a.png", "image/png", vec![1u8]));
        state.replace_messages(Vec::new());
        assert_eq!(state.messages(), &[Message::assistant(GREETING)]);
        assert!(state.pending_attachment().is_none());
    }
}
