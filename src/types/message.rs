use serde::{Deserialize, Serialize};

use crate::types::{Content, Role};

/// One entry in the visible conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message.
    pub role: Role,

    /// The message text, rendered as markdown by most frontends.
    pub content: String,
}

impl Message {
    /// Create a new message.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a message authored by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a message authored by the assistant.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Convert this message into a single-part history entry for the API.
    pub fn to_content(&self) -> Content {
        Content::text(self.role.to_content_role(), self.content.clone())
    }
}

impl From<&Message> for Content {
    fn from(message: &Message) -> Self {
        message.to_content()
    }
}
