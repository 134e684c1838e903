use std::fmt;

use serde::{Deserialize, Serialize};

/// Who authored a message in the conversation, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the chat.
    User,

    /// The model's replies, including greetings and fallback apologies.
    Assistant,
}

/// Who authored a piece of content, as the Gemini API names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    /// Content supplied by the user.
    User,

    /// Content generated by the model.
    Model,
}

impl Role {
    /// The role the API expects for a message authored by this role.
    pub fn to_content_role(self) -> ContentRole {
        match self {
            Role::User => ContentRole::User,
            Role::Assistant => ContentRole::Model,
        }
    }
}

impl ContentRole {
    /// The role to display for content the API attributes to this role.
    pub fn to_role(self) -> Role {
        match self {
            ContentRole::User => Role::User,
            ContentRole::Model => Role::Assistant,
        }
    }
}

impl From<Role> for ContentRole {
    fn from(role: Role) -> Self {
        role.to_content_role()
    }
}

impl From<ContentRole> for Role {
    fn from(role: ContentRole) -> Self {
        role.to_role()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl fmt::Display for ContentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentRole::User => write!(f, "user"),
            ContentRole::Model => write!(f, "model"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_maps_to_model() {
        assert_eq!(Role::Assistant.to_content_role(), ContentRole::Model);
        assert_eq!(Role::User.to_content_role(), ContentRole::User);
    }

    #[test]
    fn mapping_round_trips() {
        for role in [Role::User, Role::Assistant] {
            assert_eq!(role.to_content_role().to_role(), role);
        }
        for role in [ContentRole::User, ContentRole::Model] {
            assert_eq!(role.to_role().to_content_role(), role);
        }
    }

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&ContentRole::Model).unwrap(), r#""model""#);
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
        let role: ContentRole = serde_json::from_str(r#""user""#).unwrap();
        assert_eq!(role, ContentRole::User);
    }
}
