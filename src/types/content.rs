use serde::{Deserialize, Serialize};

use crate::types::{ContentRole, Part};

/// A role-tagged list of parts: one turn of history, or one candidate's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// The author.  Omitted for system instructions and sometimes in streamed chunks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ContentRole>,

    /// The ordered parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create content with the given role and parts.
    pub fn new(role: ContentRole, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role),
            parts,
        }
    }

    /// Create single-part text content.
    pub fn text(role: ContentRole, text: impl Into<String>) -> Self {
        Self::new(role, vec![Part::text(text)])
    }

    /// Create role-less content, as used for system instructions.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenate the text of every text part.
    pub fn joined_text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }

    /// Returns true if any part carries text.
    pub fn has_text(&self) -> bool {
        self.parts.iter().any(|part| part.as_text().is_some())
    }
}
