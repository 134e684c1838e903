use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::Attachment;

/// Raw bytes sent inline with a request, tagged with their MIME type.
///
/// The bytes are base64-encoded on the wire and forwarded verbatim; nothing here inspects or
/// transcodes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// The IANA media type of the data, e.g. `image/png`.
    #[serde(alias = "mime_type")]
    pub mime_type: String,

    /// The raw bytes.
    #[serde(with = "crate::utils::base64")]
    pub data: Bytes,
}

impl Blob {
    /// Create a new blob.
    pub fn new(mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// A single piece of a [`Content`](crate::types::Content).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },

    /// A file passed by value.
    InlineData {
        /// The file's type and bytes.
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: Blob,
    },

    /// A part kind this crate does not interpret (function calls, code execution, ...).
    Other(serde_json::Value),
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Create an inline data part.
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Part::InlineData {
            inline_data: Blob::new(mime_type, data),
        }
    }

    /// Returns the text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Returns the blob of an inline data part.
    pub fn as_inline_data(&self) -> Option<&Blob> {
        match self {
            Part::InlineData { inline_data } => Some(inline_data),
            _ => None,
        }
    }
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Part::text(text)
    }
}

impl From<String> for Part {
    fn from(text: String) -> Self {
        Part::Text { text }
    }
}

impl From<Attachment> for Part {
    fn from(attachment: Attachment) -> Self {
        Part::inline_data(attachment.mime_type, attachment.bytes)
    }
}
