use std::fmt;

use bytes::Bytes;

/// A file staged by the user for the next turn.
///
/// Attachments are never serialized; they live only in the pending slot until one send consumes
/// them.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// The file name as the user supplied it.
    pub name: String,

    /// The declared MIME type, forwarded verbatim.
    pub mime_type: String,

    /// The raw file contents.
    pub bytes: Bytes,
}

impl Attachment {
    /// Create a new attachment.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// The size of the attachment in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
