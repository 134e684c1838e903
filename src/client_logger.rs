//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log all API interactions passing through the [`Gemini`](crate::Gemini) client.

use crate::{Error, GenerateContentRequest, GenerateContentResponse, Model};

/// A trait for logging Gemini client operations.
///
/// # Example
///
/// ```rust,ignore
/// use geminius::{ClientLogger, GenerateContentRequest, GenerateContentResponse, Model};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "{model}: {}", serde_json::to_string(request).unwrap()).unwrap();
///     }
///
///     fn log_stream_chunk(&self, chunk: &GenerateContentResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "chunk: {}", serde_json::to_string(chunk).unwrap()).unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    ///
    /// Inline data is included, so implementations that write requests somewhere durable should
    /// consider the size (and sensitivity) of uploaded files.
    fn log_request(&self, model: &Model, request: &GenerateContentRequest);

    /// Log one decoded chunk of a streamed response.
    fn log_stream_chunk(&self, chunk: &GenerateContentResponse);

    /// Log a failed request or a stream that ended in an error.
    fn log_error(&self, error: &Error) {
        let _ = error;
    }
}
