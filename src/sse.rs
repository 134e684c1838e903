//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! `streamGenerateContent?alt=sse` answers with a sequence of `data:` events, each holding one
//! JSON [`GenerateContentResponse`].  This module turns the raw byte stream into those chunks.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;

use crate::observability::{STREAM_BYTES, STREAM_ERRORS, STREAM_EVENTS};
use crate::{Error, GenerateContentResponse, Result};

/// Process a stream of bytes into a stream of response chunks.
///
/// Bytes are buffered until a blank line ends an event, so events and multi-byte characters may
/// be split arbitrarily across network reads.  Events without a `data:` field are skipped.
pub fn process_sse<S, E>(byte_stream: S) -> impl Stream<Item = Result<GenerateContentResponse>>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    let buffer: Vec<u8> = Vec::new();

    stream::unfold(
        (stream, buffer, false),
        move |(mut stream, mut buffer, mut done)| async move {
            loop {
                if let Some((event, consumed)) = split_event(&buffer) {
                    buffer.drain(..consumed);
                    match parse_event(&event) {
                        Some(chunk) => {
                            if chunk.is_err() {
                                STREAM_ERRORS.click();
                            } else {
                                STREAM_EVENTS.click();
                            }
                            return Some((chunk, (stream, buffer, done)));
                        }
                        None => continue,
                    }
                }

                if done {
                    return None;
                }

                match stream.next().await {
                    Some(Ok(bytes)) => {
                        STREAM_BYTES.count(bytes.len() as u64);
                        buffer.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => {
                        STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer, done)));
                    }
                    None => {
                        // Flush a final event that was not followed by a blank line.
                        done = true;
                        if buffer.iter().any(|b| !b.is_ascii_whitespace()) {
                            buffer.extend_from_slice(b"\n\n");
                        } else {
                            return None;
                        }
                    }
                }
            }
        },
    )
}

/// Find the first complete event in `buffer`.
///
/// Returns the event's text and the number of bytes it occupied, including the terminating
/// blank line.
fn split_event(buffer: &[u8]) -> Option<(Vec<u8>, usize)> {
    let mut i = 0;
    while i < buffer.len() {
        if buffer[i] == b'\n' {
            let rest = &buffer[i + 1..];
            if rest.starts_with(b"\n") {
                return Some((buffer[..i].to_vec(), i + 2));
            }
            if rest.starts_with(b"\r\n") {
                return Some((buffer[..i].to_vec(), i + 3));
            }
        }
        i += 1;
    }
    None
}

/// Parse one event; `None` means the event carried no data and should be skipped.
fn parse_event(event: &[u8]) -> Option<Result<GenerateContentResponse>> {
    let text = match std::str::from_utf8(event) {
        Ok(text) => text,
        Err(e) => return Some(Err(e.into())),
    };

    let mut data: Option<String> = None;
    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some(value) = line.strip_prefix("data:") else {
            // `event:`, `id:`, `retry:` and `:` comments carry nothing we use.
            continue;
        };
        let value = value.strip_prefix(' ').unwrap_or(value);
        match data.as_mut() {
            Some(data) => {
                data.push('\n');
                data.push_str(value);
            }
            None => data = Some(value.to_string()),
        }
    }

    let data = data?;
    if data.trim().is_empty() {
        return None;
    }
    Some(parse_chunk(&data))
}

fn parse_chunk(data: &str) -> Result<GenerateContentResponse> {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        code: Option<u16>,
        message: Option<String>,
        status: Option<String>,
    }

    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(data) {
        let detail = envelope.error;
        return Err(Error::api(
            detail.code.unwrap_or(500),
            detail.status.or_else(|| Some("stream_error".to_string())),
            detail.message.unwrap_or_else(|| data.to_string()),
            None,
        ));
    }

    serde_json::from_str::<GenerateContentResponse>(data).map_err(|e| {
        Error::serialization(
            format!("Failed to parse stream chunk: {e}"),
            Some(Box::new(e)),
        )
    })
}
