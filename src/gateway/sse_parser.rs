//! Server-Sent Events (SSE) decoder for Anthropic streaming responses.
//!
//! The Messages API sends `event:` / `data:` line pairs. Every `data:`
//! payload carries its own `type` field, so only the data lines are decoded;
//! `event:` lines, comments and `ping` payloads are skipped.

use bytes::Bytes;
use futures_util::Stream;
use serde::Deserialize;
use std::fmt::Display;

use super::GatewayError;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: Delta },
    MessageStop,
    Error { error: ErrorBody },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// What a single SSE line means for the reply.
#[derive(Debug, PartialEq, Eq)]
enum SseItem {
    Text(String),
    Stop,
    Error { kind: String, message: String },
}

/// Converts a raw SSE byte stream into a stream of reply text fragments.
///
/// Bytes are buffered until a full line is available, so chunk boundaries
/// that split a line or a multi-byte character are harmless. The stream ends
/// at `message_stop` or when the connection closes, and ends right after the
/// first error it yields.
pub fn sse_to_text_stream<S, E>(byte_stream: S) -> impl Stream<Item = Result<String, GatewayError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(GatewayError::Stream(e.to_string()));
                    return;
                }
            };

            buffer.extend_from_slice(&chunk);

            while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=line_end).collect();
                let line = String::from_utf8_lossy(&line);

                match parse_sse_line(line.trim()) {
                    Some(SseItem::Text(text)) => yield Ok(text),
                    Some(SseItem::Stop) => return,
                    Some(SseItem::Error { kind, message }) => {
                        yield Err(GatewayError::Api { kind, message });
                        return;
                    }
                    None => {}
                }
            }
        }

        // Connection closed without a trailing newline.
        let rest = String::from_utf8_lossy(&buffer);
        match parse_sse_line(rest.trim()) {
            Some(SseItem::Text(text)) => yield Ok(text),
            Some(SseItem::Error { kind, message }) => {
                yield Err(GatewayError::Api { kind, message });
            }
            Some(SseItem::Stop) | None => {}
        }
    }
}

/// Parses a single trimmed SSE line.
///
/// Returns `None` for `event:` lines, comments, blank lines, non-text deltas
/// and payloads that fail to parse.
fn parse_sse_line(line: &str) -> Option<SseItem> {
    let json_str = line.strip_prefix("data:")?.trim_start();

    match serde_json::from_str::<StreamEvent>(json_str).ok()? {
        StreamEvent::ContentBlockDelta {
            delta: Delta::TextDelta { text },
        } if !text.is_empty() => Some(SseItem::Text(text)),
        StreamEvent::MessageStop => Some(SseItem::Stop),
        StreamEvent::Error { error } => Some(SseItem::Error {
            kind: error.kind,
            message: error.message,
        }),
        _ => None,
    }
}
