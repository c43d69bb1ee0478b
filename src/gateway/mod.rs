//! Model gateway: the hosted inference API behind the chat loop.
//!
//! [`ModelGateway`] is the seam between the session and the network. The
//! production implementation is [`AnthropicClient`]; tests substitute a
//! scripted gateway.

mod anthropic;
#[cfg(test)]
pub(crate) mod fake;
mod sse_parser;

use std::pin::Pin;

use futures_util::Stream;
use thiserror::Error;

use crate::transcript::Message;

pub use anthropic::{AnthropicClient, DEFAULT_BASE_URL};

/// Lazy, forward-only sequence of reply fragments.
///
/// `None` marks the end of the reply. An `Err` item is terminal: nothing is
/// yielded after it.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, GatewayError>> + Send>>;

/// Any failure talking to the model API.
///
/// Callers do not branch on the variant; it only shapes the message.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to connect to API endpoint {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("API returned an error ({kind}): {message}")]
    Api { kind: String, message: String },

    #[error("stream error: {0}")]
    Stream(String),

    #[error("failed to parse API response: {0}")]
    Decode(String),
}

/// One chat request: fixed parameters plus the transcript snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub max_tokens: u32,
    pub messages: &'a [Message],
}

/// Capabilities the chat client needs from a model API.
///
/// The gateway never mutates the transcript; callers append turns themselves.
#[allow(async_fn_in_trait)]
pub trait ModelGateway {
    /// Waits for the whole reply and returns its text.
    async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, GatewayError>;

    /// Starts a streamed reply and returns its fragments.
    async fn stream(&self, request: &ChatRequest<'_>) -> Result<FragmentStream, GatewayError>;

    /// Lists model identifiers in the order the API returns them.
    async fn list_models(&self) -> Result<Vec<String>, GatewayError>;
}
