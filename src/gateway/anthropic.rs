use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::sse_parser::sse_to_text_stream;
use super::{ChatRequest, FragmentStream, GatewayError, ModelGateway};
use crate::transcript::Message;

/// Default Anthropic API root.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const API_VERSION: &str = "2023-06-01";
const MODELS_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: &'a [Message],
    stream: bool,
}

impl<'a> MessagesRequest<'a> {
    const fn new(request: &ChatRequest<'a>, stream: bool) -> Self {
        Self {
            model: request.model,
            max_tokens: request.max_tokens,
            system: request.system,
            messages: request.messages,
            stream,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

impl MessagesResponse {
    /// Concatenates the text blocks, skipping tool and thinking blocks.
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ModelsPage {
    data: Vec<ModelInfo>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    last_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    id: String,
}

/// Client for the Anthropic Messages and Models endpoints.
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Points the client at another API root (proxies, local gateways).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
    }

    async fn send(&self, url: String, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|source| GatewayError::Connect { url, source })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        Ok(response)
    }

    async fn post_messages(
        &self,
        request: &ChatRequest<'_>,
        stream: bool,
    ) -> Result<Response, GatewayError> {
        let url = self.url("/v1/messages");
        tracing::debug!(
            model = request.model,
            messages = request.messages.len(),
            stream,
            "sending messages request"
        );

        let body = MessagesRequest::new(request, stream);
        let http_request = self.client.post(&url).json(&body);
        self.send(url, http_request).await
    }
}

impl ModelGateway for AnthropicClient {
    async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, GatewayError> {
        let response = self.post_messages(request, false).await?;

        let message: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(message.into_text())
    }

    async fn stream(&self, request: &ChatRequest<'_>) -> Result<FragmentStream, GatewayError> {
        let response = self.post_messages(request, true).await?;
        Ok(Box::pin(sse_to_text_stream(response.bytes_stream())))
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let mut models = Vec::new();
        let mut after_id: Option<String> = None;

        loop {
            let mut url = format!("{}?limit={MODELS_PAGE_LIMIT}", self.url("/v1/models"));
            if let Some(id) = after_id.take() {
                url.push_str("&after_id=");
                url.push_str(&id);
            }

            let http_request = self.client.get(&url);
            let page: ModelsPage = self
                .send(url, http_request)
                .await?
                .json()
                .await
                .map_err(|e| GatewayError::Decode(e.to_string()))?;

            tracing::debug!(count = page.data.len(), has_more = page.has_more, "fetched model page");
            models.extend(page.data.into_iter().map(|m| m.id));

            match page.last_id {
                Some(last_id) if page.has_more => after_id = Some(last_id),
                _ => break,
            }
        }

        Ok(models)
    }
}
