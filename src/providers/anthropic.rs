use crate::config::Provider;
use crate::core::error::AskError;
use crate::providers::base_client::{AuthScheme, HttpClient};
use crate::providers::{ChatMessage, CompletionOptions, ProviderAdapter, WireMessage, wire_messages};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Clone)]
pub struct AnthropicProvider {
    client: HttpClient,
    model: String,
}

impl AnthropicProvider {
    pub fn new(client: reqwest::Client, base_url: String, model: String) -> Self {
        let mut extra_headers = HashMap::new();
        extra_headers.insert("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string());
        Self {
            client: HttpClient::new(
                client,
                base_url,
                AuthScheme::Header("x-api-key".to_string()),
                Some(extra_headers),
            ),
            model,
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    // Body is `{model, max_tokens, messages}`; temperature is not sent.
    async fn complete(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, AskError> {
        let payload = AnthropicRequest {
            model: &self.model,
            max_tokens: options.max_tokens,
            messages: wire_messages(messages),
        };

        let response = self.client.post("messages", api_key, &payload).await?;
        let status = response.status().as_u16();
        let parsed: AnthropicResponse = self.client.read_json(response).await?;

        parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| AskError::malformed_response(status))
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}
