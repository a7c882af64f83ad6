use crate::config::Provider;
use crate::core::error::AskError;
use crate::providers::base_client::{AuthScheme, HttpClient};
use crate::providers::{ChatMessage, CompletionOptions, ProviderAdapter, WireMessage, wire_messages};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<MessageContent>,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

/// Adapter for chat-completion APIs: OpenAI and Mistral.
#[derive(Clone)]
pub struct OpenAICompatibleProvider {
    provider: Provider,
    client: HttpClient,
    model: String,
}

impl OpenAICompatibleProvider {
    pub fn new(provider: Provider, client: reqwest::Client, base_url: String, model: String) -> Self {
        Self {
            provider,
            client: HttpClient::new(client, base_url, AuthScheme::Bearer, None),
            model,
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAICompatibleProvider {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, AskError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: wire_messages(messages),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self.client.post("chat/completions", api_key, &payload).await?;
        let status = response.status().as_u16();
        let parsed: ChatCompletionResponse = self.client.read_json(response).await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| AskError::malformed_response(status))
    }
}
