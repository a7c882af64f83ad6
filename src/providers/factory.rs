use crate::config::{Provider, Settings};
use crate::core::error::AskError;
use crate::providers::{
    ProviderAdapter, anthropic::AnthropicProvider, openai_compatible::OpenAICompatibleProvider,
};
use reqwest::Client;

/// Builds adapters for a [`Provider`], sharing one HTTP connection pool.
#[derive(Clone)]
pub struct ProviderFactory {
    client: Client,
}

impl ProviderFactory {
    pub fn new() -> Result<Self, AskError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn create(
        &self,
        provider: Provider,
        settings: &Settings,
    ) -> Box<dyn ProviderAdapter> {
        let config = settings.provider_config(provider);
        let base_url = config
            .base_url
            .unwrap_or_else(|| provider.default_base_url().to_string());
        let model = config
            .model
            .unwrap_or_else(|| provider.default_model().to_string());
        let client = self.client.clone();

        match provider {
            Provider::OpenAI | Provider::MistralAI => Box::new(OpenAICompatibleProvider::new(
                provider, client, base_url, model,
            )),
            Provider::Anthropic => Box::new(AnthropicProvider::new(client, base_url, model)),
        }
    }
}
