use crate::config::{Provider, SettingsStore};
use crate::core::error::AskError;
use crate::providers::factory::ProviderFactory;
use crate::providers::{ChatMessage, CompletionOptions};
use std::sync::Arc;

/// Prompt used when the caller leaves the question blank.
pub const DEFAULT_PROMPT: &str = "Explain this with examples and meaning";

const CHECK_PROMPT: &str = "Reply with the single word: ok";

/// One logical chat turn to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchRequest {
    pub prompt: String,
    pub selected_text: Option<String>,
    pub context: Vec<ChatMessage>,
}

impl DispatchRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_selected_text(mut self, selected_text: Option<String>) -> Self {
        self.selected_text = selected_text;
        self
    }

    pub fn with_context(mut self, context: Vec<ChatMessage>) -> Self {
        self.context = context;
        self
    }

    /// The content of the new user message: the prompt, plus the selection
    /// when there is one.
    pub fn full_prompt(&self) -> String {
        let prompt = match self.prompt.trim() {
            "" => DEFAULT_PROMPT,
            prompt => prompt,
        };

        match self.selected_text.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(selected) => format!("{}\n\nSelected text: \"{}\"", prompt, selected),
            None => prompt.to_string(),
        }
    }

    /// The context followed by the new user message.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.context.len() + 1);
        messages.extend(self.context.iter().cloned());
        messages.push(ChatMessage::user(self.full_prompt()));
        messages
    }
}

/// Sends chat turns to whichever provider the settings name.
pub struct Dispatcher {
    settings: Arc<dyn SettingsStore>,
    factory: ProviderFactory,
}

impl Dispatcher {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Result<Self, AskError> {
        Ok(Self::with_factory(settings, ProviderFactory::new()?))
    }

    pub fn with_factory(settings: Arc<dyn SettingsStore>, factory: ProviderFactory) -> Self {
        Self { settings, factory }
    }

    pub async fn dispatch(&self, request: &DispatchRequest) -> Result<String, AskError> {
        let settings = self.settings.load().await?;

        let api_key = settings
            .api_key()
            .ok_or_else(|| AskError::Configuration("missing api key".to_string()))?;

        let messages = request.messages();

        let provider = Provider::from_name(&settings.api_provider).ok_or_else(|| {
            AskError::Configuration(format!("unknown provider: {}", settings.api_provider))
        })?;

        let adapter = self.factory.create(provider, &settings);
        let options = CompletionOptions {
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        };

        tracing::debug!(
            provider = provider.name(),
            model = adapter.model(),
            messages = messages.len(),
            "dispatching prompt"
        );

        let reply = adapter.complete(api_key, &messages, &options).await;
        if let Err(e) = &reply {
            tracing::debug!(provider = provider.name(), error = %e, "dispatch failed");
        }
        reply
    }

    /// Sends a tiny prompt with no context to confirm the key and provider work.
    pub async fn check_connection(&self) -> Result<String, AskError> {
        self.dispatch(&DispatchRequest::new(CHECK_PROMPT)).await
    }
}
