use crate::config::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, Provider};
use crate::core::error::AskError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod anthropic;
pub mod base_client;
pub mod factory;
pub mod openai_compatible;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One role-tagged message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: Role,
    content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Sampling parameters forwarded to the provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// A chat-completion backend reached over HTTP.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    fn model(&self) -> &str;

    async fn complete(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, AskError>;
}

/// Wire form of a message; every supported provider uses the same shape.
#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

pub(crate) fn wire_messages(messages: &[ChatMessage]) -> Vec<WireMessage<'_>> {
    messages
        .iter()
        .map(|m| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_serialize_with_lowercase_roles() {
        let messages = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let json = serde_json::to_value(wire_messages(&messages)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}
            ])
        );
        assert_eq!(
            serde_json::to_value(&messages[0]).unwrap(),
            serde_json::json!({"role": "user", "content": "hi"})
        );
    }
}
