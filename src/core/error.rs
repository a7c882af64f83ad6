use std::io;
use std::time::Duration;
use thiserror::Error;

/// Unified error type for dispatching prompts and running the front end
#[derive(Error, Debug)]
pub enum AskError {
    /// Missing or invalid credential, unknown provider, unreadable settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-2xx reply or a success body that does not have the expected shape
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// Network failure before a response was received
    #[error("Network error: {0}")]
    Transport(String),

    /// Caller-side timeout expired while waiting for the reply
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification used to decide how a failure is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Provider,
    Transport,
}

impl AskError {
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        AskError::Provider {
            status,
            message: single_line(&message.into()),
        }
    }

    pub fn malformed_response(status: u16) -> Self {
        AskError::provider(status, "malformed response")
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AskError::Configuration(_)
            | AskError::Io { .. }
            | AskError::Serialization(_)
            | AskError::Input(_) => ErrorKind::Configuration,
            AskError::Provider { .. } => ErrorKind::Provider,
            AskError::Transport(_) | AskError::Timeout(_) => ErrorKind::Transport,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// Single-line text meant for the person at the keyboard.
    pub fn user_message(&self) -> String {
        let text = match self {
            AskError::Configuration(msg) => {
                format!("{}. Please check your settings file.", msg)
            }
            AskError::Provider { message, .. } => message.clone(),
            AskError::Transport(_) | AskError::Timeout(_) => {
                format!("{} - please try again", self)
            }
            AskError::Input(msg) => msg.clone(),
            other => other.to_string(),
        };
        single_line(&text)
    }
}

/// Collapses every run of whitespace (newlines included) into one space.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl From<reqwest::Error> for AskError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AskError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            AskError::Transport(format!("Connection failed: {}", err))
        } else {
            AskError::Transport(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for AskError {
    fn from(err: serde_json::Error) -> Self {
        AskError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for AskError {
    fn from(err: serde_yml::Error) -> Self {
        AskError::Serialization(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_variant() {
        assert_eq!(
            AskError::Configuration("missing api key".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(AskError::provider(429, "slow down").kind(), ErrorKind::Provider);
        assert_eq!(AskError::Transport("offline".into()).kind(), ErrorKind::Transport);
        assert_eq!(
            AskError::Timeout(Duration::from_secs(30)).kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn only_transport_failures_are_retryable() {
        assert!(AskError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(AskError::Transport("reset".into()).is_retryable());
        assert!(!AskError::provider(500, "boom").is_retryable());
        assert!(!AskError::Configuration("unknown provider: x".into()).is_retryable());
    }

    #[test]
    fn provider_messages_are_collapsed_to_one_line() {
        let err = AskError::provider(400, "bad\nrequest:\n\n  missing field");
        assert_eq!(err.user_message(), "bad request: missing field");
    }

    #[test]
    fn user_messages_carry_a_directive() {
        let timeout = AskError::Timeout(Duration::from_secs(30)).user_message();
        assert_eq!(timeout, "Request timed out after 30s - please try again");

        let config = AskError::Configuration("missing api key".into()).user_message();
        assert!(config.starts_with("missing api key."));
        assert!(config.contains("settings"));
    }
}
