use crate::context::ConversationContext;
use crate::core::error::AskError;
use crate::dispatcher::{DispatchRequest, Dispatcher};
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A completed turn as the user typed it.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub prompt: String,
    pub selected_text: Option<String>,
    pub reply: String,
    pub timestamp: DateTime<Local>,
}

/// Owns the state of one conversation and applies the caller-side timeout.
pub struct ChatSession {
    dispatcher: Arc<Dispatcher>,
    context: ConversationContext,
    history: Vec<Exchange>,
    selection: Option<String>,
    timeout: Duration,
}

impl ChatSession {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            context: ConversationContext::new(),
            history: Vec::new(),
            selection: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends one prompt with the current context.
    ///
    /// When `selected_text` is `None` the pending selection, if any, is used.
    /// It is consumed only when a reply arrives in time, which is also the only
    /// case in which the turn is recorded.
    pub async fn send(
        &mut self,
        prompt: &str,
        selected_text: Option<String>,
    ) -> Result<String, AskError> {
        let selected_text = selected_text.or_else(|| self.selection.clone());
        let request = DispatchRequest::new(prompt)
            .with_selected_text(selected_text)
            .with_context(self.context.messages().to_vec());

        let reply = match tokio::time::timeout(self.timeout, self.dispatcher.dispatch(&request)).await
        {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "dispatch timed out");
                return Err(AskError::Timeout(self.timeout));
            }
        };

        self.context.append_turn(request.full_prompt(), reply.clone());
        self.selection = None;
        self.history.push(Exchange {
            prompt: request.prompt,
            selected_text: request.selected_text,
            reply: reply.clone(),
            timestamp: Local::now(),
        });

        Ok(reply)
    }

    /// Sets the text the next prompt refers to.
    pub fn select(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.selection = if text.trim().is_empty() { None } else { Some(text) };
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Forgets the conversation so far. Exchange history is kept.
    pub fn clear(&mut self) {
        self.context.clear();
        self.selection = None;
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
