//! Ask a hosted LLM about a piece of text.
//!
//! [`dispatcher::Dispatcher`] turns one prompt (plus optional selected text
//! and prior messages) into a single request to OpenAI, Anthropic or Mistral
//! and normalizes the reply. [`session::ChatSession`] keeps the bounded
//! [`context::ConversationContext`] of a multi-turn chat and applies the
//! caller-side timeout.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod core;
pub mod dispatcher;
pub mod display;
pub mod input;
pub mod providers;
pub mod session;

pub use config::{FileSettingsStore, MemorySettingsStore, Provider, Settings, SettingsStore};
pub use context::{ConversationContext, MAX_CONTEXT_MESSAGES};
pub use crate::core::error::{AskError, ErrorKind};
pub use dispatcher::{DEFAULT_PROMPT, DispatchRequest, Dispatcher};
pub use providers::{ChatMessage, Role};
pub use session::ChatSession;
