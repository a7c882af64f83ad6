use super::{
    ChatState,
    handler::{
        ClearCommand, ContextCommand, HelpCommand, HistoryCommand, QuitCommand, SelectCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::AskError;
use std::sync::Arc;

/// Routes `/name args...` lines to their handlers. Cheap to clone.
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        state: &mut ChatState,
    ) -> Result<Option<String>, AskError> {
        self.registry.execute(command, args, state)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("clear", ClearCommand);
    registry.register("context", ContextCommand);
    registry.register("history", HistoryCommand);
    registry.register("select", SelectCommand);

    CommandDispatcher::new(Arc::new(registry))
}
