use super::{
    ChatState,
    handler::{
        CancelCommand, ConnectorsCommand, HelpCommand, HistoryCommand, ModelCommand,
        ModelsCommand, PendingCommand, QuitCommand, SettingsCommand, ThemeCommand, ToggleCommand,
        UsageCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::ChatError;
use std::sync::Arc;

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
    ) -> Result<Option<String>, ChatError> {
        self.registry.execute(command, args, state)
    }

    /// Splits `/name arg...` and runs it. Returns `None` when `line` is not a command.
    pub fn execute_line(
        &self,
        line: &str,
        state: &mut ChatState,
    ) -> Option<Result<Option<String>, ChatError>> {
        let rest = line.trim().strip_prefix('/')?;
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some((command, args)) = parts.split_first() else {
            return Some(Err(ChatError::Input(
                "Missing command name after '/'".to_string(),
            )));
        };
        Some(self.execute(command, args, state))
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("exit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("model", ModelCommand);
    registry.register("models", ModelsCommand);
    registry.register("connectors", ConnectorsCommand);
    registry.register("toggle", ToggleCommand);
    registry.register("usage", UsageCommand);
    registry.register("history", HistoryCommand);
    registry.register("pending", PendingCommand);
    registry.register("cancel", CancelCommand);
    registry.register("theme", ThemeCommand);
    registry.register("settings", SettingsCommand);

    CommandDispatcher::new(Arc::new(registry))
}
