use crate::cli::Args;
use crate::commands::{ChatState, dispatcher::CommandDispatcher};
use crate::config::{Config, ProviderKind};
use crate::core::catalog::{Category, ModelCatalog};
use crate::core::connectors::ConnectorRegistry;
use crate::core::dispatch::{DispatchController, DispatchSettings};
use crate::core::error::ChatError;
use crate::core::session::Turn;
use crate::core::ui_state::UiState;
use crate::core::usage::UsageCounters;
use crate::display;
use crate::input::{self, ChatCompleter, InputEvent};
use crate::providers::factory::ProviderFactory;
use is_terminal::IsTerminal;
use std::io::{self, Read};
use std::sync::Arc;

pub struct Application {
    pub args: Args,
    pub config: Config,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(
        args: Args,
        config: Config,
        command_dispatcher: CommandDispatcher,
    ) -> Result<Self, ChatError> {
        let config = merge_config_with_args(config, &args)?;
        Ok(Self {
            args,
            config,
            command_dispatcher,
        })
    }

    /// Builds the controller and the initial UI snapshot from configuration
    pub fn build_state(&self) -> Result<ChatState, ChatError> {
        let catalog = Arc::new(ModelCatalog::builtin());

        let mut connectors = ConnectorRegistry::builtin();
        for (id, &active) in &self.config.connectors {
            if let Err(e) = connectors.set_active(id, active) {
                tracing::warn!(error = %e, "ignoring connector override");
            }
        }

        let usage = UsageCounters::with_seed(&self.config.usage_seed);
        let provider =
            ProviderFactory::new().create(&self.config.provider, &self.config, catalog.clone())?;
        let controller = DispatchController::new(
            catalog,
            connectors,
            usage,
            provider,
            DispatchSettings::from(&self.config),
        );

        let selected = self
            .args
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model.clone());
        if !controller.catalog().contains(&selected) {
            tracing::warn!(model = %selected, "selected model is not in the catalog");
        }

        Ok(ChatState::new(
            controller,
            UiState::new(&selected, self.config.dark_mode),
        ))
    }

    pub async fn run(&self) -> Result<(), ChatError> {
        let mut state = self.build_state()?;

        let piped = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ChatError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        if piped.is_none() && self.args.query.is_none() {
            return self.handle_interactive_mode(&mut state).await;
        }

        let mut lines: Vec<String> = piped
            .map(|buffer| buffer.lines().map(str::to_string).collect())
            .unwrap_or_default();
        if let Some(query) = &self.args.query {
            lines.push(query.clone());
        }
        self.handle_batch_mode(&mut state, lines).await
    }

    fn show_turn(state: &ChatState, turn: &Turn) {
        display::display_turn(
            turn,
            state.controller.display_name(&turn.model_id),
            state.ui.dark_mode,
        );
    }

    /// Runs a slash command or dispatches a message. Returns `false` once the
    /// session should end.
    fn handle_line(&self, state: &mut ChatState, line: &str) -> bool {
        if let Some(result) = self.command_dispatcher.execute_line(line, state) {
            match result {
                Ok(Some(output)) => println!("{}", output),
                Ok(None) => {}
                Err(e) => display::display_warning(&e.to_string()),
            }
            return state.should_continue;
        }

        match state.controller.send_message(line, &state.ui.selected_model) {
            Ok(id) => {
                let model = state.controller.display_name(&state.ui.selected_model);
                display::display_notice(&format!("#{} sent to {}", id, model));
            }
            Err(ChatError::Validation(_)) => {}
            Err(e) if e.is_recoverable() => display::display_notice(&e.to_string()),
            Err(e) => display::display_warning(&e.to_string()),
        }
        true
    }

    async fn handle_interactive_mode(&self, state: &mut ChatState) -> Result<(), ChatError> {
        let completer = ChatCompleter::new(
            self.command_dispatcher.clone(),
            Category::ALL
                .iter()
                .flat_map(|&c| state.controller.catalog().list_by_category(c))
                .map(|m| m.id.clone())
                .collect(),
            state
                .controller
                .connectors()
                .list()
                .iter()
                .map(|c| c.id.clone())
                .collect(),
        );
        let mut input = input::spawn_input_thread(completer);

        println!(
            "Chatting with {} via the {} provider. Type '/help' for commands, Ctrl+D or /quit to exit.",
            state.controller.display_name(&state.ui.selected_model),
            state.controller.provider_name()
        );

        loop {
            tokio::select! {
                event = input.recv() => {
                    let line = match event {
                        Some(InputEvent::Line(line)) => line,
                        Some(InputEvent::Eof) | None => break,
                    };
                    if !self.handle_line(state, &line) {
                        break;
                    }
                }
                Some(turn) = state.controller.next_completion() => {
                    Self::show_turn(state, &turn);
                }
            }
        }

        let outstanding = state.controller.in_flight();
        if !outstanding.is_empty() {
            tracing::info!(count = outstanding.len(), "leaving with requests in flight");
        }
        println!("Exiting...");
        Ok(())
    }

    async fn handle_batch_mode(
        &self,
        state: &mut ChatState,
        lines: Vec<String>,
    ) -> Result<(), ChatError> {
        if lines.iter().all(|l| l.trim().is_empty()) {
            return Err(ChatError::Input("No query provided".to_string()));
        }

        for line in &lines {
            if let Some(result) = self.command_dispatcher.execute_line(line, state) {
                if let Some(output) = result? {
                    if !self.args.json {
                        println!("{}", output);
                    }
                }
                if !state.should_continue {
                    break;
                }
                continue;
            }
            match state.controller.send_message(line, &state.ui.selected_model) {
                Ok(_) | Err(ChatError::Validation(_)) => {}
                Err(e) => return Err(e),
            }
        }

        while let Some(turn) = state.controller.next_completion().await {
            if !self.args.json {
                Self::show_turn(state, &turn);
            }
        }

        if self.args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(state.controller.session().snapshot())?
            );
        }
        Ok(())
    }
}

/// Command-line flags win over values from the config file
fn merge_config_with_args(mut config: Config, args: &Args) -> Result<Config, ChatError> {
    if let Some(name) = &args.provider {
        config.provider = ProviderKind::from_str(name)
            .ok_or_else(|| ChatError::Config(format!("Unsupported provider: {}", name)))?;
    }
    if let Some(timeout) = args.timeout {
        config.response_timeout_secs = timeout;
    }
    Ok(config)
}
