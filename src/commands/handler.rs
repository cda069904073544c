use super::ChatState;
use crate::core::error::ChatError;
use crate::core::ui_state::UiAction;
use crate::display;

use console::style;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ModelCommand;
pub struct ModelsCommand;
pub struct ConnectorsCommand;
pub struct ToggleCommand;
pub struct UsageCommand;
pub struct HistoryCommand;
pub struct PendingCommand;
pub struct CancelCommand;
pub struct ThemeCommand;
pub struct SettingsCommand;

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = [
            title.to_string(),
            QuitCommand.help().to_string(),
            HelpCommand.help().to_string(),
            ModelCommand.help().to_string(),
            ModelsCommand.help().to_string(),
            ConnectorsCommand.help().to_string(),
            ToggleCommand.help().to_string(),
            UsageCommand.help().to_string(),
            HistoryCommand.help().to_string(),
            PendingCommand.help().to_string(),
            CancelCommand.help().to_string(),
            ThemeCommand.help().to_string(),
            SettingsCommand.help().to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let current = &state.ui.selected_model;
        let Some(&new_model) = args.first() else {
            return Ok(Some(format!(
                "Current model: {} ({})",
                state.controller.display_name(current),
                current
            )));
        };

        if !state.controller.catalog().contains(new_model) {
            return Ok(Some(format!(
                "Unknown model: {}. Use /models to list available models.",
                new_model
            )));
        }
        state.update_ui(UiAction::SelectModel(new_model.to_string()));
        tracing::info!(model = new_model, "model selected");
        Ok(Some(format!(
            "Model changed to: {}",
            state.controller.display_name(new_model)
        )))
    }

    fn help(&self) -> &'static str {
        "/model <id> - Show or change the current model"
    }
}

impl CommandHandler for ModelsCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.update_ui(UiAction::ToggleModelPicker);
        if !state.ui.model_picker_open {
            return Ok(Some("Model picker closed.".to_string()));
        }
        Ok(Some(display::format_models(
            state.controller.catalog(),
            &state.ui.selected_model,
        )))
    }

    fn help(&self) -> &'static str {
        "/models - Open or close the model picker"
    }
}

impl CommandHandler for ConnectorsCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        Ok(Some(display::format_connectors(state.controller.connectors())))
    }

    fn help(&self) -> &'static str {
        "/connectors - List connectors and whether they are active"
    }
}

impl CommandHandler for ToggleCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        if args.is_empty() {
            return Ok(Some("Please specify a connector id".to_string()));
        }

        let mut lines = Vec::new();
        for &id in args {
            match state.controller.toggle_connector(id) {
                Ok(true) => lines.push(format!("Connector {} enabled", id)),
                Ok(false) => lines.push(format!("Connector {} disabled", id)),
                Err(e @ ChatError::UnknownConnector(_)) => {
                    tracing::debug!(connector = id, "toggle ignored");
                    lines.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/toggle <id>... - Turn connectors on or off"
    }
}

impl CommandHandler for UsageCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        Ok(Some(display::format_usage(
            &state.controller.usage().snapshot(),
        )))
    }

    fn help(&self) -> &'static str {
        "/usage - Show per-capability request counts"
    }
}

impl CommandHandler for HistoryCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.update_ui(UiAction::ToggleHistory);
        if state.ui.history_open {
            Ok(Some(display::format_transcript(&state.controller)))
        } else {
            Ok(Some("History panel closed.".to_string()))
        }
    }

    fn help(&self) -> &'static str {
        "/history - Show or hide the session transcript"
    }
}

impl CommandHandler for PendingCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        let in_flight = state.controller.in_flight();
        if in_flight.is_empty() {
            return Ok(Some("No requests in flight.".to_string()));
        }
        let ids: Vec<String> = in_flight.iter().map(|id| format!("#{}", id)).collect();
        Ok(Some(format!("Awaiting replies to: {}", ids.join(", "))))
    }

    fn help(&self) -> &'static str {
        "/pending - List requests still awaiting a reply"
    }
}

impl CommandHandler for CancelCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let target = match args.first() {
            Some(raw) => raw.trim_start_matches('#').parse::<u64>().map_err(|_| {
                ChatError::Input(format!("Not a request id: {}", raw))
            })?,
            // without an id, cancel the most recent request
            None => match state.controller.in_flight().last() {
                Some(&id) => id,
                None => return Ok(Some("No requests in flight.".to_string())),
            },
        };

        state.controller.cancel(target)?;
        Ok(Some(format!("Cancelled request #{}", target)))
    }

    fn help(&self) -> &'static str {
        "/cancel [id] - Stop waiting for a reply (latest request by default)"
    }
}

impl CommandHandler for ThemeCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.update_ui(UiAction::ToggleDarkMode);
        let mode = if state.ui.dark_mode { "dark" } else { "light" };
        Ok(Some(format!("Switched to {} mode", mode)))
    }

    fn help(&self) -> &'static str {
        "/theme - Switch between dark and light mode"
    }
}

impl CommandHandler for SettingsCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.update_ui(UiAction::ToggleSettings);
        if !state.ui.settings_open {
            return Ok(Some("Settings panel closed.".to_string()));
        }

        let settings = state.controller.settings();
        let timeout = settings
            .response_timeout
            .map(|d| format!("{}s", d.as_secs()))
            .unwrap_or_else(|| "none".to_string());
        Ok(Some(
            [
                style("Settings").bold().underlined().to_string(),
                format!(" provider       {}", state.controller.provider_name()),
                format!(" default model  {}", settings.default_model),
                format!(" search policy  {:?}", settings.search_policy),
                format!(" timeout        {}", timeout),
                format!(
                    " theme          {}",
                    if state.ui.dark_mode { "dark" } else { "light" }
                ),
            ]
            .join("\n"),
        ))
    }

    fn help(&self) -> &'static str {
        "/settings - Show or hide the current settings"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ChatState;
    use crate::core::catalog::ModelCatalog;
    use crate::core::connectors::ConnectorRegistry;
    use crate::core::dispatch::{DispatchController, DispatchSettings, RequestState};
    use crate::core::ui_state::UiState;
    use crate::core::usage::UsageCounters;
    use crate::providers::manual::ManualProvider;
    use std::sync::Arc;

    fn state() -> ChatState {
        let controller = DispatchController::new(
            Arc::new(ModelCatalog::builtin()),
            ConnectorRegistry::builtin(),
            UsageCounters::new(),
            Arc::new(ManualProvider::new()),
            DispatchSettings::default(),
        );
        ChatState::new(controller, UiState::new("claude-4-sonnet", true))
    }

    fn plain(output: Option<String>) -> String {
        console::strip_ansi_codes(&output.unwrap_or_default()).into_owned()
    }

    #[test]
    fn model_selects_only_known_ids() {
        let mut state = state();
        let out = plain(ModelCommand.execute(&mut state, &["gpt-4-vision"]).unwrap());
        assert_eq!(out, "Model changed to: GPT-4 Vision");
        assert_eq!(state.ui.selected_model, "gpt-4-vision");

        let out = plain(ModelCommand.execute(&mut state, &["made-up"]).unwrap());
        assert!(out.starts_with("Unknown model"));
        assert_eq!(state.ui.selected_model, "gpt-4-vision");

        let out = plain(ModelCommand.execute(&mut state, &[]).unwrap());
        assert_eq!(out, "Current model: GPT-4 Vision (gpt-4-vision)");
    }

    #[test]
    fn picking_a_model_closes_the_picker() {
        let mut state = state();
        let out = plain(ModelsCommand.execute(&mut state, &[]).unwrap());
        assert!(out.contains("Claude 4 Sonnet"));
        assert!(state.ui.model_picker_open);

        ModelCommand.execute(&mut state, &["claude-4-vision"]).unwrap();
        assert!(!state.ui.model_picker_open);
    }

    #[test]
    fn toggle_reports_unknown_connector_without_failing() {
        let mut state = state();
        let out = plain(ToggleCommand.execute(&mut state, &["web", "telepathy"]).unwrap());
        assert!(out.contains("Connector web disabled"));
        assert!(out.contains("Unknown connector: telepathy"));
        assert!(!state.controller.connectors().is_active("web"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut state = state();
        assert!(QuitCommand.execute(&mut state, &[]).unwrap().is_none());
        assert!(!state.should_continue);
    }

    #[test]
    fn theme_and_history_flip_ui_snapshot() {
        let mut state = state();
        let out = plain(ThemeCommand.execute(&mut state, &[]).unwrap());
        assert_eq!(out, "Switched to light mode");
        assert!(!state.ui.dark_mode);

        let out = plain(HistoryCommand.execute(&mut state, &[]).unwrap());
        assert_eq!(out, "No messages yet.");
        assert!(state.ui.history_open);
        let out = plain(HistoryCommand.execute(&mut state, &[]).unwrap());
        assert_eq!(out, "History panel closed.");
    }

    #[test]
    fn help_lists_every_command() {
        let mut state = state();
        let out = plain(HelpCommand.execute(&mut state, &[]).unwrap());
        for name in ["/quit", "/model", "/toggle", "/usage", "/cancel", "/settings"] {
            assert!(out.contains(name), "missing {}", name);
        }
    }

    #[tokio::test]
    async fn cancel_defaults_to_latest_request() {
        let mut state = state();
        let first = state.controller.send_message("a", "claude-4-sonnet").unwrap();
        let second = state.controller.send_message("b", "claude-4-sonnet").unwrap();

        let out = plain(PendingCommand.execute(&mut state, &[]).unwrap());
        assert_eq!(out, format!("Awaiting replies to: #{}, #{}", first, second));

        let out = plain(CancelCommand.execute(&mut state, &[]).unwrap());
        assert_eq!(out, format!("Cancelled request #{}", second));
        assert_eq!(
            state.controller.request_state(second),
            Some(RequestState::Cancelled)
        );

        let id = format!("#{}", first);
        CancelCommand.execute(&mut state, &[id.as_str()]).unwrap();
        assert!(state.controller.in_flight().is_empty());

        assert!(matches!(
            CancelCommand.execute(&mut state, &["abc"]),
            Err(ChatError::Input(_))
        ));
    }
}
