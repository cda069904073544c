/// Presentation state as an immutable snapshot.
///
/// The front end never mutates a `UiState` in place; it applies a
/// [`UiAction`] and swaps in the returned snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub selected_model: String,
    pub dark_mode: bool,
    pub history_open: bool,
    pub settings_open: bool,
    pub model_picker_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    SelectModel(String),
    ToggleDarkMode,
    ToggleHistory,
    ToggleSettings,
    ToggleModelPicker,
    ClosePanels,
}

impl UiState {
    pub fn new(selected_model: &str, dark_mode: bool) -> Self {
        Self {
            selected_model: selected_model.to_string(),
            dark_mode,
            history_open: false,
            settings_open: false,
            model_picker_open: false,
        }
    }

    pub fn apply(&self, action: UiAction) -> UiState {
        let mut next = self.clone();
        match action {
            UiAction::SelectModel(model_id) => {
                next.selected_model = model_id;
                next.model_picker_open = false;
            }
            UiAction::ToggleDarkMode => next.dark_mode = !self.dark_mode,
            UiAction::ToggleHistory => next.history_open = !self.history_open,
            UiAction::ToggleSettings => next.settings_open = !self.settings_open,
            UiAction::ToggleModelPicker => next.model_picker_open = !self.model_picker_open,
            UiAction::ClosePanels => {
                next.history_open = false;
                next.settings_open = false;
                next.model_picker_open = false;
            }
        }
        next
    }
}
