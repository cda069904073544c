pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::core::dispatch::DispatchController;
use crate::core::ui_state::{UiAction, UiState};
pub use dispatcher::create_command_registry;

pub struct ChatState {
    pub controller: DispatchController,
    pub ui: UiState,
    pub should_continue: bool,
}

impl ChatState {
    pub fn new(controller: DispatchController, ui: UiState) -> Self {
        Self {
            controller,
            ui,
            should_continue: true,
        }
    }

    /// Swaps in the snapshot produced by `action`
    pub fn update_ui(&mut self, action: UiAction) {
        self.ui = self.ui.apply(action);
    }
}
