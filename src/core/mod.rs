pub mod catalog;
pub mod connectors;
pub mod dispatch;
pub mod error;
pub mod session;
pub mod ui_state;
pub mod usage;
