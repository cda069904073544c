//! Terminal chat client: a dispatch controller that sends user turns to a
//! response provider, pairs replies with their requests, and tracks model
//! selection, connector activation and per-capability usage.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod display;
pub mod input;
pub mod providers;
pub mod utils;
