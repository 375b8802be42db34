//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.
//! Handlers are synchronous: every engine entry point is a pure function
//! over in-memory values.

mod compat;
mod completions;
mod config;
mod infer;
mod preview;
mod utils;
mod validate;

pub use compat::handle_compat;
pub use completions::handle_completions;
pub use config::handle_config;
pub use infer::handle_infer;
pub use preview::handle_preview;
pub use validate::handle_validate;
