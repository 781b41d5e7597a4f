//! Line-oriented booking shell.

pub mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod notifier;
pub mod output;
pub mod registry;
pub mod render;
mod shell;
pub mod shell_context;

pub use notifier::ConsoleNotifier;
pub use shell::{run_cli, SCRIPT_ENV};
