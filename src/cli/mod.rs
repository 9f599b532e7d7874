//! CLI module for the countdown timer command-line interface
pub mod commands;
pub mod completions;
pub mod control;
pub mod display;
pub mod time_format;

pub use commands::{Cli, Commands, ConfigArgs, RunArgs};
pub use completions::generate_completions;
pub use control::{control_hint, shutdown_signal, start_controls, CONTROL_HINT};
pub use display::Display;
