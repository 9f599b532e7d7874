use chrono::NaiveTime;
use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::duration::parse_clock_target;
use crate::notification::validate_message;

/// Minimal countdown timer
#[derive(Parser, Debug)]
#[command(
    name = "timer",
    version,
    about = "A minimalist command-line countdown timer",
    long_about = "Count down from a human-friendly duration and notify when time is up.\n\n\
                  Examples:\n  timer 5m\n  timer 1h30m -m \"Meeting\"\n  timer 90\n  timer 1:30\n  timer --at 14:30",
    propagate_version = true,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommand definitions
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate a shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// config command arguments
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Print only the config file path
    #[arg(long)]
    pub path: bool,
}

/// Countdown arguments
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Duration such as 5m, 1h30m, 90 (seconds) or 1:30
    #[arg(
        value_name = "DURATION",
        num_args = 1..,
        required_unless_present = "at",
        conflicts_with = "at"
    )]
    pub duration: Vec<String>,

    /// Count down to a wall-clock time (HH:MM or HH:MM:SS)
    #[arg(long, value_name = "TIME", value_parser = parse_clock_target)]
    pub at: Option<NaiveTime>,

    /// Label shown in the display and the notification
    #[arg(short, long, value_parser = parse_message)]
    pub message: Option<String>,

    /// Do not ring the terminal bell
    #[arg(long)]
    pub no_bell: bool,

    /// Do not show a desktop notification
    #[arg(long)]
    pub no_notify: bool,

    /// Do not play a sound
    #[arg(long)]
    pub no_sound: bool,

    /// Hide the live countdown and print only the result
    #[arg(short, long)]
    pub quiet: bool,
}

impl RunArgs {
    /// Duration tokens joined into one expression (`timer 1h 30m`)
    pub fn duration_expr(&self) -> String {
        self.duration.join(" ")
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            no_bell: self.no_bell,
            no_notify: self.no_notify,
            no_sound: self.no_sound,
        }
    }
}

/// Message validation
fn parse_message(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("message must not be empty".to_string());
    }
    validate_message(s)
        .map(str::to_string)
        .map_err(|e| e.to_string())
}
