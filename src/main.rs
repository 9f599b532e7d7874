//! カウントダウンタイマーCLI
//!
//! `timer 5m` のように時間を指定してカウントダウンし、満了時に通知する。

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use colored::Colorize;
use minimal_timer::app::{
    resolve_duration, TimerApp, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR,
};
use minimal_timer::cli::{
    control_hint, generate_completions, shutdown_signal, start_controls, Cli, Commands,
    ConfigArgs, Display, RunArgs,
};
use minimal_timer::config::{ConfigError, TimerConfig};
use minimal_timer::logging;
use minimal_timer::types::CountdownState;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let code = match cli.command {
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            EXIT_SUCCESS
        }
        Some(Commands::Config(args)) => show_config(&args),
        None => run_timer(cli.run).await,
    };

    ExitCode::from(code)
}

async fn run_timer(args: RunArgs) -> u8 {
    let mut display = Display::new(args.quiet);

    let expr = (!args.duration.is_empty()).then(|| args.duration_expr());
    let duration = match resolve_duration(expr.as_deref(), args.at, &Local::now()) {
        Ok(duration) => duration,
        Err(e) => {
            display.show_error(&format!("Invalid duration: {}", e));
            return EXIT_USAGE_ERROR;
        }
    };

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            display.show_error(&e.to_string());
            return EXIT_USAGE_ERROR;
        }
    };
    config.apply_args(&args.overrides());
    debug!("Effective config: {:?}", config);

    let app = TimerApp::new(config);
    debug!("Session {}", app.session_id());
    let controls = start_controls(true);

    if let Some(hint) = control_hint(display.is_quiet(), io::stdin().is_terminal()) {
        println!("{}", hint.dimmed());
    }

    let outcome = match app
        .run(duration, args.message, controls, shutdown_signal, &mut display)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            display.show_error(&format!("{:#}", e));
            return EXIT_ERROR;
        }
    };

    match outcome.state() {
        CountdownState::Expired => {
            display.show_expired(&outcome.countdown);
            for failure in &outcome.notification_failures {
                display.show_warning(&format!("Notification failed: {}", failure));
            }
        }
        CountdownState::Cancelled => display.show_cancelled(&outcome.countdown),
        CountdownState::Running | CountdownState::Paused => {}
    }
    if outcome.interrupted {
        display.show_warning("Interrupted; remaining notifications and hooks were skipped");
    }

    outcome.exit_code()
}

/// 設定を読み込む
///
/// 読めない・壊れたファイルは警告してデフォルト値を使う。値の誤りはエラー。
fn load_config() -> Result<TimerConfig, ConfigError> {
    match TimerConfig::load() {
        Ok(config) => Ok(config),
        Err(e @ ConfigError::Invalid(_)) => Err(e),
        Err(e) => {
            Display::new(false).show_warning(&format!("{}; using defaults", e));
            Ok(TimerConfig::default())
        }
    }
}

fn show_config(args: &ConfigArgs) -> u8 {
    let display = Display::new(false);

    let path = match TimerConfig::default_path() {
        Ok(path) => path,
        Err(e) => {
            display.show_error(&e.to_string());
            return EXIT_ERROR;
        }
    };

    if args.path {
        println!("{}", path.display());
        return EXIT_SUCCESS;
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            display.show_error(&e.to_string());
            return EXIT_USAGE_ERROR;
        }
    };

    let exists = if path.is_file() { "" } else { " (not found, defaults)" };
    println!("{} {}{}", "Config:".bold(), path.display(), exists.dimmed());

    match config.to_json() {
        Ok(json) => {
            println!("{}", json);
            EXIT_SUCCESS
        }
        Err(e) => {
            display.show_error(&e.to_string());
            EXIT_ERROR
        }
    }
}
