//! Keyboard and signal control of the running countdown
//!
//! - stdin (when it is a terminal): `p` pause, `r` resume, empty line toggles, `q` cancel
//! - `SIGUSR1` (Unix): toggle pause
//! - Ctrl-C / `SIGTERM`: cancel (see [`shutdown_signal`])

use std::io::{self, BufRead, IsTerminal};
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::countdown::Control;

/// Hint printed before the live display
pub const CONTROL_HINT: &str = "[Enter] pause/resume  [q Enter] cancel  [Ctrl-C] cancel";

/// Hint to print before the live display, only when keyboard control is active
pub fn control_hint(quiet: bool, stdin_is_terminal: bool) -> Option<&'static str> {
    (!quiet && stdin_is_terminal).then_some(CONTROL_HINT)
}

/// Map one line of keyboard input to a control
pub fn parse_control_line(line: &str) -> Option<Control> {
    match line.trim().to_lowercase().as_str() {
        "" => Some(Control::Toggle),
        "p" | "pause" => Some(Control::Pause),
        "r" | "resume" => Some(Control::Resume),
        "q" | "quit" | "c" | "cancel" => Some(Control::Cancel),
        _ => None,
    }
}

/// Start every control source and return the receiving end
///
/// Keyboard input is read only when `interactive` is set and stdin is a terminal.
pub fn start_controls(interactive: bool) -> mpsc::UnboundedReceiver<Control> {
    let (tx, rx) = mpsc::unbounded_channel();

    if interactive && io::stdin().is_terminal() {
        spawn_stdin_reader(tx.clone());
    }
    spawn_signal_toggle(tx);

    rx
}

/// Read stdin on a detached thread
///
/// A plain thread keeps a pending blocking read from holding up process exit.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<Control>) {
    let spawned = thread::Builder::new()
        .name("stdin-control".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match parse_control_line(&line) {
                    Some(control) => {
                        if tx.send(control).is_err() {
                            break;
                        }
                    }
                    None => debug!("Ignoring input: {:?}", line),
                }
            }
            debug!("stdin control reader finished");
        });

    if let Err(e) = spawned {
        warn!("Failed to start keyboard control: {}", e);
    }
}

#[cfg(unix)]
fn spawn_signal_toggle(tx: mpsc::UnboundedSender<Control>) {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::user_defined1()) {
        Ok(mut usr1) => {
            tokio::spawn(async move {
                while usr1.recv().await.is_some() {
                    debug!("SIGUSR1 received");
                    if tx.send(Control::Toggle).is_err() {
                        break;
                    }
                }
            });
        }
        Err(e) => warn!("Failed to listen for SIGUSR1: {}", e),
    }
}

#[cfg(not(unix))]
fn spawn_signal_toggle(_tx: mpsc::UnboundedSender<Control>) {}

/// Completes on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => debug!("Ctrl-C received"),
        _ = terminate => debug!("SIGTERM received"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_hint_requires_terminal() {
        assert_eq!(control_hint(false, true), Some(CONTROL_HINT));
        assert_eq!(control_hint(false, false), None);
        assert_eq!(control_hint(true, true), None);
    }

    #[test]
    fn test_parse_control_line() {
        assert_eq!(parse_control_line(""), Some(Control::Toggle));
        assert_eq!(parse_control_line("   "), Some(Control::Toggle));
        assert_eq!(parse_control_line("p"), Some(Control::Pause));
        assert_eq!(parse_control_line("Pause"), Some(Control::Pause));
        assert_eq!(parse_control_line("r\n"), Some(Control::Resume));
        assert_eq!(parse_control_line("q"), Some(Control::Cancel));
        assert_eq!(parse_control_line("CANCEL"), Some(Control::Cancel));
        assert_eq!(parse_control_line("x"), None);
        assert_eq!(parse_control_line("pp"), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sigusr1_toggles() {
        use std::time::Duration;

        let mut rx = start_controls(false);
        let status = std::process::Command::new("kill")
            .args(["-USR1", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let control = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(control, Some(Control::Toggle));
    }
}
