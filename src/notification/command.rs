//! 外部コマンドによる通知の共通処理
//!
//! デスクトップ通知やサウンド再生はOS付属のコマンドに任せる。

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::NotificationError;

/// 通知コマンドのタイムアウト（秒）
pub const COMMAND_TIMEOUT_SECS: u64 = 5;

/// 実行するコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

/// 実行中のプラットフォーム
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    /// Linux / BSD（freedesktop系）
    Unix,
    Windows,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(windows) {
            Platform::Windows
        } else if cfg!(unix) {
            Platform::Unix
        } else {
            Platform::Other
        }
    }
}

/// コマンドをタイムアウト付きで実行する
///
/// 標準出力は捨て、失敗時は標準エラー出力をエラーメッセージに含める。
pub async fn run_command(spec: &CommandSpec, timeout_secs: u64) -> Result<(), NotificationError> {
    debug!("Running notification command: {} {:?}", spec.program, spec.args);

    let child = Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => NotificationError::CommandNotFound(spec.program.clone()),
            _ => NotificationError::CommandFailed {
                command: spec.program.clone(),
                message: e.to_string(),
            },
        })?;

    match timeout(Duration::from_secs(timeout_secs), child.wait_with_output()).await {
        Ok(Ok(output)) if output.status.success() => Ok(()),
        Ok(Ok(output)) => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exit status {:?}", output.status.code())
            } else {
                stderr
            };
            Err(NotificationError::CommandFailed {
                command: spec.program.clone(),
                message,
            })
        }
        Ok(Err(e)) => Err(NotificationError::CommandFailed {
            command: spec.program.clone(),
            message: e.to_string(),
        }),
        Err(_) => Err(NotificationError::Timeout(spec.program.clone(), timeout_secs)),
    }
}
