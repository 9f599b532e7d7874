//! 通知システムのエラー型定義

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// このプラットフォームでは通知方法がない
    Unsupported(String),
    /// 通知コマンドが見つからない
    CommandNotFound(String),
    /// 通知コマンドが失敗した
    CommandFailed { command: String, message: String },
    /// 通知コマンドがタイムアウトした
    Timeout(String, u64),
    /// 再生できるサウンドファイルがない
    SoundNotFound(String),
    /// 端末への書き込みなどのI/Oエラー
    Io(String),
    InvalidInput(String),
}

impl fmt::Display for NotificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationError::Unsupported(what) => {
                write!(f, "{} is not supported on this platform", what)
            }
            NotificationError::CommandNotFound(command) => {
                write!(f, "notification command '{}' not found", command)
            }
            NotificationError::CommandFailed { command, message } => {
                write!(f, "'{}' failed: {}", command, message)
            }
            NotificationError::Timeout(command, secs) => {
                write!(f, "'{}' timed out ({}s)", command, secs)
            }
            NotificationError::SoundNotFound(path) => {
                write!(f, "sound file not found: {}", path)
            }
            NotificationError::Io(msg) => {
                write!(f, "I/O error: {}", msg)
            }
            NotificationError::InvalidInput(msg) => {
                write!(f, "invalid input: {}", msg)
            }
        }
    }
}

impl std::error::Error for NotificationError {}

impl From<std::io::Error> for NotificationError {
    fn from(error: std::io::Error) -> Self {
        NotificationError::Io(error.to_string())
    }
}
