//! 満了時の通知
//!
//! 通知はベストエフォートで、失敗してもカウントダウンの結果は変わらない。

pub mod bell;
pub mod command;
pub mod desktop;
pub mod error;
pub mod request;
pub mod sound;

use async_trait::async_trait;
use tracing::debug;

pub use bell::TerminalBell;
pub use command::Platform;
pub use desktop::DesktopNotifier;
pub use error::NotificationError;
pub use request::{NotificationRequest, NotificationRequestId};
pub use sound::{SoundNotifier, SoundSource};

use crate::config::TimerConfig;

pub mod limits {
    pub const MAX_MESSAGE_LENGTH: usize = 100;
    pub const MAX_TITLE_LENGTH: usize = 50;
}

/// 通知手段
#[async_trait]
pub trait Notifier: Send + Sync {
    /// ログ・エラー表示用の名前
    fn name(&self) -> &str;

    /// このプラットフォームで使えるか
    fn is_available(&self) -> bool;

    async fn notify(&self, request: &NotificationRequest) -> Result<(), NotificationError>;
}

/// 失敗した通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierFailure {
    pub notifier: String,
    pub error: NotificationError,
}

impl std::fmt::Display for NotifierFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.notifier, self.error)
    }
}

/// 登録された全ての通知手段に順に通知する
#[derive(Default)]
pub struct NotificationDispatcher {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 設定で有効な通知手段を登録する
    pub fn from_config(config: &TimerConfig) -> Self {
        let mut dispatcher = Self::new();
        if config.bell {
            dispatcher.push(Box::new(TerminalBell::new()));
        }
        if config.desktop_notification {
            dispatcher.push(Box::new(DesktopNotifier::new()));
        }
        if config.sound {
            dispatcher.push(Box::new(SoundNotifier::new(config.sound_file.clone())));
        }
        dispatcher
    }

    pub fn push(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// 全ての通知手段を実行し、失敗したものを返す
    ///
    /// 1つが失敗しても残りは実行する。使えない手段はスキップし、失敗として扱わない。
    pub async fn dispatch(&self, request: &NotificationRequest) -> Vec<NotifierFailure> {
        let mut failures = Vec::new();

        for notifier in &self.notifiers {
            if !notifier.is_available() {
                debug!("Notifier '{}' is not available, skipping", notifier.name());
                continue;
            }

            if let Err(error) = notifier.notify(request).await {
                debug!("Notifier '{}' failed: {}", notifier.name(), error);
                failures.push(NotifierFailure {
                    notifier: notifier.name().to_string(),
                    error,
                });
            }
        }

        failures
    }
}

/// # Errors
/// - メッセージが100文字を超える場合
/// - メッセージに制御文字が含まれる場合
pub fn validate_message(message: &str) -> Result<&str, NotificationError> {
    if message.chars().count() > limits::MAX_MESSAGE_LENGTH {
        return Err(NotificationError::InvalidInput(format!(
            "message must be at most {} characters",
            limits::MAX_MESSAGE_LENGTH
        )));
    }

    if message.chars().any(|c| c.is_control()) {
        return Err(NotificationError::InvalidInput(
            "message must not contain control characters".to_string(),
        ));
    }

    Ok(message)
}

/// # Errors
/// - タイトルが空、または50文字を超える場合
pub fn validate_title(title: &str) -> Result<&str, NotificationError> {
    if title.trim().is_empty() {
        return Err(NotificationError::InvalidInput(
            "notification title must not be empty".to_string(),
        ));
    }

    if title.chars().count() > limits::MAX_TITLE_LENGTH {
        return Err(NotificationError::InvalidInput(format!(
            "notification title must be at most {} characters",
            limits::MAX_TITLE_LENGTH
        )));
    }

    Ok(title)
}
