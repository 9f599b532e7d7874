//! 通知リクエストの作成

use uuid::Uuid;

use crate::duration::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationRequestId(String);

impl NotificationRequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NotificationRequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub id: NotificationRequestId,
    pub title: String,
    pub subtitle: Option<String>,
    pub body: String,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: NotificationRequestId::new(),
            title: title.into(),
            subtitle: None,
            body: body.into(),
        }
    }

    /// カウントダウン満了時の通知を作成
    ///
    /// ラベルがあれば本文に使い、元の長さをサブタイトルにする。
    pub fn expired(title: impl Into<String>, total: Duration, message: Option<&str>) -> Self {
        let time_up = format!("Time's up! ({})", total);
        match message {
            Some(message) => Self::new(title, message).with_subtitle(time_up),
            None => Self::new(title, time_up),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// サブタイトルを含めた1行の本文
    pub fn full_body(&self) -> String {
        match &self.subtitle {
            Some(subtitle) => format!("{} - {}", self.body, subtitle),
            None => self.body.clone(),
        }
    }
}
