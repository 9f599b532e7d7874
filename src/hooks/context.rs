use crate::types::{Countdown, HookEvent};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// フック実行コンテキスト
///
/// スクリプト実行時に環境変数として渡される情報
#[derive(Debug, Clone)]
pub struct HookContext {
    /// 発生したイベント
    pub event: HookEvent,
    /// ラベル（あれば）
    pub message: Option<String>,
    /// カウントダウンの長さ（秒）
    pub duration_secs: u64,
    /// 経過時間（秒）
    pub elapsed_secs: u64,
    /// 残り時間（秒）
    pub remaining_secs: u64,
    /// イベント発生時刻
    pub timestamp: DateTime<Utc>,
    /// セッションID（1回の実行ごと）
    pub session_id: Uuid,
}

impl HookContext {
    /// カウントダウンの現在の状態から作成
    pub fn from_countdown(event: HookEvent, countdown: &Countdown, session_id: Uuid) -> Self {
        Self {
            event,
            message: countdown.message.clone(),
            duration_secs: countdown.total.as_secs(),
            elapsed_secs: countdown.elapsed_seconds(),
            remaining_secs: countdown.remaining_seconds,
            timestamp: Utc::now(),
            session_id,
        }
    }

    /// 環境変数マップに変換
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();

        vars.insert("TIMER_EVENT".to_string(), self.event.as_str().to_string());

        if let Some(ref message) = self.message {
            vars.insert("TIMER_MESSAGE".to_string(), Self::sanitize_value(message));
        }

        vars.insert(
            "TIMER_DURATION_SECS".to_string(),
            self.duration_secs.to_string(),
        );
        vars.insert(
            "TIMER_ELAPSED_SECS".to_string(),
            self.elapsed_secs.to_string(),
        );
        vars.insert(
            "TIMER_REMAINING_SECS".to_string(),
            self.remaining_secs.to_string(),
        );
        vars.insert("TIMER_TIMESTAMP".to_string(), self.timestamp.to_rfc3339());
        vars.insert(
            "TIMER_SESSION_ID".to_string(),
            self.session_id.to_string(),
        );

        vars
    }

    /// 値をサニタイズする（シェルで安全に使用できるように）
    fn sanitize_value(value: &str) -> String {
        value
            .chars()
            .filter(|c| c.is_alphanumeric() || [' ', '-', '_', '.', ':', '/'].contains(c))
            .collect()
    }
}
