use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::HookEvent;

/// フックのデフォルトタイムアウト（秒）
pub const DEFAULT_HOOK_TIMEOUT_SECS: u64 = 30;

/// フック定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookDefinition {
    /// フック名
    pub name: String,
    /// 実行するスクリプトのパス（絶対パス）
    pub script: PathBuf,
    /// 実行するイベント
    #[serde(default = "default_events")]
    pub events: Vec<HookEvent>,
    /// 有効かどうか
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 個別タイムアウト（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

fn default_events() -> Vec<HookEvent> {
    vec![HookEvent::Expired]
}

fn default_enabled() -> bool {
    true
}

impl HookDefinition {
    pub fn new(name: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            events: default_events(),
            enabled: true,
            timeout: None,
        }
    }

    pub fn with_events(mut self, events: Vec<HookEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = Some(timeout_secs);
        self
    }

    /// イベントで実行すべきか
    pub fn runs_on(&self, event: HookEvent) -> bool {
        self.enabled && self.events.contains(&event)
    }

    /// 実効タイムアウト（秒）
    pub fn timeout_secs(&self, default_secs: u64) -> u64 {
        self.timeout.unwrap_or(default_secs)
    }
}
