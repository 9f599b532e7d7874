//! カウントダウンのデータ型定義
//!
//! カウントダウンの状態管理に使用するデータ型を提供する。

use serde::{Deserialize, Serialize};

use crate::duration::Duration;

/// カウントダウンの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    /// カウント中
    Running,
    /// 一時停止中
    Paused,
    /// 0秒に到達（終端状態）
    Expired,
    /// 中断された（終端状態）
    Cancelled,
}

impl CountdownState {
    /// 状態名を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            CountdownState::Running => "running",
            CountdownState::Paused => "paused",
            CountdownState::Expired => "expired",
            CountdownState::Cancelled => "cancelled",
        }
    }

    /// 終端状態かどうか
    ///
    /// 終端状態からは他の状態へ遷移しない。
    pub fn is_terminal(&self) -> bool {
        matches!(self, CountdownState::Expired | CountdownState::Cancelled)
    }
}

impl std::fmt::Display for CountdownState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CountdownState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(CountdownState::Running),
            "paused" => Ok(CountdownState::Paused),
            "expired" => Ok(CountdownState::Expired),
            "cancelled" => Ok(CountdownState::Cancelled),
            _ => Err(()),
        }
    }
}

/// カウントダウン1回分の状態
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    /// 開始時の長さ
    pub total: Duration,
    /// 残り時間（秒）
    pub remaining_seconds: u64,
    /// 現在の状態
    pub state: CountdownState,
    /// 表示・通知用のラベル
    pub message: Option<String>,
}

impl Countdown {
    /// 新しいCountdownを作成（カウント中）
    pub fn new(total: Duration, message: Option<String>) -> Self {
        Self {
            total,
            remaining_seconds: total.as_secs(),
            state: CountdownState::Running,
            message,
        }
    }

    /// 一時停止
    pub fn pause(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Paused;
        }
    }

    /// 再開
    pub fn resume(&mut self) {
        if self.state == CountdownState::Paused {
            self.state = CountdownState::Running;
        }
    }

    /// 中断
    ///
    /// 終端状態では何もしない。
    pub fn cancel(&mut self) {
        if !self.state.is_terminal() {
            self.state = CountdownState::Cancelled;
        }
    }

    /// 満了
    pub fn expire(&mut self) {
        if !self.state.is_terminal() {
            self.remaining_seconds = 0;
            self.state = CountdownState::Expired;
        }
    }

    /// 1秒経過
    /// 戻り値: 残り時間が0になったかどうか
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        self.remaining_seconds == 0
    }

    /// カウント中かどうか
    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    /// 一時停止中かどうか
    pub fn is_paused(&self) -> bool {
        self.state == CountdownState::Paused
    }

    /// 経過時間（秒）
    pub fn elapsed_seconds(&self) -> u64 {
        self.total.as_secs().saturating_sub(self.remaining_seconds)
    }
}

/// フックを起動するイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookEvent {
    /// 0秒に到達した
    Expired,
    /// 中断された
    Cancelled,
}

impl HookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::Expired => "expired",
            HookEvent::Cancelled => "cancelled",
        }
    }

    /// 終端状態に対応するイベント
    pub fn from_state(state: CountdownState) -> Option<Self> {
        match state {
            CountdownState::Expired => Some(HookEvent::Expired),
            CountdownState::Cancelled => Some(HookEvent::Cancelled),
            CountdownState::Running | CountdownState::Paused => None,
        }
    }
}

impl std::fmt::Display for HookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
