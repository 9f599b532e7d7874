//! 時間表現モジュール
//!
//! "5m", "1h30m", "90", "1:30" などの人間向けの時間表現を
//! 秒単位の `Duration` に変換する。

mod error;
mod parser;

pub use error::ParseError;
pub use parser::{duration_until, parse_clock_target, parse_duration};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// カウントダウンの長さ（秒）
///
/// 常に0以上。0秒は有効な値で、カウントダウンは即座に完了する。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Duration(u64);

impl Duration {
    /// 0秒
    pub const ZERO: Duration = Duration(0);

    /// 秒数から作成
    pub const fn from_secs(seconds: u64) -> Self {
        Self(seconds)
    }

    /// 合計秒数を取得
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// 0秒かどうか
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// オーバーフローを検出する加算
    pub fn checked_add(self, other: Duration) -> Option<Duration> {
        self.0.checked_add(other.0).map(Duration)
    }

    /// `std::time::Duration` に変換
    pub fn as_std(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.0)
    }

    /// 人間向けの表記（例: "1h 30m", "45s", "0s"）
    pub fn humanize(&self) -> String {
        if self.0 == 0 {
            return "0s".to_string();
        }

        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;

        let mut parts = Vec::with_capacity(3);
        if hours > 0 {
            parts.push(format!("{}h", hours));
        }
        if minutes > 0 {
            parts.push(format!("{}m", minutes));
        }
        if seconds > 0 {
            parts.push(format!("{}s", seconds));
        }
        parts.join(" ")
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.humanize())
    }
}

impl FromStr for Duration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s)
    }
}

impl From<Duration> for std::time::Duration {
    fn from(duration: Duration) -> Self {
        duration.as_std()
    }
}

// ============================================================================
// Tests
// ============================================================================
