//! 時間表現パースのエラー型定義

use thiserror::Error;

/// 時間表現のパースエラー
///
/// すべてのバリアントは問題のあった入力（またはトークン）を保持する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// 空文字列または空白のみ
    #[error("duration is empty")]
    Empty,

    /// 数値部分が不正（例: "1.h", "1..5m"）
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// 未知の単位（例: "5x"）
    #[error("unknown unit '{unit}' in '{input}' (expected h, m or s)")]
    UnknownUnit { unit: String, input: String },

    /// 同じ単位が複数回指定された（例: "1m2m"）
    #[error("unit '{unit}' given more than once in '{input}'")]
    DuplicateUnit { unit: String, input: String },

    /// 時計表記が不正（例: "1:75", "::"）
    #[error("invalid clock time '{0}'")]
    InvalidClock(String),

    /// どの文法にも一致しない
    #[error("unrecognized duration '{0}'")]
    Malformed(String),

    /// 秒数がu64に収まらない
    #[error("duration '{0}' is too large")]
    Overflow(String),
}
