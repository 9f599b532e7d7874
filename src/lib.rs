//! 最小構成のカウントダウンタイマーライブラリ
//!
//! 時間表現の解析、カウントダウンエンジン、満了時の通知とフックを提供する。

pub mod app;
pub mod cli;
pub mod config;
pub mod countdown;
pub mod duration;
pub mod hooks;
pub mod logging;
pub mod notification;
pub mod types;
