//! カウントダウンモジュール
//!
//! 状態遷移を担うエンジンと、それを駆動するフォアグラウンドループを提供する。

pub mod engine;
pub mod runner;

pub use engine::{CountdownEngine, CountdownEvent, TICK_INTERVAL};
pub use runner::{run_countdown, Control, CountdownObserver};
