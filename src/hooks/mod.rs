//! イベントフックモジュール
//!
//! カウントダウンの満了・中断時に外部スクリプトを実行する機能を提供する。

pub mod config;
pub mod context;
pub mod executor;

pub use config::{HookDefinition, DEFAULT_HOOK_TIMEOUT_SECS};
pub use context::HookContext;
pub use executor::{HookError, HookExecutor, HookFailure};
