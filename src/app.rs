//! タイマー1回分の実行
//!
//! カウントダウンを実行し、満了時の通知と終端イベントのフックを行う。
//! 結果は終了コードに対応する [`Outcome`] として返す。

use std::future::Future;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, TimeZone};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::TimerConfig;
use crate::countdown::{run_countdown, Control, CountdownObserver};
use crate::duration::{duration_until, parse_duration, Duration, ParseError};
use crate::hooks::{HookContext, HookExecutor};
use crate::notification::{NotificationDispatcher, NotificationRequest, NotifierFailure};
use crate::types::{Countdown, CountdownState, HookEvent};

/// 正常終了（満了）
pub const EXIT_SUCCESS: u8 = 0;
/// 実行時エラー
pub const EXIT_ERROR: u8 = 1;
/// 引数・設定の誤り
pub const EXIT_USAGE_ERROR: u8 = 2;
/// 中断（128 + SIGINT）
pub const EXIT_INTERRUPTED: u8 = 130;

/// 実行結果
#[derive(Debug)]
pub struct Outcome {
    /// 終端状態のカウントダウン
    pub countdown: Countdown,
    /// 失敗した通知
    pub notification_failures: Vec<NotifierFailure>,
    /// 失敗したフックの数
    pub hook_failures: usize,
    /// 通知・フックの実行中に中断された
    pub interrupted: bool,
}

impl Outcome {
    pub fn state(&self) -> CountdownState {
        self.countdown.state
    }

    /// 終了コード
    ///
    /// 通知やフックの失敗は終了コードに影響しない。
    pub fn exit_code(&self) -> u8 {
        if self.interrupted {
            return EXIT_INTERRUPTED;
        }
        match self.countdown.state {
            CountdownState::Expired => EXIT_SUCCESS,
            CountdownState::Cancelled => EXIT_INTERRUPTED,
            CountdownState::Running | CountdownState::Paused => EXIT_ERROR,
        }
    }
}

/// カウントダウンの長さを決める
///
/// `at` があれば次にその時刻になるまで、なければ式を解析する。
pub fn resolve_duration<Tz: TimeZone>(
    expr: Option<&str>,
    at: Option<NaiveTime>,
    now: &DateTime<Tz>,
) -> Result<Duration, ParseError> {
    match (at, expr) {
        (Some(target), _) => Ok(duration_until(target, now)),
        (None, Some(expr)) => parse_duration(expr),
        (None, None) => Err(ParseError::Empty),
    }
}

/// タイマーアプリケーション
pub struct TimerApp {
    config: TimerConfig,
    dispatcher: NotificationDispatcher,
    hooks: HookExecutor,
    session_id: Uuid,
}

impl TimerApp {
    /// 設定から通知手段とフックを組み立てる
    pub fn new(config: TimerConfig) -> Self {
        let dispatcher = NotificationDispatcher::from_config(&config);
        let hooks = HookExecutor::from_config(&config);
        Self::with_parts(config, dispatcher, hooks)
    }

    pub fn with_parts(
        config: TimerConfig,
        dispatcher: NotificationDispatcher,
        hooks: HookExecutor,
    ) -> Self {
        Self {
            config,
            dispatcher,
            hooks,
            session_id: Uuid::new_v4(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// カウントダウンを終端状態まで実行し、通知とフックを行う
    ///
    /// `shutdown` は中断要求を待つFutureを作る。カウントダウン中と、
    /// その後の通知・フック実行中にそれぞれ新しく作って待つ。
    /// 後者で中断されると実行中のフックは破棄され、その子プロセスは終了する。
    pub async fn run<S, F, O>(
        &self,
        duration: Duration,
        message: Option<String>,
        controls: mpsc::UnboundedReceiver<Control>,
        shutdown: S,
        observer: &mut O,
    ) -> Result<Outcome>
    where
        S: Fn() -> F,
        F: Future<Output = ()>,
        O: CountdownObserver + ?Sized,
    {
        let countdown = run_countdown(duration, message, controls, shutdown(), observer)
            .await
            .context("Countdown failed")?;

        let finish = self.finish(&countdown);
        let (notification_failures, hook_failures, interrupted) = tokio::select! {
            (notification_failures, hook_failures) = finish => {
                (notification_failures, hook_failures, false)
            }
            _ = shutdown() => {
                info!("Interrupted while running notifications and hooks");
                (Vec::new(), 0, true)
            }
        };

        Ok(Outcome {
            countdown,
            notification_failures,
            hook_failures,
            interrupted,
        })
    }

    /// 終端状態に応じて通知とフックを実行する
    async fn finish(&self, countdown: &Countdown) -> (Vec<NotifierFailure>, usize) {
        let notification_failures = if countdown.state == CountdownState::Expired {
            self.notify_expired(countdown).await
        } else {
            Vec::new()
        };

        let hook_failures = match HookEvent::from_state(countdown.state) {
            Some(event) => {
                let context = HookContext::from_countdown(event, countdown, self.session_id);
                if self.hooks.has_hooks_for(&context) {
                    self.hooks.run(&context).await.len()
                } else {
                    debug!("No hooks for {}", event);
                    0
                }
            }
            None => 0,
        };

        (notification_failures, hook_failures)
    }

    async fn notify_expired(&self, countdown: &Countdown) -> Vec<NotifierFailure> {
        let request = NotificationRequest::expired(
            self.config.notification_title.clone(),
            countdown.total,
            countdown.message.as_deref(),
        );

        let failures = self.dispatcher.dispatch(&request).await;
        if failures.is_empty() {
            info!("Expiry notification delivered ({} notifiers)", self.dispatcher.len());
        } else {
            debug!(
                "{} of {} notifiers failed",
                failures.len(),
                self.dispatcher.len()
            );
        }
        failures
    }
}
