//! フォアグラウンドのカウントダウンループ
//!
//! ティック・操作入力・シャットダウン要求を1つのループで待ち、
//! 終端状態になるまでエンジンを駆動する。

use std::future::Future;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::Interval;
use tracing::{debug, info};

use super::engine::{CountdownEngine, CountdownEvent};
use crate::duration::Duration;
use crate::types::{Countdown, CountdownState};

/// ユーザーからの操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    Resume,
    /// 一時停止と再開の切り替え
    Toggle,
    Cancel,
}

/// カウントダウンイベントの受け手
///
/// 表示の更新に使う。イベント発生直後のカウントダウン状態が渡される。
pub trait CountdownObserver {
    fn on_event(&mut self, event: &CountdownEvent, countdown: &Countdown);
}

/// カウントダウンを終端状態まで実行する
///
/// - `controls`: 操作入力。送信側が全て閉じても、カウントダウンは続く
/// - `shutdown`: 完了すると中断する（Ctrl-C / SIGTERM）
///
/// 戻り値は終端状態のカウントダウン。
pub async fn run_countdown<F, O>(
    duration: Duration,
    message: Option<String>,
    mut controls: mpsc::UnboundedReceiver<Control>,
    shutdown: F,
    observer: &mut O,
) -> Result<Countdown>
where
    F: Future<Output = ()>,
    O: CountdownObserver + ?Sized,
{
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut engine = CountdownEngine::new(duration, message, event_tx);

    info!("Starting countdown: {}", duration);
    engine.start()?;
    forward_events(&mut event_rx, &engine, observer);

    tokio::pin!(shutdown);

    let mut ticker = CountdownEngine::create_ticker();
    // 最初のティックは即座に完了するので読み捨てる
    ticker.tick().await;

    let mut controls_open = true;

    while !engine.state().is_terminal() {
        tokio::select! {
            _ = ticker.tick() => {
                engine.process_tick()?;
            }
            control = controls.recv(), if controls_open => match control {
                Some(control) => apply_control(&mut engine, &mut ticker, control),
                None => {
                    debug!("Control input closed");
                    controls_open = false;
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown requested, cancelling countdown");
                engine.cancel()?;
            }
        }

        forward_events(&mut event_rx, &engine, observer);
    }

    let countdown = engine.countdown().clone();
    info!(
        "Countdown {} after {}s",
        countdown.state,
        countdown.elapsed_seconds()
    );
    Ok(countdown)
}

/// 操作を適用する
///
/// 状態に合わない操作（カウント中の再開など）は無視する。
fn apply_control(engine: &mut CountdownEngine, ticker: &mut Interval, control: Control) {
    let was_paused = engine.state() == CountdownState::Paused;

    let result = match control {
        Control::Pause => engine.pause(),
        Control::Resume => engine.resume(),
        Control::Toggle => engine.toggle(),
        Control::Cancel => engine.cancel(),
    };

    match result {
        Ok(()) => {
            // 再開後の最初のティックは1秒後
            if was_paused && engine.state() == CountdownState::Running {
                ticker.reset();
            }
        }
        Err(e) => debug!("Ignoring {:?}: {}", control, e),
    }
}

fn forward_events<O>(
    event_rx: &mut mpsc::UnboundedReceiver<CountdownEvent>,
    engine: &CountdownEngine,
    observer: &mut O,
) where
    O: CountdownObserver + ?Sized,
{
    while let Ok(event) = event_rx.try_recv() {
        observer.on_event(&event, engine.countdown());
    }
}

// ============================================================================
// Tests
// ============================================================================
