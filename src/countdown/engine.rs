//! カウントダウンエンジン
//!
//! カウントダウンのコアロジックを提供する。
//! 状態遷移、1秒ごとのカウントダウン、イベント発火を担当する。

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration as TickDuration, Interval, MissedTickBehavior};

use crate::duration::Duration;
use crate::types::{Countdown, CountdownState};

/// ティック間隔
pub const TICK_INTERVAL: TickDuration = TickDuration::from_secs(1);

/// カウントダウンイベント
///
/// エンジンが発火するイベント。表示の更新や通知に使用する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownEvent {
    /// 開始
    Started { total_seconds: u64 },
    /// ティック（1秒経過）
    Tick { remaining_seconds: u64 },
    /// 一時停止
    Paused,
    /// 再開
    Resumed,
    /// 満了
    Expired,
    /// 中断
    Cancelled { remaining_seconds: u64 },
}

/// カウントダウンエンジン
///
/// 1秒ごとにティックを処理し、状態遷移のたびにイベントを送信する。
///
/// # 使用方法
///
/// ```ignore
/// let (event_tx, mut event_rx) = mpsc::unbounded_channel();
/// let mut engine = CountdownEngine::new(duration, None, event_tx);
/// let mut ticker = CountdownEngine::create_ticker();
/// engine.start()?;
///
/// while !engine.state().is_terminal() {
///     tokio::select! {
///         _ = ticker.tick() => {
///             engine.process_tick()?;
///         }
///         _ = tokio::signal::ctrl_c() => {
///             engine.cancel()?;
///         }
///     }
/// }
/// ```
pub struct CountdownEngine {
    /// カウントダウン状態
    countdown: Countdown,
    /// start() 済みかどうか
    started: bool,
    /// イベント送信チャネル
    event_tx: mpsc::UnboundedSender<CountdownEvent>,
}

impl CountdownEngine {
    /// 新しいCountdownEngineを作成
    pub fn new(
        duration: Duration,
        message: Option<String>,
        event_tx: mpsc::UnboundedSender<CountdownEvent>,
    ) -> Self {
        Self {
            countdown: Countdown::new(duration, message),
            started: false,
            event_tx,
        }
    }

    /// ティック用のIntervalを作成
    ///
    /// 1秒間隔でティックを発生させるIntervalを返す。
    /// `MissedTickBehavior::Skip` を設定済み。
    pub fn create_ticker() -> Interval {
        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }

    /// カウントダウンを開始
    ///
    /// 長さが0秒の場合はティックせずに即座に満了する。
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            anyhow::bail!("Countdown has already been started");
        }
        self.started = true;

        self.send(CountdownEvent::Started {
            total_seconds: self.countdown.total.as_secs(),
        })
        .context("Failed to send started event")?;

        if self.countdown.total.is_zero() {
            self.countdown.expire();
            self.send(CountdownEvent::Expired)
                .context("Failed to send expired event")?;
        }

        Ok(())
    }

    /// 一時停止
    pub fn pause(&mut self) -> Result<()> {
        if !self.countdown.is_running() {
            anyhow::bail!("Countdown is not running");
        }

        self.countdown.pause();

        self.send(CountdownEvent::Paused)
            .context("Failed to send paused event")?;

        Ok(())
    }

    /// 再開
    pub fn resume(&mut self) -> Result<()> {
        if !self.countdown.is_paused() {
            anyhow::bail!("Countdown is not paused");
        }

        self.countdown.resume();

        self.send(CountdownEvent::Resumed)
            .context("Failed to send resumed event")?;

        Ok(())
    }

    /// 一時停止と再開を切り替える
    pub fn toggle(&mut self) -> Result<()> {
        match self.countdown.state {
            CountdownState::Running => self.pause(),
            CountdownState::Paused => self.resume(),
            state => anyhow::bail!("Countdown is already {}", state),
        }
    }

    /// 中断
    ///
    /// 終端状態（満了・中断済み）からは中断できない。
    pub fn cancel(&mut self) -> Result<()> {
        if self.countdown.state.is_terminal() {
            anyhow::bail!("Countdown is already {}", self.countdown.state);
        }

        self.countdown.cancel();

        self.send(CountdownEvent::Cancelled {
            remaining_seconds: self.countdown.remaining_seconds,
        })
        .context("Failed to send cancelled event")?;

        Ok(())
    }

    /// 現在の状態を取得
    pub fn state(&self) -> CountdownState {
        self.countdown.state
    }

    /// カウントダウン全体を取得
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// 1ティック（1秒）を処理
    ///
    /// カウント中の場合、残り時間を1秒減らし、Tickイベントを送信する。
    /// 残り時間が0になった場合は満了に遷移する。
    ///
    /// # 戻り値
    ///
    /// - `Ok(true)`: ティックを処理した
    /// - `Ok(false)`: カウント中ではない（未開始・一時停止中・終端状態）
    /// - `Err(...)`: イベント送信に失敗
    pub fn process_tick(&mut self) -> Result<bool> {
        if !self.started || !self.countdown.is_running() {
            return Ok(false);
        }

        let completed = self.countdown.tick();

        self.send(CountdownEvent::Tick {
            remaining_seconds: self.countdown.remaining_seconds,
        })
        .context("Failed to send tick event")?;

        if completed {
            self.countdown.expire();
            self.send(CountdownEvent::Expired)
                .context("Failed to send expired event")?;
        }

        Ok(true)
    }

    fn send(
        &self,
        event: CountdownEvent,
    ) -> Result<(), mpsc::error::SendError<CountdownEvent>> {
        self.event_tx.send(event)
    }
}

// ============================================================================
// Tests
// ============================================================================
