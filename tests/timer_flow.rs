use anyhow::Result;
use async_trait::async_trait;
use minimal_timer::{
    app::{TimerApp, EXIT_INTERRUPTED, EXIT_SUCCESS},
    config::TimerConfig,
    countdown::{Control, CountdownEvent, CountdownObserver},
    duration::Duration,
    hooks::{HookDefinition, HookExecutor},
    notification::{NotificationDispatcher, NotificationError, NotificationRequest, Notifier},
    types::{Countdown, CountdownState, HookEvent},
};
use std::future::pending;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// ----------------------------------------------------------------------------
// Mocks
// ----------------------------------------------------------------------------

#[derive(Clone, Default)]
struct MockNotifier {
    calls: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<String>>>,
    fail: bool,
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        if self.fail {
            "broken"
        } else {
            "mock"
        }
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn notify(&self, request: &NotificationRequest) -> Result<(), NotificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_body.lock().unwrap() = Some(request.full_body());
        if self.fail {
            Err(NotificationError::CommandNotFound("notify-send".to_string()))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
struct EventLog(Vec<CountdownEvent>);

impl CountdownObserver for EventLog {
    fn on_event(&mut self, event: &CountdownEvent, _countdown: &Countdown) {
        self.0.push(event.clone());
    }
}

fn app_with(notifiers: Vec<MockNotifier>, hooks: HookExecutor) -> TimerApp {
    let mut dispatcher = NotificationDispatcher::new();
    for notifier in notifiers {
        dispatcher.push(Box::new(notifier));
    }
    TimerApp::with_parts(TimerConfig::default(), dispatcher, hooks)
}

// ----------------------------------------------------------------------------
// Expiry
// ----------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_expiry_notifies_once() -> Result<()> {
    let notifier = MockNotifier::default();
    let app = app_with(vec![notifier.clone()], HookExecutor::default());
    let (_tx, rx) = mpsc::unbounded_channel();
    let mut log = EventLog::default();

    let outcome = app
        .run(
            Duration::from_secs(3),
            Some("Tea".to_string()),
            rx,
            pending::<()>,
            &mut log,
        )
        .await?;

    assert_eq!(outcome.state(), CountdownState::Expired);
    assert_eq!(outcome.exit_code(), EXIT_SUCCESS);
    assert!(outcome.notification_failures.is_empty());
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        notifier.last_body.lock().unwrap().as_deref(),
        Some("Tea - Time's up! (3s)")
    );
    assert_eq!(log.0.last(), Some(&CountdownEvent::Expired));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_failing_notifier_keeps_expired_and_exit_zero() -> Result<()> {
    let broken = MockNotifier {
        fail: true,
        ..MockNotifier::default()
    };
    let working = MockNotifier::default();
    let app = app_with(vec![broken.clone(), working.clone()], HookExecutor::default());
    let (_tx, rx) = mpsc::unbounded_channel();

    let outcome = app
        .run(Duration::from_secs(1), None, rx, pending::<()>, &mut EventLog::default())
        .await?;

    assert_eq!(outcome.state(), CountdownState::Expired);
    assert_eq!(outcome.exit_code(), EXIT_SUCCESS);
    assert_eq!(outcome.notification_failures.len(), 1);
    assert_eq!(outcome.notification_failures[0].notifier, "broken");
    assert_eq!(working.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_zero_duration_expires_immediately() -> Result<()> {
    let notifier = MockNotifier::default();
    let app = app_with(vec![notifier.clone()], HookExecutor::default());
    let (_tx, rx) = mpsc::unbounded_channel();
    let mut log = EventLog::default();

    let outcome = app
        .run(Duration::ZERO, None, rx, pending::<()>, &mut log)
        .await?;

    assert_eq!(outcome.state(), CountdownState::Expired);
    assert!(!log
        .0
        .iter()
        .any(|e| matches!(e, CountdownEvent::Tick { .. })));
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

// ----------------------------------------------------------------------------
// Cancellation
// ----------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_interrupt_cancels_without_notification() -> Result<()> {
    let notifier = MockNotifier::default();
    let app = app_with(vec![notifier.clone()], HookExecutor::default());
    let (_tx, rx) = mpsc::unbounded_channel();
    let mut log = EventLog::default();
    let interrupt = || tokio::time::sleep(std::time::Duration::from_millis(1500));

    let outcome = app
        .run(Duration::from_secs(10), None, rx, interrupt, &mut log)
        .await?;

    assert_eq!(outcome.state(), CountdownState::Cancelled);
    assert_eq!(outcome.exit_code(), EXIT_INTERRUPTED);
    assert_eq!(outcome.countdown.remaining_seconds, 9);
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
    assert!(!log.0.contains(&CountdownEvent::Expired));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cancel_while_paused() -> Result<()> {
    let app = app_with(vec![], HookExecutor::default());
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(Control::Pause)?;
    tx.send(Control::Cancel)?;

    let outcome = app
        .run(Duration::from_secs(5), None, rx, pending::<()>, &mut EventLog::default())
        .await?;

    assert_eq!(outcome.state(), CountdownState::Cancelled);
    assert_eq!(outcome.countdown.remaining_seconds, 5);
    Ok(())
}

// ----------------------------------------------------------------------------
// Hooks
// ----------------------------------------------------------------------------

#[cfg(unix)]
fn write_hook(dir: &tempfile::TempDir, out: &std::path::Path) -> Result<std::path::PathBuf> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let script = dir.path().join("hook.sh");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$TIMER_EVENT $TIMER_REMAINING_SECS $TIMER_MESSAGE\" >> {}\n",
            out.display()
        ),
    )?;
    let mut perms = fs::metadata(&script)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms)?;
    Ok(script)
}

#[cfg(unix)]
#[tokio::test]
async fn test_hooks_run_on_expiry() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let out = dir.path().join("events.log");
    let script = write_hook(&dir, &out)?;

    let hooks = HookExecutor::new(
        vec![HookDefinition::new("log", script)
            .with_events(vec![HookEvent::Expired, HookEvent::Cancelled])],
        5,
    );
    let app = app_with(vec![], hooks);
    let (_tx, rx) = mpsc::unbounded_channel();

    let outcome = app
        .run(
            Duration::ZERO,
            Some("Tea".to_string()),
            rx,
            pending::<()>,
            &mut EventLog::default(),
        )
        .await?;

    assert_eq!(outcome.hook_failures, 0);
    let written = std::fs::read_to_string(&out)?;
    assert_eq!(written.trim(), "expired 0 Tea");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_hooks_run_on_cancel() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let out = dir.path().join("events.log");
    let script = write_hook(&dir, &out)?;

    let hooks = HookExecutor::new(
        vec![HookDefinition::new("log", script).with_events(vec![HookEvent::Cancelled])],
        5,
    );
    let app = app_with(vec![], hooks);
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(Control::Cancel)?;

    let outcome = app
        .run(Duration::from_secs(42), None, rx, pending::<()>, &mut EventLog::default())
        .await?;

    assert_eq!(outcome.state(), CountdownState::Cancelled);
    let written = std::fs::read_to_string(&out)?;
    assert_eq!(written.trim(), "cancelled 42");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_interrupt_during_hooks_returns_promptly() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    use std::time::Instant;

    let dir = tempfile::TempDir::new()?;
    let script = dir.path().join("slow.sh");
    std::fs::write(&script, "#!/bin/sh\nsleep 15\n")?;
    let mut perms = std::fs::metadata(&script)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms)?;

    let hooks = HookExecutor::new(vec![HookDefinition::new("slow", script)], 30);
    let notifier = MockNotifier::default();
    let app = app_with(vec![notifier.clone()], hooks);
    let (_tx, rx) = mpsc::unbounded_channel();
    let interrupt = || tokio::time::sleep(std::time::Duration::from_millis(300));

    let started = Instant::now();
    let outcome = app
        .run(Duration::ZERO, None, rx, interrupt, &mut EventLog::default())
        .await?;

    assert!(started.elapsed() < std::time::Duration::from_secs(5));
    assert_eq!(outcome.state(), CountdownState::Expired);
    assert!(outcome.interrupted);
    assert_eq!(outcome.exit_code(), EXIT_INTERRUPTED);
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_missing_hook_script_does_not_change_outcome() -> Result<()> {
    let hooks = HookExecutor::new(
        vec![HookDefinition::new("missing", "/nonexistent/hook.sh")],
        5,
    );
    let app = app_with(vec![], hooks);
    let (_tx, rx) = mpsc::unbounded_channel();

    let outcome = app
        .run(Duration::ZERO, None, rx, pending::<()>, &mut EventLog::default())
        .await?;

    assert_eq!(outcome.state(), CountdownState::Expired);
    assert_eq!(outcome.hook_failures, 1);
    assert_eq!(outcome.exit_code(), EXIT_SUCCESS);
    Ok(())
}
