//! Display utilities for CLI output
//!
//! Live countdown bar and colored result lines.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::cli::time_format::{format_clock, TimeDisplay};
use crate::countdown::{CountdownEvent, CountdownObserver};
use crate::types::{Countdown, CountdownState};

/// Maximum display width of the label next to the bar
const MAX_LABEL_WIDTH: usize = 30;

const BAR_WIDTH: usize = 30;

/// Display handler for CLI output
///
/// Draws the live bar on stdout. In quiet mode only the final line is printed.
pub struct Display {
    quiet: bool,
    bar: Option<ProgressBar>,
}

impl Display {
    /// Create a new Display instance
    pub fn new(quiet: bool) -> Self {
        Self { quiet, bar: None }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    // Helper to create styled progress bar
    fn create_progress_bar(&self, countdown: &Countdown) -> ProgressBar {
        let template = format!("{{prefix}} [{{bar:{}.cyan/blue}}] {{msg}}", BAR_WIDTH);
        let style = ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█░");

        let bar = ProgressBar::with_draw_target(
            Some(countdown.total.as_secs()),
            ProgressDrawTarget::stdout(),
        );
        bar.set_style(style);
        self.refresh(&bar, countdown);
        bar
    }

    fn refresh(&self, bar: &ProgressBar, countdown: &Countdown) {
        // Position in indicatif is "completed", so total - remaining
        bar.set_position(countdown.elapsed_seconds());
        bar.set_prefix(state_prefix(countdown.state));
        bar.set_message(status_message(countdown));
    }

    /// Show the final line for an expired countdown
    pub fn show_expired(&self, countdown: &Countdown) {
        let mut line = format!("Time's up! ({})", countdown.total);
        if let Some(label) = &countdown.message {
            line.push_str(&format!(" {}", truncate_label(label, MAX_LABEL_WIDTH)));
        }
        println!("{} {}", "✓".green().bold(), line.green().bold());
    }

    /// Show the final line for a cancelled countdown
    pub fn show_cancelled(&self, countdown: &Countdown) {
        println!(
            "{} {}",
            "■".red().bold(),
            format!(
                "Cancelled with {} remaining",
                format_clock(countdown.remaining_seconds)
            )
            .red()
        );
    }

    /// Show warning message
    pub fn show_warning(&self, msg: &str) {
        eprintln!("{} {}", "!".yellow().bold(), msg.yellow());
    }

    /// Show error message
    pub fn show_error(&self, msg: &str) {
        eprintln!("{} {}", "✗".red().bold(), msg.red());
    }
}

impl CountdownObserver for Display {
    fn on_event(&mut self, event: &CountdownEvent, countdown: &Countdown) {
        if self.quiet {
            return;
        }

        match event {
            CountdownEvent::Started { .. } => {
                if countdown.total.is_zero() {
                    return;
                }
                let bar = self.create_progress_bar(countdown);
                self.bar = Some(bar);
            }
            CountdownEvent::Tick { .. } | CountdownEvent::Paused | CountdownEvent::Resumed => {
                if let Some(bar) = &self.bar {
                    self.refresh(bar, countdown);
                }
            }
            CountdownEvent::Expired | CountdownEvent::Cancelled { .. } => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }
}

/// Icon and label for the bar prefix
pub fn state_prefix(state: CountdownState) -> String {
    match state {
        CountdownState::Running => format!("⏳ {}", "running".cyan()),
        CountdownState::Paused => format!("⏸ {}", "paused ".yellow()),
        CountdownState::Expired => format!("✓ {}", "done   ".green()),
        CountdownState::Cancelled => format!("■ {}", "stopped".red()),
    }
}

/// Remaining time, total and the label
pub fn status_message(countdown: &Countdown) -> String {
    let time = TimeDisplay::new(countdown.remaining_seconds, countdown.total.as_secs());
    match &countdown.message {
        Some(label) => format!(
            "{}  {}",
            time.format(),
            truncate_label(label, MAX_LABEL_WIDTH).bold()
        ),
        None => time.format(),
    }
}

/// Truncate to a display width, appending an ellipsis when cut
pub fn truncate_label(label: &str, max_width: usize) -> String {
    if label.width() <= max_width {
        return label.to_string();
    }

    let mut result = String::new();
    let mut width = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        result.push(c);
        width += w;
    }
    result.push('…');
    result
}

// ============================================================================
// Tests
// ============================================================================
