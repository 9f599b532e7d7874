/// Format seconds as a clock: `MM:SS`, or `H:MM:SS` from one hour up
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Time display information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDisplay {
    /// Remaining time (seconds)
    pub remaining: u64,
    /// Total time (seconds)
    pub total: u64,
    /// Elapsed percentage (0-100)
    pub percentage: u8,
}

impl TimeDisplay {
    pub fn new(remaining: u64, total: u64) -> Self {
        let elapsed = total.saturating_sub(remaining);
        let percentage = if total > 0 {
            let p = elapsed.saturating_mul(100) / total;
            p.min(100) as u8
        } else {
            100
        };
        Self {
            remaining,
            total,
            percentage,
        }
    }

    pub fn format(&self) -> String {
        format!(
            "{} / {} ({}%)",
            format_clock(self.remaining),
            format_clock(self.total),
            self.percentage
        )
    }
}
