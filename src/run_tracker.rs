//! Run statistics and failure tracking for the scheduler.

use crate::config::ERROR_ALERT_THRESHOLD;

#[derive(Debug, Default)]
pub struct RunTracker {
    /// Completed runs, successful or not
    run_count: u32,
    /// Failures since the last successful run or alert
    consecutive_errors: u32,
    /// Opportunities found across all runs
    opportunity_count: u64,
    /// Best edge seen so far, in percent
    best_profit_pct: Option<f64>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True before the first run has been recorded
    pub fn is_first_run(&self) -> bool {
        self.run_count == 0
    }

    /// Record a successful run and the edges it found
    pub fn record_success(&mut self, profits: &[f64]) {
        self.run_count += 1;
        self.consecutive_errors = 0;
        self.opportunity_count += profits.len() as u64;
        for p in profits {
            if self.best_profit_pct.map_or(true, |best| *p > best) {
                self.best_profit_pct = Some(*p);
            }
        }
    }

    /// Record a failed run. Returns true when an error alert is due, which
    /// also resets the counter.
    pub fn record_failure(&mut self) -> bool {
        self.run_count += 1;
        self.consecutive_errors += 1;
        if self.consecutive_errors >= ERROR_ALERT_THRESHOLD {
            self.consecutive_errors = 0;
            true
        } else {
            false
        }
    }

    pub fn run_count(&self) -> u32 {
        self.run_count
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn opportunity_count(&self) -> u64 {
        self.opportunity_count
    }

    pub fn summary(&self) -> String {
        format!(
            "Runs: {} | Opportunities: {} | Best edge: {} | Consecutive errors: {}",
            self.run_count(),
            self.opportunity_count(),
            self.best_profit_pct
                .map(|p| format!("{:.2}%", p))
                .unwrap_or_else(|| "-".into()),
            self.consecutive_errors()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_after_threshold() {
        let mut tracker = RunTracker::new();
        assert!(tracker.is_first_run());
        assert!(!tracker.record_failure());
        assert!(!tracker.record_failure());
        assert!(tracker.record_failure());
        assert_eq!(tracker.consecutive_errors(), 0);
        assert!(!tracker.is_first_run());
    }

    #[test]
    fn test_success_resets_errors() {
        let mut tracker = RunTracker::new();
        tracker.record_failure();
        tracker.record_failure();
        tracker.record_success(&[3.6, 4.2]);
        assert_eq!(tracker.consecutive_errors(), 0);
        assert!(!tracker.record_failure());
        assert_eq!(tracker.opportunity_count(), 2);
        assert_eq!(tracker.run_count(), 4);
        assert!(tracker.summary().contains("Best edge: 4.20%"));
    }
}
