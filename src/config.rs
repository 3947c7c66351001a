//! Configuration: policy constants with environment overrides.

use std::path::PathBuf;

/// Minimum edge, in percent, for an opportunity to be reported
pub const DEFAULT_MIN_PROFIT_PCT: f64 = 1.0;

/// Reference total stake used for stake allocation
pub const DEFAULT_TOTAL_STAKE: f64 = 1000.0;

/// Consecutive failed runs before an error alert is raised
pub const ERROR_ALERT_THRESHOLD: u32 = 3;

/// Engine policy, the only settings that affect detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub min_profit_pct: f64,
    pub total_stake: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_profit_pct: DEFAULT_MIN_PROFIT_PCT,
            total_stake: DEFAULT_TOTAL_STAKE,
        }
    }
}

impl EngineConfig {
    /// Read MIN_PROFIT_PCT and TOTAL_STAKE, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            min_profit_pct: env_f64("MIN_PROFIT_PCT")
                .filter(|v| *v >= 0.0)
                .unwrap_or(DEFAULT_MIN_PROFIT_PCT),
            total_stake: env_f64("TOTAL_STAKE")
                .filter(|v| *v > 0.0)
                .unwrap_or(DEFAULT_TOTAL_STAKE),
        }
    }
}

/// Seconds between detection runs (default: 300)
pub fn scrape_interval_secs() -> u64 {
    std::env::var("SCRAPE_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|v| *v > 0)
        .unwrap_or(300)
}

/// Seconds between heartbeat log lines (default: 60)
pub fn heartbeat_interval_secs() -> u64 {
    std::env::var("HEARTBEAT_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|v| *v > 0)
        .unwrap_or(60)
}

/// Odds snapshot files, one per source (default: odds.json)
pub fn odds_feed_paths() -> Vec<PathBuf> {
    let raw = std::env::var("ODDS_FEED_PATHS").unwrap_or_else(|_| "odds.json".into());
    parse_paths(&raw)
}

/// Run a single detection pass and exit (default: false)
pub fn is_run_once() -> bool {
    std::env::var("RUN_ONCE")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.min_profit_pct, 1.0);
        assert_eq!(config.total_stake, 1000.0);
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(
            parse_paths("bet365.json, betmgm.json,,stake.json "),
            vec![
                PathBuf::from("bet365.json"),
                PathBuf::from("betmgm.json"),
                PathBuf::from("stake.json"),
            ]
        );
        assert!(parse_paths(" , ").is_empty());
    }
}
