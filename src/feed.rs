//! Odds snapshot loading.
//!
//! Each acquisition source drops a JSON array of raw odds rows on disk. A source
//! that cannot be read contributes nothing to the run; the others still load.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::odds::to_decimal;
use crate::types::{OddsRecord, RawOddsRecord};

/// Read one snapshot file
pub fn load_snapshot(path: &Path) -> Result<Vec<RawOddsRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read odds snapshot {}", path.display()))?;
    let rows: Vec<RawOddsRecord> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse odds snapshot {}", path.display()))?;
    Ok(rows)
}

/// Normalize a raw row to decimal odds
pub fn normalize(raw: RawOddsRecord) -> OddsRecord {
    let odds = to_decimal(&raw.odds);
    OddsRecord {
        bookmaker: raw.bookmaker,
        sport: raw.sport,
        event: raw.event,
        market: raw.market,
        selection: raw.selection,
        odds,
    }
}

/// Combined odds from every source for one run
#[derive(Debug, Default)]
pub struct Snapshot {
    pub records: Vec<OddsRecord>,
    pub failed_sources: Vec<PathBuf>,
}

impl Snapshot {
    /// True when sources were configured but none could be loaded
    pub fn is_total_failure(&self, source_count: usize) -> bool {
        source_count > 0 && self.failed_sources.len() == source_count
    }
}

/// Load and combine every snapshot, skipping sources that fail
pub fn load_all(paths: &[PathBuf]) -> Snapshot {
    let mut snapshot = Snapshot::default();

    for path in paths {
        match load_snapshot(path) {
            Ok(rows) => {
                info!("[FEED] Loaded {} odds from {}", rows.len(), path.display());
                snapshot.records.extend(rows.into_iter().map(normalize));
            }
            Err(e) => {
                error!("[FEED] {:#}", e);
                snapshot.failed_sources.push(path.clone());
            }
        }
    }

    let records = &snapshot.records;
    let unpriced = records.iter().filter(|r| !r.is_priced()).count();
    if unpriced > 0 {
        warn!("[FEED] {} odds could not be priced and will be ignored", unpriced);
    }

    info!("[FEED] Total odds: {}", records.len());
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn snapshot(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    const BOOK_A: &str = r#"[
        {"bookmaker": "Bet365", "sport": "Soccer", "event": "Chelsea vs Arsenal",
         "market": "Match Winner", "selection": "Chelsea", "odds": "2.10",
         "datetime": "20:00"},
        {"bookmaker": "Bet365", "sport": "Soccer", "event": "Chelsea vs Arsenal",
         "market": "Match Winner", "selection": "Arsenal", "odds": "+105"}
    ]"#;

    const BOOK_B: &str = r#"[
        {"bookmaker": "Stake", "sport": "Soccer", "event": "Chelsea vs Arsenal",
         "market": "Match Winner", "selection": "Arsenal", "odds": "N/A"}
    ]"#;

    #[test]
    fn test_load_snapshot() {
        let file = snapshot(BOOK_A);
        let rows = load_snapshot(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].odds, "2.10");
        assert_eq!(rows[1].odds, "+105");
    }

    #[test]
    fn test_normalize() {
        let file = snapshot(BOOK_A);
        let rows = load_snapshot(file.path()).unwrap();
        let records: Vec<_> = rows.into_iter().map(normalize).collect();
        assert_eq!(records[0].odds, 2.1);
        assert_eq!(records[1].odds, 2.05);
        assert_eq!(records[1].bookmaker, "Bet365");
    }

    #[test]
    fn test_load_all_skips_failed_sources() {
        let a = snapshot(BOOK_A);
        let b = snapshot(BOOK_B);
        let broken = snapshot("{ not json");
        let paths = vec![
            a.path().to_path_buf(),
            PathBuf::from("/nonexistent/odds.json"),
            broken.path().to_path_buf(),
            b.path().to_path_buf(),
        ];

        let snapshot = load_all(&paths);
        assert_eq!(snapshot.failed_sources.len(), 2);
        assert!(!snapshot.is_total_failure(paths.len()));

        let records = snapshot.records;
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].bookmaker, "Stake");
        assert_eq!(records[2].odds, 0.0);
        assert!(!records[2].is_priced());
    }

    #[test]
    fn test_total_failure() {
        let paths = vec![PathBuf::from("/nonexistent/a.json"), PathBuf::from("/nonexistent/b.json")];
        let snapshot = load_all(&paths);
        assert!(snapshot.records.is_empty());
        assert!(snapshot.is_total_failure(paths.len()));
        assert!(!Snapshot::default().is_total_failure(0));
    }

    #[test]
    fn test_load_snapshot_error_names_file() {
        let broken = snapshot("[{}]");
        let err = load_snapshot(broken.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse odds snapshot"));
    }
}
