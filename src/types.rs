//! Core type definitions for the arbitrage detection system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One quoted price from one bookmaker for one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsRecord {
    pub bookmaker: String,
    pub sport: String,
    pub event: String,
    pub market: String,
    pub selection: String,
    /// Decimal odds, 0.0 means the raw quote could not be parsed
    pub odds: f64,
}

impl OddsRecord {
    /// True when the record carries a usable decimal price
    #[inline]
    pub fn is_priced(&self) -> bool {
        self.odds.is_finite() && self.odds > 0.0
    }
}

/// Odds row as delivered by an acquisition source, before normalization
#[derive(Debug, Clone, Deserialize)]
pub struct RawOddsRecord {
    pub bookmaker: String,
    pub sport: String,
    pub event: String,
    pub market: String,
    pub selection: String,
    /// Odds text exactly as quoted ("2.10", "+150", "-120", "5/2")
    pub odds: String,
}

/// Market shape, decides how selections are paired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketShape {
    /// Moneyline / match winner / 1X2: every distinct selection is an outcome
    Outcome,
    /// Over/under totals: Over and Under of the same line
    Line,
    /// Handicap / spread: a value against its negation
    Mirrored,
}

impl std::fmt::Display for MarketShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketShape::Outcome => write!(f, "outcome"),
            MarketShape::Line => write!(f, "line"),
            MarketShape::Mirrored => write!(f, "mirrored"),
        }
    }
}

/// Which market shape (and line or handicap) an opportunity was found on
#[derive(Debug, Clone, PartialEq)]
pub enum BetType {
    Moneyline,
    /// Line text as quoted, e.g. "2.5"
    OverUnder(String),
    Handicap(f64),
}

impl std::fmt::Display for BetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BetType::Moneyline => write!(f, "Moneyline"),
            BetType::OverUnder(line) => write!(f, "Over/Under {}", line),
            // Debug keeps the trailing ".0" on whole handicaps
            BetType::Handicap(h) => write!(f, "Handicap/Spread ({:?})", h),
        }
    }
}

impl Serialize for BetType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One leg of an arbitrage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bet {
    pub bookmaker: String,
    pub selection: String,
    pub odds: f64,
    /// Share of the total stake, 0-100
    pub stake_percentage: f64,
    pub stake_amount: f64,
}

/// A detected arbitrage opportunity
#[derive(Debug, Clone, Serialize)]
pub struct Opportunity {
    pub sport: String,
    pub event: String,
    pub market: String,
    pub bet_type: BetType,
    pub detected_at: DateTime<Utc>,
    pub profit_percentage: f64,
    pub bets: Vec<Bet>,
    pub total_stake: f64,
    /// Payout whichever leg wins
    pub expected_return: f64,
}

impl Opportunity {
    /// Sum of implied probabilities across all legs
    pub fn arb_sum(&self) -> f64 {
        self.bets.iter().map(|b| implied_probability(b.odds)).sum()
    }
}

/// Implied probability of decimal odds
#[inline]
pub fn implied_probability(odds: f64) -> f64 {
    1.0 / odds
}

/// Pick the record with the highest usable odds, first seen wins ties
pub fn best_odds<'a, I>(records: I) -> Option<&'a OddsRecord>
where
    I: IntoIterator<Item = &'a OddsRecord>,
{
    let mut best: Option<&OddsRecord> = None;
    for record in records.into_iter().filter(|r| r.is_priced()) {
        match best {
            Some(current) if record.odds <= current.odds => {}
            _ => best = Some(record),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(bookmaker: &str, odds: f64) -> OddsRecord {
        OddsRecord {
            bookmaker: bookmaker.into(),
            sport: "Soccer".into(),
            event: "Chelsea vs Arsenal".into(),
            market: "Match Winner".into(),
            selection: "Chelsea".into(),
            odds,
        }
    }

    #[test]
    fn test_best_odds_picks_maximum() {
        let records = vec![record("BookA", 1.8), record("BookB", 2.1), record("BookC", 1.95)];
        let best = best_odds(&records).unwrap();
        assert_eq!(best.bookmaker, "BookB");
        assert_eq!(best.odds, 2.1);
    }

    #[test]
    fn test_best_odds_tie_keeps_first_seen() {
        let records = vec![record("BookA", 2.0), record("BookB", 2.0)];
        assert_eq!(best_odds(&records).unwrap().bookmaker, "BookA");
    }

    #[test]
    fn test_best_odds_skips_unpriced() {
        let records = vec![record("Broken", 0.0), record("Negative", -1.5)];
        assert!(best_odds(&records).is_none());

        let records = vec![record("Broken", 0.0), record("BookA", 1.5)];
        assert_eq!(best_odds(&records).unwrap().bookmaker, "BookA");
    }

    #[test]
    fn test_bet_type_display() {
        assert_eq!(BetType::Moneyline.to_string(), "Moneyline");
        assert_eq!(BetType::OverUnder("2.5".into()).to_string(), "Over/Under 2.5");
        assert_eq!(BetType::Handicap(1.5).to_string(), "Handicap/Spread (1.5)");
        assert_eq!(BetType::Handicap(2.0).to_string(), "Handicap/Spread (2.0)");
    }

    #[test]
    fn test_implied_probability() {
        assert!((implied_probability(2.0) - 0.5).abs() < 1e-12);
        assert!((implied_probability(1.0) - 1.0).abs() < 1e-12);
    }
}
