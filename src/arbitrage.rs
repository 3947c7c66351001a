//! Arbitrage detection and stake allocation.
//!
//! Odds records are grouped by (sport, event, market), each group is classified
//! by market shape and the matching strategy pairs selections, picks the best
//! price per side and checks whether the implied probabilities sum below 1.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::selection::{classify_market, parse_handicap, parse_line, LineSelection, LineSide};
use crate::types::{best_odds, implied_probability, Bet, BetType, MarketShape, OddsRecord, Opportunity};

/// All records sharing one (sport, event, market) key
#[derive(Debug)]
struct MarketGroup<'a> {
    sport: &'a str,
    event: &'a str,
    market: &'a str,
    records: Vec<&'a OddsRecord>,
}

/// Stateless detector, holds only policy
#[derive(Debug, Clone, Default)]
pub struct ArbitrageFinder {
    config: EngineConfig,
}

impl ArbitrageFinder {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Find every arbitrage opportunity in a snapshot of odds records
    pub fn find_opportunities(&self, records: &[OddsRecord]) -> Vec<Opportunity> {
        if records.is_empty() {
            warn!("[ARB] No odds data to analyze");
            return Vec::new();
        }

        let detected_at = Utc::now();
        let mut opportunities = Vec::new();

        for group in group_records(records) {
            if group.records.len() < 2 {
                continue;
            }

            let Some(shape) = classify_market(group.market) else {
                debug!("[ARB] Skipping unrecognized market '{}'", group.market);
                continue;
            };

            debug!("[ARB] {} | {}: {} market", group.event, group.market, shape);
            let found = match shape {
                MarketShape::Outcome => self.check_outcomes(&group, detected_at),
                MarketShape::Line => self.check_lines(&group, detected_at),
                MarketShape::Mirrored => self.check_handicaps(&group, detected_at),
            };
            opportunities.extend(found);
        }

        info!("[ARB] Found {} arbitrage opportunities", opportunities.len());
        opportunities
    }

    /// Moneyline / 1X2: best price for every distinct selection
    fn check_outcomes(&self, group: &MarketGroup, detected_at: DateTime<Utc>) -> Vec<Opportunity> {
        let mut selections: Vec<&str> = Vec::new();
        for record in &group.records {
            if !selections.contains(&record.selection.as_str()) {
                selections.push(&record.selection);
            }
        }
        if selections.len() < 2 {
            return Vec::new();
        }

        let mut legs = Vec::with_capacity(selections.len());
        for selection in selections {
            let candidates = group.records.iter().copied().filter(|r| r.selection == selection);
            match best_odds(candidates) {
                Some(best) => legs.push(best),
                None => {
                    // Dropping an outcome would fake an arb on the rest
                    debug!(
                        "[ARB] {} | {}: no valid price for '{}', skipping market",
                        group.event, group.market, selection
                    );
                    return Vec::new();
                }
            }
        }

        self.evaluate(group, BetType::Moneyline, &legs, detected_at)
            .into_iter()
            .collect()
    }

    /// Over/under: pair Over and Under of the same line
    fn check_lines(&self, group: &MarketGroup, detected_at: DateTime<Utc>) -> Vec<Opportunity> {
        let quotes: Vec<(LineSelection, &OddsRecord)> = group
            .records
            .iter()
            .filter_map(|r| parse_line(&r.selection).map(|parsed| (parsed, *r)))
            .collect();

        let mut lines: Vec<&str> = Vec::new();
        for (parsed, _) in &quotes {
            if !lines.contains(&parsed.line.as_str()) {
                lines.push(&parsed.line);
            }
        }

        let mut opportunities = Vec::new();
        for line in lines {
            let over = best_on_line(&quotes, LineSide::Over, line);
            let under = best_on_line(&quotes, LineSide::Under, line);
            let (Some(over), Some(under)) = (over, under) else {
                continue;
            };

            let bet_type = BetType::OverUnder(line.to_string());
            if let Some(opp) = self.evaluate(group, bet_type, &[over, under], detected_at) {
                opportunities.push(opp);
            }
        }
        opportunities
    }

    /// Handicap / spread: pair each positive value with its negation
    fn check_handicaps(&self, group: &MarketGroup, detected_at: DateTime<Utc>) -> Vec<Opportunity> {
        let quotes: Vec<(f64, &OddsRecord)> = group
            .records
            .iter()
            .filter_map(|r| match parse_handicap(&r.selection) {
                Some(h) => Some((h, *r)),
                None => {
                    debug!("[ARB] No handicap value in '{}'", r.selection);
                    None
                }
            })
            .collect();

        // Canonical on the positive value so each pair is reported once
        let mut handicaps: Vec<f64> = Vec::new();
        for (h, _) in &quotes {
            if *h > 0.0 && !handicaps.contains(h) {
                handicaps.push(*h);
            }
        }

        let mut opportunities = Vec::new();
        for handicap in handicaps {
            let plus = best_on_handicap(&quotes, handicap);
            let minus = best_on_handicap(&quotes, -handicap);
            let (Some(plus), Some(minus)) = (plus, minus) else {
                continue;
            };

            let bet_type = BetType::Handicap(handicap);
            if let Some(opp) = self.evaluate(group, bet_type, &[plus, minus], detected_at) {
                opportunities.push(opp);
            }
        }
        opportunities
    }

    /// Arbitrage check and stake allocation shared by every market shape
    fn evaluate(
        &self,
        group: &MarketGroup,
        bet_type: BetType,
        legs: &[&OddsRecord],
        detected_at: DateTime<Utc>,
    ) -> Option<Opportunity> {
        let odds: Vec<f64> = legs.iter().map(|r| r.odds).collect();
        let allocation = allocate_stakes(&odds, self.config.total_stake)?;

        if allocation.profit_percentage <= self.config.min_profit_pct {
            debug!(
                "[ARB] {} | {}: edge {:.2}% below threshold",
                group.event, bet_type, allocation.profit_percentage
            );
            return None;
        }

        let bets = legs
            .iter()
            .zip(&allocation.stakes)
            .map(|(record, stake)| Bet {
                bookmaker: record.bookmaker.clone(),
                selection: record.selection.clone(),
                odds: record.odds,
                stake_percentage: stake.percentage,
                stake_amount: stake.amount,
            })
            .collect();

        debug!(
            "[ARB] {} | {} | {}: arb sum {:.4}, profit {:.2}%",
            group.event, group.market, bet_type, allocation.arb_sum, allocation.profit_percentage
        );

        Some(Opportunity {
            sport: group.sport.to_string(),
            event: group.event.to_string(),
            market: group.market.to_string(),
            bet_type,
            detected_at,
            profit_percentage: allocation.profit_percentage,
            bets,
            total_stake: self.config.total_stake,
            expected_return: allocation.payout,
        })
    }
}

/// Stake for one leg
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stake {
    pub percentage: f64,
    pub amount: f64,
}

/// Result of splitting a total stake across arbitrage legs
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub arb_sum: f64,
    pub profit_percentage: f64,
    pub stakes: Vec<Stake>,
    /// Identical for every leg: stake_i * odds_i
    pub payout: f64,
}

/// Split `total_stake` proportionally to implied probability. Returns None
/// unless every price is usable and the implied probabilities sum below 1.
pub fn allocate_stakes(odds: &[f64], total_stake: f64) -> Option<Allocation> {
    if odds.len() < 2 || odds.iter().any(|o| !o.is_finite() || *o <= 0.0) {
        return None;
    }

    let arb_sum: f64 = odds.iter().copied().map(implied_probability).sum();
    if arb_sum >= 1.0 {
        return None;
    }

    let stakes = odds
        .iter()
        .map(|o| {
            let percentage = implied_probability(*o) / arb_sum * 100.0;
            Stake {
                percentage,
                amount: total_stake * percentage / 100.0,
            }
        })
        .collect();

    Some(Allocation {
        arb_sum,
        profit_percentage: (1.0 - arb_sum) * 100.0,
        stakes,
        payout: total_stake / arb_sum,
    })
}

fn best_on_line<'a>(
    quotes: &[(LineSelection, &'a OddsRecord)],
    side: LineSide,
    line: &str,
) -> Option<&'a OddsRecord> {
    best_odds(
        quotes
            .iter()
            .filter(|(parsed, _)| parsed.side == side && parsed.line == line)
            .map(|(_, record)| *record),
    )
}

fn best_on_handicap<'a>(quotes: &[(f64, &'a OddsRecord)], handicap: f64) -> Option<&'a OddsRecord> {
    best_odds(
        quotes
            .iter()
            .filter(|(h, _)| *h == handicap)
            .map(|(_, record)| *record),
    )
}

/// Group records by (sport, event, market) in key order, input order kept
/// within each group
fn group_records(records: &[OddsRecord]) -> Vec<MarketGroup<'_>> {
    let mut groups: BTreeMap<(&str, &str, &str), Vec<&OddsRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.sport.as_str(), record.event.as_str(), record.market.as_str()))
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|((sport, event, market), records)| MarketGroup {
            sport,
            event,
            market,
            records,
        })
        .collect()
}
