//! Sports Betting Arbitrage Bot
//!
//! Periodically loads bookmaker odds snapshots and reports cross-bookmaker
//! arbitrage:
//! - Odds normalization (decimal, American, fractional)
//! - Moneyline/1X2, over/under and handicap/spread matching
//! - Stake allocation with equal payout on every leg
//! - Text reports for the notification channel

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{error, info, warn};

mod arbitrage;
mod config;
mod feed;
mod odds;
mod report;
mod run_tracker;
mod selection;
mod types;

use arbitrage::ArbitrageFinder;
use config::{heartbeat_interval_secs, is_run_once, odds_feed_paths, scrape_interval_secs, EngineConfig};
use report::{error_report, opportunity_report, startup_report, Report};
use run_tracker::RunTracker;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sports_arbitrage_bot=info".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let engine_config = EngineConfig::from_env();
    let feed_paths = odds_feed_paths();
    let finder = ArbitrageFinder::new(engine_config);

    info!("🚀 Sports Arbitrage Bot v0.1.0");
    info!("   Min profit: {:.2}%", finder.config().min_profit_pct);
    info!("   Total stake: {:.2}", finder.config().total_stake);
    info!("   Odds feeds: {}", feed_paths.len());

    let tracker = Arc::new(RwLock::new(RunTracker::new()));

    if is_run_once() {
        run_arbitrage_check(&finder, &feed_paths, &tracker);
        info!("[RUN] {}", tracker.read().unwrap().summary());
        return Ok(());
    }

    let interval_secs = scrape_interval_secs();
    info!("   Scrape interval: {}s", interval_secs);

    // Spawn detection task
    let check_tracker = tracker.clone();
    let check_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            run_arbitrage_check(&finder, &feed_paths, &check_tracker);
        }
    });

    // Spawn heartbeat task
    let heartbeat_tracker = tracker.clone();
    let heartbeat_handle = tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(heartbeat_interval_secs()));
        loop {
            interval.tick().await;
            let tracker = heartbeat_tracker.read().unwrap();
            info!("💓 Heartbeat | {}", tracker.summary());
        }
    });

    info!("✅ Scheduler started");
    info!("   Press Ctrl+C to stop\n");

    let _ = tokio::join!(check_handle, heartbeat_handle);

    Ok(())
}

/// One detection run: load odds, find opportunities, report them
fn run_arbitrage_check(
    finder: &ArbitrageFinder,
    feed_paths: &[PathBuf],
    tracker: &Arc<RwLock<RunTracker>>,
) {
    info!("[RUN] Starting arbitrage check...");

    if tracker.read().unwrap().is_first_run() {
        info!("[RUN] First run - sending start-up notice");
        deliver(&startup_report());
    }

    match detect(finder, feed_paths) {
        Ok(profits) => {
            tracker.write().unwrap().record_success(&profits);
            info!("[RUN] Arbitrage check completed successfully");
        }
        Err(e) => {
            let message = format!("Error in arbitrage check: {:#}", e);
            error!("[RUN] {}", message);
            if tracker.write().unwrap().record_failure() {
                deliver(&error_report(&message));
            }
        }
    }
}

/// Returns the profit of every reported opportunity
fn detect(finder: &ArbitrageFinder, feed_paths: &[PathBuf]) -> Result<Vec<f64>> {
    let snapshot = feed::load_all(feed_paths);
    if snapshot.is_total_failure(feed_paths.len()) {
        bail!("no odds source could be loaded");
    }

    let opportunities = finder.find_opportunities(&snapshot.records);
    for opp in &opportunities {
        info!(
            "[ARB] Found opportunity: {} - {} - {:.2}% (arb sum {:.4})",
            opp.event,
            opp.bet_type,
            opp.profit_percentage,
            opp.arb_sum()
        );
        deliver(&opportunity_report(opp));
    }

    Ok(opportunities.iter().map(|o| o.profit_percentage).collect())
}

/// Hand a report to the notification channel
fn deliver(report: &Report) {
    if report.body.is_empty() {
        warn!("[NOTIFY] Empty report: {}", report.subject);
        return;
    }
    info!("[NOTIFY] {}\n{}", report.subject, report.body);
}
