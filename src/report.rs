//! Human-readable reports handed to the notification channel.

use std::fmt::Write;

use crate::types::Opportunity;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A rendered notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub body: String,
}

/// Report for a detected opportunity
pub fn opportunity_report(opp: &Opportunity) -> Report {
    let subject = format!(
        "Arbitrage Opportunity Found - {:.2}% Profit",
        opp.profit_percentage
    );

    let mut body = String::new();
    let _ = writeln!(body, "Arbitrage Opportunity Detected");
    let _ = writeln!(body, "Potential Profit: {:.2}%", opp.profit_percentage);
    let _ = writeln!(body, "Event: {}", opp.event);
    let _ = writeln!(body, "Sport: {}", opp.sport);
    let _ = writeln!(body, "Date/Time: {}", opp.detected_at.format(TIMESTAMP_FORMAT));
    let _ = writeln!(body);
    let _ = writeln!(body, "Betting Details:");
    let _ = writeln!(
        body,
        "{:<16} {:<24} {:>8} {:>8} {:>12}",
        "Bookmaker", "Selection", "Odds", "Stake %", "Stake Amount"
    );
    for bet in &opp.bets {
        let _ = writeln!(
            body,
            "{:<16} {:<24} {:>8.2} {:>7.2}% {:>12.2}",
            bet.bookmaker, bet.selection, bet.odds, bet.stake_percentage, bet.stake_amount
        );
    }
    let _ = writeln!(body, "* Based on a total stake of {:.2}", opp.total_stake);
    let _ = writeln!(body);
    let _ = writeln!(body, "Bet Type: {}", opp.bet_type);
    let _ = writeln!(body, "Market: {}", opp.market);
    let _ = writeln!(body, "Expected Return: {:.2}", opp.expected_return);
    let _ = writeln!(body);
    let _ = write!(
        body,
        "Note: Odds may change quickly. Verify all information before placing bets."
    );

    Report { subject, body }
}

/// Sent once when the bot starts monitoring
pub fn startup_report() -> Report {
    Report {
        subject: "Sports Arbitrage Bot - Active".into(),
        body: "Sports arbitrage bot is now running and monitoring odds feeds. \
               Notifications follow only when opportunities are found or the bot needs attention."
            .into(),
    }
}

/// Sent after repeated failed runs
pub fn error_report(message: &str) -> Report {
    Report {
        subject: "Sports Arbitrage Bot - Error Alert".into(),
        body: format!(
            "Error detected in sports arbitrage bot:\n{}\nCheck the bot configuration and odds feeds.",
            message
        ),
    }
}
