//! Market-shape classification and selection-text parsing.
//!
//! Line and handicap values are pulled out of free-text selection labels once,
//! at grouping time, so the matching code works on typed values only.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::MarketShape;

static LINE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid line pattern"));

static HANDICAP_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]?\d+(?:\.\d+)?").expect("valid handicap pattern"));

const OUTCOME_KEYWORDS: [&str; 3] = ["moneyline", "match winner", "1x2"];
const LINE_KEYWORDS: [&str; 2] = ["over/under", "total"];
const MIRRORED_KEYWORDS: [&str; 2] = ["handicap", "spread"];

/// Classify a market name, first matching shape wins
pub fn classify_market(market: &str) -> Option<MarketShape> {
    let name = market.to_lowercase();
    let has_any = |keywords: &[&str]| keywords.iter().any(|k| name.contains(k));

    if has_any(&OUTCOME_KEYWORDS) {
        Some(MarketShape::Outcome)
    } else if has_any(&LINE_KEYWORDS) {
        Some(MarketShape::Line)
    } else if has_any(&MIRRORED_KEYWORDS) {
        Some(MarketShape::Mirrored)
    } else {
        None
    }
}

/// Side of a totals line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSide {
    Over,
    Under,
}

/// Parsed totals selection, e.g. "Over 2.5 Goals"
#[derive(Debug, Clone, PartialEq)]
pub struct LineSelection {
    pub side: LineSide,
    /// Line exactly as written in the label
    pub line: String,
}

/// Parse a totals selection. The line is the first decimal token and the
/// label must literally contain "Over {line}" or "Under {line}".
pub fn parse_line(selection: &str) -> Option<LineSelection> {
    let line = LINE_TOKEN.find(selection)?.as_str().to_string();

    let side = if selection.contains(&format!("Over {}", line)) {
        LineSide::Over
    } else if selection.contains(&format!("Under {}", line)) {
        LineSide::Under
    } else {
        return None;
    };

    Some(LineSelection { side, line })
}

/// Parse the signed handicap of a spread selection, e.g. "+2.5 Team A"
pub fn parse_handicap(selection: &str) -> Option<f64> {
    let token = HANDICAP_TOKEN.find(selection)?.as_str();
    token.parse::<f64>().ok().filter(|h| h.is_finite())
}
