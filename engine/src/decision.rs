//! Trade decision model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical outcome of one evaluation cycle.
///
/// `Wait` is the degraded action used by the LLM-backed engine when the
/// upstream response is missing or malformed; the rule-based engine only
/// ever emits `Buy`, `Sell` or `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Neutral,
    Wait,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Neutral => "NEUTRAL",
            Action::Wait => "WAIT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Higher-timeframe directional bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trend::Bullish => "BULLISH",
            Trend::Bearish => "BEARISH",
            Trend::Neutral => "NEUTRAL",
        })
    }
}

/// One evaluation result, handed to the position orchestrator and
/// persisted to the decision audit log.
///
/// The reason carries the numeric levels behind the call so it can be
/// audited after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub reason: String,
    pub current_price: f64,
    pub market: String,
}

impl Decision {
    pub fn new(
        action: Action,
        reason: impl Into<String>,
        current_price: f64,
        market: impl Into<String>,
    ) -> Self {
        Self {
            action,
            reason: reason.into(),
            current_price,
            market: market.into(),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Decision(action={}, reason={}, price={}, market={})",
            self.action, self.reason, self.current_price, self.market
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serde_roundtrip() {
        assert_eq!(serde_json::to_string(&Action::Buy).unwrap(), "\"BUY\"");
        let parsed: Action = serde_json::from_str("\"NEUTRAL\"").unwrap();
        assert_eq!(parsed, Action::Neutral);
    }

    #[test]
    fn test_trend_display() {
        assert_eq!(Trend::Bullish.to_string(), "BULLISH");
        assert_eq!(Trend::Bearish.to_string(), "BEARISH");
        assert_eq!(Trend::Neutral.to_string(), "NEUTRAL");
    }
}
