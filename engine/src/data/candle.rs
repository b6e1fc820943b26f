//! OHLCV candle data structures

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One completed OHLCV bar.
///
/// Series are ordered oldest to newest with no duplicate timestamps, and
/// carry completed bars only: the in-progress bar for "now" is filtered
/// out by the fetch layer before a series reaches the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Opening price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Volume
    pub volume: f64,
    /// Bar-close timestamp, exchange-local time
    pub timestamp: NaiveDateTime,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }
}
