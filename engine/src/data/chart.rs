//! Per-evaluation snapshot of market data across timeframes

use crate::data::Candle;
use std::collections::HashMap;

/// Candle series per timeframe plus the current reference price, built
/// once per evaluation cycle by the market-data client and consumed
/// immutably by the decision engine.
///
/// Every configured timeframe is present before the engine runs, even if
/// a fetch resolved to an empty series; the engine treats that as
/// insufficient data, not an error.
#[derive(Debug, Clone, Default)]
pub struct CandleChart {
    candles: HashMap<String, Vec<Candle>>,
    current_price: f64,
    market: String,
}

impl CandleChart {
    pub fn new(market: impl Into<String>) -> Self {
        Self {
            candles: HashMap::new(),
            current_price: 0.0,
            market: market.into(),
        }
    }

    /// Attach the candle series for one timeframe label.
    pub fn set_candles(&mut self, timeframe: impl Into<String>, candles: Vec<Candle>) {
        self.candles.insert(timeframe.into(), candles);
    }

    /// Candles for a timeframe, if that timeframe is configured.
    pub fn candles(&self, timeframe: &str) -> Option<&[Candle]> {
        self.candles.get(timeframe).map(|c| c.as_slice())
    }

    /// All configured timeframe labels, in no particular order.
    pub fn timeframes(&self) -> Vec<&str> {
        self.candles.keys().map(|k| k.as_str()).collect()
    }

    pub fn set_current_price(&mut self, price: f64) {
        self.current_price = price;
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn market(&self) -> &str {
        &self.market
    }
}
