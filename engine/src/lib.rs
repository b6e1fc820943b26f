//! Kumotrader decision engine
//!
//! The pure core of the trading loop: candle data model, timeframe
//! normalization, the Ichimoku indicator calculator and the
//! multi-timeframe trend/entry evaluator that turns a [`data::CandleChart`]
//! into a [`decision::Decision`].
//!
//! The engine performs no I/O and holds no shared state: every evaluation
//! is recomputed from scratch from the supplied chart, so it is safe to
//! call concurrently on independent inputs.
//!
//! # Example
//!
//! ```no_run
//! use engine::prelude::*;
//!
//! # async fn run(chart: CandleChart) -> Result<(), EngineError> {
//! let strategy = IchimokuStrategy::new(IchimokuConfig::default(), false);
//! let decision = strategy.evaluate(&chart).await?;
//! println!("{}: {}", decision.action, decision.reason);
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod decision;
pub mod error;
pub mod indicators;
pub mod strategy;
pub mod timeframe;

// Re-export commonly used types
pub mod prelude {
    pub use crate::data::{Candle, CandleChart};
    pub use crate::decision::{Action, Decision, Trend};
    pub use crate::error::EngineError;
    pub use crate::indicators::{Ichimoku, IchimokuConfig, IchimokuRow};
    pub use crate::strategy::{DecisionEngine, IchimokuStrategy};
    pub use crate::timeframe::parse_timeframe_minutes;
}
