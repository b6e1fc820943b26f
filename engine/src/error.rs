//! Engine error types

use thiserror::Error;

/// Configuration mistakes surfaced before any indicator computation.
///
/// Data-insufficiency conditions are never errors; they resolve to a
/// NEUTRAL [`crate::decision::Decision`] with a diagnostic reason.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Timeframe label does not match the `<integer><m|h|d>` grammar.
    #[error("invalid timeframe format: {0}")]
    InvalidTimeframe(String),

    /// The candle chart carries fewer than two timeframes, so there is
    /// nothing to use as the bias and entry series.
    #[error("candle chart requires at least two timeframes, got {0}")]
    InsufficientTimeframes(usize),
}
