//! Base decision-engine trait

use crate::data::CandleChart;
use crate::decision::Decision;
use crate::error::EngineError;
use async_trait::async_trait;

/// A source of trade decisions over a candle chart.
///
/// Implementations must be stateless across evaluations: given the same
/// chart, `evaluate` returns the same decision. The orchestrator depends
/// only on this trait and picks an implementation at composition time.
///
/// `evaluate` errs only on invalid configuration (bad timeframe labels,
/// too few timeframes); insufficient market data must resolve to a
/// NEUTRAL decision with a diagnostic reason instead.
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    /// Engine name for logging.
    fn name(&self) -> &str;

    /// Evaluate one chart into one decision.
    async fn evaluate(&self, chart: &CandleChart) -> Result<Decision, EngineError>;
}
