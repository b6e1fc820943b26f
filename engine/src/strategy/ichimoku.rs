//! Ichimoku multi-timeframe strategy
//!
//! The rule-based decision core. The longest configured timeframe (HTF)
//! sets the directional bias; the shortest (LTF) supplies the entry
//! trigger: a tenkan/kijun crossover outside the kumo, confirmed by the
//! chikou span against its lag-aligned historical close. All entry
//! conditions are a strict AND, not a scored heuristic.
//!
//! Every evaluation is stateless and recomputed from the supplied chart;
//! the only lookback is the two-row window needed for crossover
//! detection, internal to a single call.

use crate::data::CandleChart;
use crate::decision::{Action, Decision, Trend};
use crate::error::EngineError;
use crate::indicators::{Ichimoku, IchimokuConfig, IchimokuRow, UsableRow};
use crate::strategy::base::DecisionEngine;
use crate::timeframe::parse_timeframe_minutes;
use async_trait::async_trait;

pub struct IchimokuStrategy {
    indicator: Ichimoku,
    strict_mode: bool,
}

impl IchimokuStrategy {
    pub fn new(config: IchimokuConfig, strict_mode: bool) -> Self {
        Self {
            indicator: Ichimoku::new(config),
            strict_mode,
        }
    }

    fn config(&self) -> &IchimokuConfig {
        self.indicator.config()
    }

    /// Close of the bar exactly `chikou_offset` bars before `index`, the
    /// historical point the chikou span of `index` is compared against.
    /// Out of range means the condition simply cannot confirm.
    fn lag_aligned_close(&self, rows: &[IchimokuRow], index: usize) -> Option<f64> {
        index
            .checked_sub(self.config().chikou_offset)
            .and_then(|i| rows.get(i))
            .map(|row| row.close)
    }

    /// Three-way bias from the latest usable row of the bias timeframe.
    fn assess_trend(&self, rows: &[IchimokuRow], index: usize, row: &UsableRow) -> Trend {
        let lag_close = self.lag_aligned_close(rows, index);

        let mut bullish = row.close > row.kumo_top
            && matches!(lag_close, Some(past) if row.chikou > past);
        let mut bearish = row.close < row.kumo_bottom
            && matches!(lag_close, Some(past) if row.chikou < past);

        if self.strict_mode {
            // The projected kumo itself must slope with the trend.
            bullish = bullish && row.senkou_a > row.senkou_b;
            bearish = bearish && row.senkou_a < row.senkou_b;
        }

        if bullish {
            Trend::Bullish
        } else if bearish {
            Trend::Bearish
        } else {
            Trend::Neutral
        }
    }

    fn evaluate_chart(&self, chart: &CandleChart) -> Result<Decision, EngineError> {
        let neutral = |reason: String| {
            Decision::new(Action::Neutral, reason, chart.current_price(), chart.market())
        };

        let timeframes = chart.timeframes();
        if timeframes.len() < 2 {
            return Err(EngineError::InsufficientTimeframes(timeframes.len()));
        }

        // Normalize every label up front; a bad label is a configuration
        // mistake and aborts before any row computation.
        let mut by_minutes = timeframes
            .iter()
            .map(|tf| Ok((*tf, parse_timeframe_minutes(tf)?)))
            .collect::<Result<Vec<_>, EngineError>>()?;
        by_minutes.sort_by_key(|(_, minutes)| *minutes);

        let (ltf, _) = by_minutes[0];
        let (htf, _) = by_minutes[by_minutes.len() - 1];
        tracing::debug!(ltf, htf, "selected entry and bias timeframes");

        let htf_candles = chart.candles(htf).unwrap_or(&[]);
        let ltf_candles = chart.candles(ltf).unwrap_or(&[]);

        let min_bars = self.config().senkou_b_period;
        if htf_candles.len() < min_bars || ltf_candles.len() < min_bars {
            return Ok(neutral(format!(
                "Insufficient candle data for HTF({htf}) or LTF({ltf})"
            )));
        }

        let htf_rows = self.indicator.compute(htf_candles);
        let ltf_rows = self.indicator.compute(ltf_candles);

        let htf_usable: Vec<(usize, UsableRow)> = usable_rows(&htf_rows);
        let ltf_usable: Vec<(usize, UsableRow)> = usable_rows(&ltf_rows);

        let Some((htf_index, htf_latest)) = htf_usable.last().copied() else {
            return Ok(neutral(format!(
                "HTF({htf}) has no fully defined indicator rows"
            )));
        };
        if ltf_usable.len() < 2 {
            return Ok(neutral(format!(
                "Insufficient LTF({ltf}) rows for crossover analysis"
            )));
        }

        let htf_trend = self.assess_trend(&htf_rows, htf_index, &htf_latest);
        tracing::debug!(%htf_trend, "assessed HTF trend");

        let (ltf_index, ltf_latest) = ltf_usable[ltf_usable.len() - 1];
        let (_, ltf_previous) = ltf_usable[ltf_usable.len() - 2];
        let ltf_lag_close = self.lag_aligned_close(&ltf_rows, ltf_index);

        let mut action = Action::Neutral;
        let mut reason = format!("HTF({htf}) Trend: {htf_trend}");

        match htf_trend {
            Trend::Bullish => {
                let crossed_up = ltf_previous.tenkan <= ltf_previous.kijun
                    && ltf_latest.tenkan > ltf_latest.kijun;
                let tenkan_above_kumo = ltf_latest.tenkan > ltf_latest.kumo_top;
                let price_above_kumo = ltf_latest.close > ltf_latest.kumo_top;
                let chikou_confirms =
                    matches!(ltf_lag_close, Some(past) if ltf_latest.chikou > past);

                if crossed_up && tenkan_above_kumo && price_above_kumo && chikou_confirms {
                    action = Action::Buy;
                    reason = format!(
                        "HTF({htf}) BULLISH & LTF({ltf}) TK Cross Above Kumo Confirmed. \
                         HTF Close: {:.2}, HTF Kumo Top: {:.2}. \
                         LTF Close: {:.2}, LTF Kumo Top: {:.2}",
                        htf_latest.close,
                        htf_latest.kumo_top,
                        ltf_latest.close,
                        ltf_latest.kumo_top,
                    );
                }
            }
            Trend::Bearish => {
                let crossed_down = ltf_previous.tenkan >= ltf_previous.kijun
                    && ltf_latest.tenkan < ltf_latest.kijun;
                let tenkan_below_kumo = ltf_latest.tenkan < ltf_latest.kumo_bottom;
                let price_below_kumo = ltf_latest.close < ltf_latest.kumo_bottom;
                let chikou_confirms =
                    matches!(ltf_lag_close, Some(past) if ltf_latest.chikou < past);

                if crossed_down && tenkan_below_kumo && price_below_kumo && chikou_confirms {
                    action = Action::Sell;
                    reason = format!(
                        "HTF({htf}) BEARISH & LTF({ltf}) TK Cross Below Kumo Confirmed. \
                         HTF Close: {:.2}, HTF Kumo Bottom: {:.2}. \
                         LTF Close: {:.2}, LTF Kumo Bottom: {:.2}",
                        htf_latest.close,
                        htf_latest.kumo_bottom,
                        ltf_latest.close,
                        ltf_latest.kumo_bottom,
                    );
                }
            }
            Trend::Neutral => {}
        }

        Ok(Decision::new(
            action,
            reason,
            chart.current_price(),
            chart.market(),
        ))
    }
}

#[async_trait]
impl DecisionEngine for IchimokuStrategy {
    fn name(&self) -> &str {
        "ichimoku"
    }

    async fn evaluate(&self, chart: &CandleChart) -> Result<Decision, EngineError> {
        self.evaluate_chart(chart)
    }
}

fn usable_rows(rows: &[IchimokuRow]) -> Vec<(usize, UsableRow)> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| row.as_usable().map(|usable| (i, usable)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Candle;
    use chrono::NaiveDate;

    fn bars(values: &[(f64, f64, f64)]) -> Vec<Candle> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, (high, low, close))| {
                Candle::new(
                    *close,
                    *high,
                    *low,
                    *close,
                    1.0,
                    start + chrono::Duration::minutes(i as i64 * 15),
                )
            })
            .collect()
    }

    fn small_config() -> IchimokuConfig {
        IchimokuConfig {
            tenkan_period: 2,
            kijun_period: 3,
            senkou_b_period: 4,
            chikou_offset: 2,
            senkou_offset: 2,
        }
    }

    fn rising_bars(count: usize) -> Vec<Candle> {
        let values: Vec<(f64, f64, f64)> = (0..count)
            .map(|i| {
                let close = 10.0 + i as f64;
                (close + 1.0, close - 1.0, close)
            })
            .collect();
        bars(&values)
    }

    #[test]
    fn test_trend_bullish_on_rising_series() {
        let strategy = IchimokuStrategy::new(small_config(), false);
        let rows = strategy.indicator.compute(&rising_bars(12));
        let (index, latest) = usable_rows(&rows).last().copied().unwrap();
        assert_eq!(strategy.assess_trend(&rows, index, &latest), Trend::Bullish);
    }

    #[test]
    fn test_trend_neutral_on_flat_series() {
        // A channel built from a constant series equals the price itself,
        // and the comparisons are strict, so the trend can never leave
        // NEUTRAL.
        let strategy = IchimokuStrategy::new(small_config(), false);
        let rows = strategy
            .indicator
            .compute(&bars(&[(10.0, 10.0, 10.0); 12]));
        let (index, latest) = usable_rows(&rows).last().copied().unwrap();
        assert_eq!(strategy.assess_trend(&rows, index, &latest), Trend::Neutral);
    }

    #[test]
    fn test_strict_mode_only_narrows_trend() {
        // Bullish recovery whose kumo still slopes downward: senkou A
        // below senkou B at the latest usable row.
        let candles = bars(&[
            (31.0, 29.0, 30.0),
            (31.0, 29.0, 30.0),
            (31.0, 29.0, 30.0),
            (31.0, 29.0, 30.0),
            (31.0, 29.0, 30.0),
            (30.0, 24.0, 25.0),
            (26.0, 22.0, 23.0),
            (24.0, 21.0, 22.0),
            (30.0, 23.0, 29.0),
            (36.0, 29.0, 35.0),
            (37.0, 34.0, 36.0),
            (38.0, 35.0, 37.0),
        ]);

        let relaxed = IchimokuStrategy::new(small_config(), false);
        let rows = relaxed.indicator.compute(&candles);
        let (index, latest) = usable_rows(&rows).last().copied().unwrap();
        assert_eq!(relaxed.assess_trend(&rows, index, &latest), Trend::Bullish);

        let strict = IchimokuStrategy::new(small_config(), true);
        assert_eq!(strict.assess_trend(&rows, index, &latest), Trend::Neutral);
    }

    #[test]
    fn test_lag_aligned_close_out_of_range_is_none() {
        let strategy = IchimokuStrategy::new(small_config(), false);
        let rows = strategy.indicator.compute(&rising_bars(12));
        assert_eq!(strategy.lag_aligned_close(&rows, 1), None);
        assert_eq!(strategy.lag_aligned_close(&rows, 5), Some(rows[3].close));
    }
}
