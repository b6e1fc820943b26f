//! Ichimoku Kinko Hyo over an ordered bar series.
//!
//! Produces one derived row per input bar:
//! - tenkan-sen: (max high + min low) / 2 over the trailing tenkan window
//! - kijun-sen: same midpoint over the trailing kijun window
//! - senkou span A: (tenkan + kijun) / 2 shifted forward by the senkou
//!   offset (the value at bar `i` was computed at `i - offset`)
//! - senkou span B: the senkou-b window midpoint, shifted the same way
//! - kumo top/bottom: max/min of the two spans
//! - chikou span: close shifted backward by the chikou offset
//!   (the value at bar `i` is the close of bar `i + offset`)
//!
//! Every derived field is `Option<f64>`: `None` until enough history
//! exists to fill the window or shift, instead of a floating NaN
//! sentinel. That makes the usable-row filter an explicit boolean rather
//! than an implicit numeric property.

use crate::data::Candle;

/// Window lengths and shift offsets, in bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IchimokuConfig {
    pub tenkan_period: usize,
    pub kijun_period: usize,
    pub senkou_b_period: usize,
    pub chikou_offset: usize,
    pub senkou_offset: usize,
}

impl Default for IchimokuConfig {
    /// Conventional 9/26/52 settings with 26-bar shifts.
    fn default() -> Self {
        Self {
            tenkan_period: 9,
            kijun_period: 26,
            senkou_b_period: 52,
            chikou_offset: 26,
            senkou_offset: 26,
        }
    }
}

/// Derived indicator values for one bar. Fields are `None` while the
/// backing window or shift cannot be filled from the available history.
#[derive(Debug, Clone, PartialEq)]
pub struct IchimokuRow {
    pub tenkan: Option<f64>,
    pub kijun: Option<f64>,
    pub senkou_a: Option<f64>,
    pub senkou_b: Option<f64>,
    pub kumo_top: Option<f64>,
    pub kumo_bottom: Option<f64>,
    pub chikou: Option<f64>,
    /// The bar's own close, kept for lag-aligned comparisons.
    pub close: f64,
}

impl IchimokuRow {
    /// A row feeds decision logic only when every required field is
    /// defined.
    pub fn as_usable(&self) -> Option<UsableRow> {
        Some(UsableRow {
            tenkan: self.tenkan?,
            kijun: self.kijun?,
            senkou_a: self.senkou_a?,
            senkou_b: self.senkou_b?,
            kumo_top: self.kumo_top?,
            kumo_bottom: self.kumo_bottom?,
            chikou: self.chikou?,
            close: self.close,
        })
    }
}

/// An [`IchimokuRow`] with every field proven defined, so decision logic
/// never touches an `Option`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsableRow {
    pub tenkan: f64,
    pub kijun: f64,
    pub senkou_a: f64,
    pub senkou_b: f64,
    pub kumo_top: f64,
    pub kumo_bottom: f64,
    pub chikou: f64,
    pub close: f64,
}

/// Batch Ichimoku calculator.
#[derive(Debug, Clone, Copy)]
pub struct Ichimoku {
    config: IchimokuConfig,
}

impl Ichimoku {
    pub fn new(config: IchimokuConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IchimokuConfig {
        &self.config
    }

    /// Compute one row per bar. The output length always equals the input
    /// length; short histories simply yield rows with undefined fields.
    pub fn compute(&self, candles: &[Candle]) -> Vec<IchimokuRow> {
        let cfg = &self.config;
        let mut rows = Vec::with_capacity(candles.len());

        for i in 0..candles.len() {
            let tenkan = window_midpoint(candles, i, cfg.tenkan_period);
            let kijun = window_midpoint(candles, i, cfg.kijun_period);

            // Senkou spans are plotted forward: the value shown at bar i
            // originates at bar i - senkou_offset.
            let (senkou_a, senkou_b) = match i.checked_sub(cfg.senkou_offset) {
                Some(src) => {
                    let a = match (
                        window_midpoint(candles, src, cfg.tenkan_period),
                        window_midpoint(candles, src, cfg.kijun_period),
                    ) {
                        (Some(t), Some(k)) => Some((t + k) / 2.0),
                        _ => None,
                    };
                    let b = window_midpoint(candles, src, cfg.senkou_b_period);
                    (a, b)
                }
                None => (None, None),
            };

            let (kumo_top, kumo_bottom) = match (senkou_a, senkou_b) {
                (Some(a), Some(b)) => (Some(a.max(b)), Some(a.min(b))),
                _ => (None, None),
            };

            // Chikou is plotted backward: the value at bar i is the close
            // of bar i + chikou_offset, so the most recent offset bars
            // never get one.
            let chikou = candles.get(i + cfg.chikou_offset).map(|c| c.close);

            rows.push(IchimokuRow {
                tenkan,
                kijun,
                senkou_a,
                senkou_b,
                kumo_top,
                kumo_bottom,
                chikou,
                close: candles[i].close,
            });
        }

        rows
    }
}

/// (max high + min low) / 2 over the window of `period` bars ending at
/// `end` inclusive; `None` while fewer than `period` bars are available.
fn window_midpoint(candles: &[Candle], end: usize, period: usize) -> Option<f64> {
    if period == 0 || end + 1 < period || end >= candles.len() {
        return None;
    }

    let window = &candles[end + 1 - period..=end];
    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    for candle in window {
        high = high.max(candle.high);
        low = low.min(candle.low);
    }

    Some((high + low) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_window_midpoint_fills_after_period() {
        let candles = bars(&[(10.0, 8.0, 9.0), (12.0, 9.0, 11.0), (11.0, 7.0, 10.0)]);
        assert_eq!(window_midpoint(&candles, 0, 2), None);
        assert_eq!(window_midpoint(&candles, 1, 2), Some((12.0 + 8.0) / 2.0));
        assert_eq!(window_midpoint(&candles, 2, 3), Some((12.0 + 7.0) / 2.0));
    }

    #[test]
    fn test_rows_same_length_as_input() {
        let candles = bars(&[(10.0, 8.0, 9.0); 6]);
        let rows = Ichimoku::new(small_config()).compute(&candles);
        assert_eq!(rows.len(), candles.len());
    }

    #[test]
    fn test_senkou_spans_are_shifted_forward() {
        // Ramp so each window midpoint is distinct.
        let values: Vec<(f64, f64, f64)> = (0..10)
            .map(|i| {
                let c = 10.0 + i as f64;
                (c + 1.0, c - 1.0, c)
            })
            .collect();
        let candles = bars(&values);
        let rows = Ichimoku::new(small_config()).compute(&candles);

        // senkou_a at i equals the tenkan/kijun midline two bars earlier.
        let i = 6;
        let src = i - 2;
        let expected_a =
            (rows[src].tenkan.unwrap() + rows[src].kijun.unwrap()) / 2.0;
        assert_eq!(rows[i].senkou_a, Some(expected_a));

        // senkou_b at i is the 4-bar window midpoint ending two bars
        // earlier: highs/lows of bars 1..=4.
        let expected_b = ((values[4].0) + (values[1].1)) / 2.0;
        assert_eq!(rows[i].senkou_b, Some(expected_b));
    }

    #[test]
    fn test_chikou_is_shifted_backward() {
        let values: Vec<(f64, f64, f64)> = (0..8)
            .map(|i| {
                let c = 10.0 + i as f64;
                (c + 1.0, c - 1.0, c)
            })
            .collect();
        let candles = bars(&values);
        let rows = Ichimoku::new(small_config()).compute(&candles);

        assert_eq!(rows[3].chikou, Some(values[5].2));
        // The most recent chikou_offset bars never get a chikou value.
        assert_eq!(rows[6].chikou, None);
        assert_eq!(rows[7].chikou, None);
    }

    #[test]
    fn test_usable_row_range() {
        let values: Vec<(f64, f64, f64)> = (0..12)
            .map(|i| {
                let c = 10.0 + i as f64;
                (c + 1.0, c - 1.0, c)
            })
            .collect();
        let candles = bars(&values);
        let rows = Ichimoku::new(small_config()).compute(&candles);

        // senkou_b needs a full 4-bar window at i - 2, so rows before
        // index 5 are unusable; chikou dies for the last two rows.
        let usable: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.as_usable().is_some())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(usable, vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_short_history_yields_no_usable_rows() {
        let candles = bars(&[(10.0, 8.0, 9.0); 6]);
        let rows = Ichimoku::new(IchimokuConfig::default()).compute(&candles);
        assert!(rows.iter().all(|r| r.as_usable().is_none()));
    }

    #[test]
    fn test_kumo_bounds_order_spans() {
        let values: Vec<(f64, f64, f64)> = (0..12)
            .map(|i| {
                let c = 10.0 + i as f64;
                (c + 1.0, c - 1.0, c)
            })
            .collect();
        let candles = bars(&values);
        let rows = Ichimoku::new(small_config()).compute(&candles);
        for row in rows.iter().filter_map(|r| r.as_usable()) {
            assert_eq!(row.kumo_top, row.senkou_a.max(row.senkou_b));
            assert_eq!(row.kumo_bottom, row.senkou_a.min(row.senkou_b));
            assert!(row.kumo_top >= row.kumo_bottom);
        }
    }
}
