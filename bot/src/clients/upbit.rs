//! Upbit market-data client
//!
//! Fetches completed minute candles per configured timeframe and builds
//! the per-cycle [`CandleChart`]. Upbit returns candles newest-first and
//! includes the bar that is still forming; one extra candle is requested
//! and the forming bar dropped so only completed bars reach the engine.

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDateTime, NaiveTime, Timelike};
use engine::data::{Candle, CandleChart};
use engine::timeframe::parse_timeframe_minutes;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration as StdDuration;
use tracing::debug;

/// Candle units the Upbit minutes endpoint actually serves.
const SUPPORTED_UNITS: [u32; 8] = [1, 3, 5, 10, 15, 30, 60, 240];

#[derive(Debug, Deserialize)]
struct UpbitCandle {
    candle_date_time_kst: String,
    opening_price: f64,
    high_price: f64,
    low_price: f64,
    trade_price: f64,
    candle_acc_trade_volume: f64,
}

#[derive(Debug, Clone)]
pub struct UpbitClient {
    market: String,
    /// Timeframe label -> number of candles to fetch per cycle.
    timeframes: HashMap<String, usize>,
    base_url: String,
    client: reqwest::Client,
}

impl UpbitClient {
    pub fn new(market: String, timeframes: HashMap<String, usize>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            market,
            timeframes,
            base_url: "https://api.upbit.com".to_string(),
            client,
        }
    }

    /// Fetch every configured timeframe concurrently and assemble the
    /// chart. The current price is the last close of the shortest
    /// timeframe's series.
    pub async fn fetch_candle_chart(&self) -> Result<CandleChart> {
        let mut chart = CandleChart::new(self.market.clone());

        let fetches = self.timeframes.iter().map(|(timeframe, count)| async move {
            let candles = self.fetch_candles(timeframe, *count).await?;
            Ok::<_, anyhow::Error>((timeframe.clone(), candles))
        });
        let series = futures::future::try_join_all(fetches).await?;

        let mut shortest: Option<(u32, &[Candle])> = None;
        for (timeframe, candles) in &series {
            let minutes = parse_timeframe_minutes(timeframe)?;
            if shortest.map(|(m, _)| minutes < m).unwrap_or(true) {
                shortest = Some((minutes, candles.as_slice()));
            }
        }
        if let Some((_, candles)) = shortest {
            if let Some(last) = candles.last() {
                chart.set_current_price(last.close);
            }
        }

        for (timeframe, candles) in series {
            debug!(%timeframe, count = candles.len(), "fetched candles");
            chart.set_candles(timeframe, candles);
        }

        Ok(chart)
    }

    async fn fetch_candles(&self, timeframe: &str, count: usize) -> Result<Vec<Candle>> {
        let unit = parse_timeframe_minutes(timeframe)?;
        if !SUPPORTED_UNITS.contains(&unit) {
            bail!("unsupported Upbit candle unit for timeframe {timeframe}: {unit} minutes");
        }

        let url = format!("{}/v1/candles/minutes/{}", self.base_url, unit);
        // One extra candle to account for the bar still in progress.
        let count_param = (count + 1).to_string();
        let raw: Vec<UpbitCandle> = self
            .client
            .get(&url)
            .query(&[
                ("market", self.market.as_str()),
                ("count", count_param.as_str()),
            ])
            .header("accept", "application/json")
            .send()
            .await
            .with_context(|| format!("candle request failed for {timeframe}"))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("malformed candle response for {timeframe}"))?;

        let mut candles = raw
            .into_iter()
            .map(|c| {
                let timestamp =
                    NaiveDateTime::parse_from_str(&c.candle_date_time_kst, "%Y-%m-%dT%H:%M:%S")
                        .with_context(|| {
                            format!("bad candle timestamp: {}", c.candle_date_time_kst)
                        })?;
                Ok(Candle::new(
                    c.opening_price,
                    c.high_price,
                    c.low_price,
                    c.trade_price,
                    c.candle_acc_trade_volume,
                    timestamp,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let completed = completed_candle_time(Local::now().naive_local(), unit);
        candles = drop_forming_candle(candles, completed);
        Ok(candles)
    }
}

/// Start time of the most recent fully completed candle boundary.
fn completed_candle_time(now: NaiveDateTime, unit_minutes: u32) -> NaiveDateTime {
    let minutes_of_day = now.hour() * 60 + now.minute();
    let aligned = minutes_of_day - minutes_of_day % unit_minutes;
    NaiveDateTime::new(now.date(), NaiveTime::MIN) + Duration::minutes(aligned as i64)
}

/// Drop the in-progress bar from a newest-first series and return the
/// remainder oldest-first. A newest bar at or past the completed boundary
/// is still forming; otherwise the series is already all-complete and the
/// oldest surplus bar goes instead.
fn drop_forming_candle(mut candles: Vec<Candle>, completed: NaiveDateTime) -> Vec<Candle> {
    if candles.is_empty() {
        return candles;
    }

    if candles[0].timestamp >= completed {
        candles.remove(0);
    } else {
        candles.pop();
    }

    candles.reverse();
    candles
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 8)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn candle(timestamp: NaiveDateTime) -> Candle {
        Candle::new(1.0, 2.0, 0.5, 1.5, 10.0, timestamp)
    }

    #[test]
    fn test_completed_candle_time_aligns_to_unit() {
        let now = ts(10, 37).with_second(42).unwrap();
        assert_eq!(completed_candle_time(now, 15), ts(10, 30));
        assert_eq!(completed_candle_time(now, 60), ts(10, 0));
        assert_eq!(completed_candle_time(now, 240), ts(8, 0));
    }

    #[test]
    fn test_forming_candle_is_dropped() {
        // Newest-first: the 10:30 bar is still forming at 10:37.
        let candles = vec![candle(ts(10, 30)), candle(ts(10, 15)), candle(ts(10, 0))];
        let result = drop_forming_candle(candles, ts(10, 30));

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].timestamp, ts(10, 0));
        assert_eq!(result[1].timestamp, ts(10, 15));
    }

    #[test]
    fn test_oldest_surplus_dropped_when_all_complete() {
        let candles = vec![candle(ts(10, 15)), candle(ts(10, 0)), candle(ts(9, 45))];
        let result = drop_forming_candle(candles, ts(10, 30));

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].timestamp, ts(10, 0));
        assert_eq!(result[1].timestamp, ts(10, 15));
    }

    #[test]
    fn test_empty_series_stays_empty() {
        assert!(drop_forming_candle(Vec::new(), ts(10, 30)).is_empty());
    }
}
