//! LLM-backed decision engine
//!
//! Fills a prompt template with per-timeframe candle JSON and asks the
//! model for a `{"action": ..., "reason": ...}` answer. Any upstream
//! failure (transport, API error, malformed response) degrades to a
//! WAIT decision carrying the error in its reason; the trading loop then
//! simply takes no action this cycle.

use crate::clients::GeminiClient;
use async_trait::async_trait;
use engine::data::{Candle, CandleChart};
use engine::decision::{Action, Decision};
use engine::error::EngineError;
use engine::strategy::DecisionEngine;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct LlmDecision {
    action: Action,
    reason: String,
}

pub struct LlmEngine {
    gemini: GeminiClient,
    /// Prompt template with `$<timeframe>_candle_data` placeholders.
    request_scheme: String,
}

impl LlmEngine {
    pub fn new(gemini: GeminiClient, request_scheme: String) -> Self {
        Self {
            gemini,
            request_scheme,
        }
    }

    fn build_prompt(&self, chart: &CandleChart) -> String {
        let mut prompt = self.request_scheme.clone();

        let placeholder_re = Regex::new(r"\$([0-9]+[mhdw])_candle_data").unwrap();
        let placeholders: Vec<String> = placeholder_re
            .captures_iter(&prompt)
            .map(|caps| caps[1].to_string())
            .collect();

        for timeframe in placeholders {
            let placeholder = format!("${timeframe}_candle_data");
            let replacement = match chart.candles(&timeframe) {
                Some(candles) => candles_to_json(candles),
                None => "No data available for this timeframe".to_string(),
            };
            prompt = prompt.replace(&placeholder, &replacement);
        }

        prompt
    }
}

#[async_trait]
impl DecisionEngine for LlmEngine {
    fn name(&self) -> &str {
        "llm"
    }

    async fn evaluate(&self, chart: &CandleChart) -> Result<Decision, EngineError> {
        let prompt = self.build_prompt(chart);
        debug!(market = chart.market(), "requesting trade decision from LLM");

        let decision = match self.gemini.generate_answer(&prompt).await {
            Ok(text) => match serde_json::from_str::<LlmDecision>(&text) {
                Ok(parsed) => Decision::new(
                    parsed.action,
                    parsed.reason,
                    chart.current_price(),
                    chart.market(),
                ),
                Err(err) => {
                    warn!("unparseable LLM response: {text}");
                    Decision::new(
                        Action::Wait,
                        format!("Error parsing LLM response: {err}"),
                        chart.current_price(),
                        chart.market(),
                    )
                }
            },
            Err(err) => {
                warn!("LLM request failed: {err:#}");
                Decision::new(
                    Action::Wait,
                    format!("Error in LLM service: {err}"),
                    chart.current_price(),
                    chart.market(),
                )
            }
        };

        Ok(decision)
    }
}

/// Serialize candles the way the prompt documents them: one object per
/// bar with time/open/close/high/low/volume.
fn candles_to_json(candles: &[Candle]) -> String {
    let converted: Vec<serde_json::Value> = candles
        .iter()
        .map(|c| {
            serde_json::json!({
                "time": c.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "open": c.open,
                "close": c.close,
                "high": c.high,
                "low": c.low,
                "volume": c.volume,
            })
        })
        .collect();

    serde_json::to_string(&converted).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_chart() -> CandleChart {
        let ts = NaiveDate::from_ymd_opt(2026, 8, 8)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut chart = CandleChart::new("KRW-BTC");
        chart.set_candles(
            "15m",
            vec![Candle::new(100.0, 110.0, 95.0, 105.0, 3.5, ts)],
        );
        chart.set_current_price(105.0);
        chart
    }

    fn engine_with_scheme(scheme: &str) -> LlmEngine {
        LlmEngine::new(
            GeminiClient::new("test-key".to_string(), "gemini-pro".to_string()),
            scheme.to_string(),
        )
    }

    #[test]
    fn test_prompt_substitutes_known_timeframes() {
        let engine = engine_with_scheme("candles: $15m_candle_data");
        let prompt = engine.build_prompt(&sample_chart());

        assert!(!prompt.contains("$15m_candle_data"));
        assert!(prompt.contains("\"close\":105.0"), "{prompt}");
        assert!(prompt.contains("2026-08-08T09:00:00"), "{prompt}");
    }

    #[test]
    fn test_prompt_marks_missing_timeframes() {
        let engine = engine_with_scheme("candles: $4h_candle_data");
        let prompt = engine.build_prompt(&sample_chart());

        assert_eq!(prompt, "candles: No data available for this timeframe");
    }

    #[test]
    fn test_llm_decision_parsing() {
        let parsed: LlmDecision =
            serde_json::from_str(r#"{"action": "BUY", "reason": "breakout"}"#).unwrap();
        assert_eq!(parsed.action, Action::Buy);
        assert_eq!(parsed.reason, "breakout");

        assert!(serde_json::from_str::<LlmDecision>(r#"{"action": "hold"}"#).is_err());
    }
}
