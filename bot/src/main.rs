use anyhow::Result;
use chrono::{Local, NaiveDateTime, NaiveTime, Timelike};
use engine::timeframe::parse_timeframe_minutes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

mod clients;
mod services;
mod state;

use crate::services::member_service;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting kumotrader bot...");

    let app_state = Arc::new(AppState::new().await?);
    tracing::info!("AppState initialized");

    member_service::get_or_create_member(
        app_state.db.as_ref(),
        app_state.config.member_id,
        &app_state.config.member_name,
        app_state.config.starting_balance,
    )
    .await?;

    let interval_minutes = entry_interval_minutes(&app_state.config.timeframe_config)?;
    tracing::info!(
        interval_minutes,
        market = %app_state.config.market,
        "scheduler ready, waiting for candle boundaries"
    );

    tokio::select! {
        result = run_trade_loop(app_state.clone(), interval_minutes) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
            Ok(())
        }
    }
}

/// Shortest configured timeframe, in minutes; evaluation ticks align to
/// its bar boundaries.
fn entry_interval_minutes(timeframes: &HashMap<String, usize>) -> Result<u32> {
    timeframes
        .keys()
        .map(|tf| parse_timeframe_minutes(tf).map_err(anyhow::Error::from))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .min()
        .ok_or_else(|| anyhow::anyhow!("TIMEFRAME_CONFIG must not be empty"))
}

/// One evaluation per boundary of the entry timeframe. Cycles run to
/// completion before the next sleep, so evaluations for the market never
/// overlap.
async fn run_trade_loop(state: Arc<AppState>, interval_minutes: u32) -> Result<()> {
    loop {
        let wait = time_until_next_boundary(Local::now().naive_local(), interval_minutes);
        tokio::time::sleep(wait).await;

        if let Err(err) = state
            .trade_service
            .execute_trade_cycle(state.config.member_id)
            .await
        {
            tracing::error!("trade cycle failed: {err:#}");
        }
    }
}

fn time_until_next_boundary(now: NaiveDateTime, interval_minutes: u32) -> Duration {
    let minutes_of_day = now.hour() * 60 + now.minute();
    let next = (minutes_of_day / interval_minutes + 1) * interval_minutes;
    let boundary =
        NaiveDateTime::new(now.date(), NaiveTime::MIN) + chrono::Duration::minutes(next as i64);
    (boundary - now).to_std().unwrap_or(Duration::from_secs(1))
}
