//! Trade orchestration
//!
//! One call per scheduler tick: fetch the chart, ask the decision engine,
//! persist the decision to the audit log, then reconcile the decision
//! against the member's held position. Evaluations for the same market
//! are serialized by the scheduler awaiting each cycle to completion.

use crate::clients::UpbitClient;
use crate::services::ActionService;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use engine::decision::{Action, Decision};
use engine::strategy::DecisionEngine;
use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use shared::entity::{coins, decision_logs, members};
use std::sync::Arc;
use tracing::{info, warn};

pub struct TradeService {
    upbit: UpbitClient,
    decision_engine: Arc<dyn DecisionEngine>,
    action_service: ActionService,
    db: Arc<DatabaseConnection>,
}

impl TradeService {
    pub fn new(
        upbit: UpbitClient,
        decision_engine: Arc<dyn DecisionEngine>,
        action_service: ActionService,
        db: Arc<DatabaseConnection>,
    ) -> Self {
        Self {
            upbit,
            decision_engine,
            action_service,
            db,
        }
    }

    pub async fn execute_trade_cycle(&self, member_id: i64) -> Result<()> {
        let chart = self
            .upbit
            .fetch_candle_chart()
            .await
            .context("failed to fetch candle chart")?;
        if chart.current_price() <= 0.0 {
            warn!("no current price in candle chart, skipping cycle");
            return Ok(());
        }

        let decision = self
            .decision_engine
            .evaluate(&chart)
            .await
            .context("decision engine rejected the chart")?;
        info!(
            engine = self.decision_engine.name(),
            action = %decision.action,
            "decision: {}",
            decision.reason
        );

        log_decision(self.db.as_ref(), &decision).await?;

        let member = members::Entity::find_by_id(member_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| anyhow!("member {member_id} not found"))?;
        let coin = coins::Entity::find()
            .filter(coins::Column::MemberId.eq(member_id))
            .one(self.db.as_ref())
            .await?;

        match decision.action {
            Action::Buy => {
                if coin.is_none() {
                    self.action_service
                        .buy_coin(self.db.as_ref(), &member, &decision)
                        .await?;
                } else {
                    info!("buy signal but already holding, no action");
                }
            }
            Action::Sell => {
                if let Some(coin) = coin {
                    self.action_service
                        .sell_coin(self.db.as_ref(), coin, &member, &decision)
                        .await?;
                } else {
                    info!("sell signal but nothing held, no action");
                }
            }
            Action::Neutral | Action::Wait => {
                info!(action = %decision.action, "no position change this cycle");
            }
        }

        Ok(())
    }
}

async fn log_decision(db: &DatabaseConnection, decision: &Decision) -> Result<()> {
    let row = decision_logs::ActiveModel {
        action: ActiveValue::Set(decision.action.as_str().to_string()),
        reason: ActiveValue::Set(decision.reason.clone()),
        price: ActiveValue::Set(decision.current_price as i64),
        market: ActiveValue::Set(decision.market.clone()),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    };
    decision_logs::Entity::insert(row).exec(db).await?;
    Ok(())
}
