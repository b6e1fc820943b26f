//! Buy/sell execution with simulated fills and balance accounting
//!
//! Fills are simulated at the decision's reference price with a fixed
//! 0.9995 fee multiplier on both sides. Sizing follows the DCA rule: each
//! buy spends a fixed fraction of the current balance, floored to whole
//! KRW.

use anyhow::{anyhow, Result};
use chrono::Utc;
use engine::decision::Decision;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, ModelTrait};
use shared::entity::{actions, coins, members};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ActionService {
    /// Fraction of the balance spent per buy.
    dca: Decimal,
    /// Fee multiplier applied to fills.
    fee: Decimal,
}

impl ActionService {
    pub fn new(dca_percent: u32) -> Self {
        Self {
            dca: Decimal::from(dca_percent) / Decimal::from(100),
            fee: Decimal::new(9995, 4),
        }
    }

    /// KRW to spend and the coin amount received for a buy at
    /// `current_price`. `None` when the balance or price leaves nothing
    /// to buy.
    fn buy_quantities(&self, balance: i64, current_price: i64) -> Option<(i64, Decimal)> {
        if balance <= 0 || current_price <= 0 {
            return None;
        }

        let spend = (Decimal::from(balance) * self.dca).floor();
        if spend <= Decimal::ZERO {
            return None;
        }

        let amount = spend / Decimal::from(current_price) * self.fee;
        Some((spend.to_i64()?, amount))
    }

    /// KRW received for selling `amount` at `current_price`, floored to
    /// whole KRW after the fee.
    fn sell_proceeds(&self, amount: Decimal, current_price: i64) -> i64 {
        (amount * Decimal::from(current_price) * self.fee)
            .floor()
            .to_i64()
            .unwrap_or(0)
    }

    pub async fn buy_coin(
        &self,
        db: &DatabaseConnection,
        member: &members::Model,
        decision: &Decision,
    ) -> Result<()> {
        let current_price = decision.current_price as i64;
        let (spend, amount) = self
            .buy_quantities(member.balance, current_price)
            .ok_or_else(|| {
                anyhow!(
                    "nothing to buy: balance {} at price {}",
                    member.balance,
                    current_price
                )
            })?;

        let action = actions::ActiveModel {
            action: ActiveValue::Set("buy".to_string()),
            market: ActiveValue::Set(decision.market.clone()),
            amount: ActiveValue::Set(amount),
            entry_price: ActiveValue::Set(current_price),
            total_price: ActiveValue::Set(spend),
            created_at: ActiveValue::Set(Utc::now()),
            member_id: ActiveValue::Set(member.id),
            ..Default::default()
        };
        actions::Entity::insert(action).exec(db).await?;

        let coin = coins::ActiveModel {
            market: ActiveValue::Set(decision.market.clone()),
            amount: ActiveValue::Set(amount),
            entry_price: ActiveValue::Set(current_price),
            total_price: ActiveValue::Set(spend),
            created_at: ActiveValue::Set(Utc::now()),
            member_id: ActiveValue::Set(member.id),
            ..Default::default()
        };
        coins::Entity::insert(coin).exec(db).await?;

        let new_balance = member.balance - spend;
        let member_update = members::ActiveModel {
            id: ActiveValue::Unchanged(member.id),
            balance: ActiveValue::Set(new_balance),
            ..Default::default()
        };
        members::Entity::update(member_update).exec(db).await?;

        info!(
            market = %decision.market,
            spend, %amount, new_balance, "bought coin"
        );
        Ok(())
    }

    pub async fn sell_coin(
        &self,
        db: &DatabaseConnection,
        coin: coins::Model,
        member: &members::Model,
        decision: &Decision,
    ) -> Result<()> {
        let current_price = decision.current_price as i64;
        let proceeds = self.sell_proceeds(coin.amount, current_price);

        let action = actions::ActiveModel {
            action: ActiveValue::Set("sell".to_string()),
            market: ActiveValue::Set(coin.market.clone()),
            amount: ActiveValue::Set(coin.amount),
            entry_price: ActiveValue::Set(current_price),
            total_price: ActiveValue::Set(proceeds),
            created_at: ActiveValue::Set(Utc::now()),
            member_id: ActiveValue::Set(member.id),
            ..Default::default()
        };
        actions::Entity::insert(action).exec(db).await?;

        let market = coin.market.clone();
        coin.delete(db).await?;

        let new_balance = member.balance + proceeds;
        let member_update = members::ActiveModel {
            id: ActiveValue::Unchanged(member.id),
            balance: ActiveValue::Set(new_balance),
            ..Default::default()
        };
        members::Entity::update(member_update).exec(db).await?;

        info!(market = %market, proceeds, new_balance, "sold coin");
        Ok(())
    }
}
