//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

/// Append-only audit log: one row per evaluated decision, whichever
/// engine produced it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "decision_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    /// "BUY", "SELL", "NEUTRAL" or "WAIT".
    pub action: String,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    /// Reference price at evaluation time (KRW).
    pub price: i64,
    pub market: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
