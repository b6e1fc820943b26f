//! Member bootstrap

use anyhow::Result;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};
use shared::entity::members;
use tracing::info;

/// Fetch the trading member, seeding it with the starting balance on
/// first run.
pub async fn get_or_create_member(
    db: &DatabaseConnection,
    member_id: i64,
    name: &str,
    starting_balance: i64,
) -> Result<members::Model> {
    if let Some(member) = members::Entity::find_by_id(member_id).one(db).await? {
        return Ok(member);
    }

    let member = members::ActiveModel {
        id: ActiveValue::Set(member_id),
        name: ActiveValue::Set(name.to_string()),
        balance: ActiveValue::Set(starting_balance),
    };
    members::Entity::insert(member).exec(db).await?;
    info!(member_id, starting_balance, "created trading member");

    members::Entity::find_by_id(member_id)
        .one(db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("member {member_id} vanished after insert"))
}
