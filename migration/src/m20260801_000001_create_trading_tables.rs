use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Members: one row per trading account, balance in KRW
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Members::Id).big_integer().primary_key())
                    .col(ColumnDef::new(Members::Name).string_len(32).not_null().unique_key())
                    .col(ColumnDef::new(Members::Balance).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Coins: the held position, at most one per member
        manager
            .create_table(
                Table::create()
                    .table(Coins::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Coins::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(Coins::Market).string_len(20).not_null())
                    .col(ColumnDef::new(Coins::Amount).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(Coins::EntryPrice).big_integer().not_null())
                    .col(ColumnDef::new(Coins::TotalPrice).big_integer().not_null())
                    .col(ColumnDef::new(Coins::CreatedAt).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Coins::MemberId).big_integer().not_null().unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coins_member")
                            .from(Coins::Table, Coins::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Actions: append-only trade log
        manager
            .create_table(
                Table::create()
                    .table(Actions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Actions::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(Actions::Action).string_len(10).not_null()) // "buy" or "sell"
                    .col(ColumnDef::new(Actions::Market).string_len(20).not_null())
                    .col(ColumnDef::new(Actions::Amount).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(Actions::EntryPrice).big_integer().not_null())
                    .col(ColumnDef::new(Actions::TotalPrice).big_integer().not_null())
                    .col(ColumnDef::new(Actions::CreatedAt).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Actions::MemberId).big_integer().not_null())
                    .index(
                        Index::create()
                            .name("idx_actions_member")
                            .table(Actions::Table)
                            .col(Actions::MemberId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actions_member")
                            .from(Actions::Table, Actions::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Decision logs: append-only audit of every evaluation
        manager
            .create_table(
                Table::create()
                    .table(DecisionLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DecisionLogs::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(DecisionLogs::Action).string_len(10).not_null())
                    .col(ColumnDef::new(DecisionLogs::Reason).text().not_null())
                    .col(ColumnDef::new(DecisionLogs::Price).big_integer().not_null())
                    .col(ColumnDef::new(DecisionLogs::Market).string_len(20).not_null())
                    .col(ColumnDef::new(DecisionLogs::CreatedAt).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DecisionLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Actions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Coins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
    Name,
    Balance,
}

#[derive(DeriveIden)]
enum Coins {
    Table,
    Id,
    Market,
    Amount,
    EntryPrice,
    TotalPrice,
    CreatedAt,
    MemberId,
}

#[derive(DeriveIden)]
enum Actions {
    Table,
    Id,
    Action,
    Market,
    Amount,
    EntryPrice,
    TotalPrice,
    CreatedAt,
    MemberId,
}

#[derive(DeriveIden)]
enum DecisionLogs {
    Table,
    Id,
    Action,
    Reason,
    Price,
    Market,
    CreatedAt,
}
