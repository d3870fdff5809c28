//! Initial hearts ledger schema.
//!
//! Built with the schema builder so the same migration runs on Postgres and
//! on the SQLite databases used by the test suites.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Wallets: one row per user, the only mutable ledger aggregate
        manager
            .create_table(
                Table::create()
                    .table(HeartWallets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(HeartWallets::UserId).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(HeartWallets::Balance)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(HeartWallets::Balance).gte(0)),
                    )
                    .col(ColumnDef::new(HeartWallets::Version).big_integer().not_null().default(0))
                    .col(timestamp_col(HeartWallets::CreatedAt))
                    .col(timestamp_col(HeartWallets::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Ledger: append-only
        manager
            .create_table(
                Table::create()
                    .table(HeartTransactions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(HeartTransactions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(HeartTransactions::UserId).uuid().not_null())
                    .col(ColumnDef::new(HeartTransactions::OrderId).uuid().null())
                    .col(ColumnDef::new(HeartTransactions::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(HeartTransactions::BalanceAfter)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(HeartTransactions::BalanceAfter).gte(0)),
                    )
                    .col(ColumnDef::new(HeartTransactions::WalletVersion).big_integer().not_null())
                    .col(ColumnDef::new(HeartTransactions::TransactionType).string_len(32).not_null())
                    .col(ColumnDef::new(HeartTransactions::Description).text().null())
                    .col(ColumnDef::new(HeartTransactions::Metadata).text().null())
                    .col(timestamp_col(HeartTransactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_heart_transactions_wallet")
                            .from(HeartTransactions::Table, HeartTransactions::UserId)
                            .to(HeartWallets::Table, HeartWallets::UserId)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One entry per wallet version gives each user's ledger a total order
        manager
            .create_index(
                Index::create()
                    .name("uq_heart_transactions_user_version")
                    .table(HeartTransactions::Table)
                    .col(HeartTransactions::UserId)
                    .col(HeartTransactions::WalletVersion)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_heart_transactions_order")
                    .table(HeartTransactions::Table)
                    .col(HeartTransactions::OrderId)
                    .to_owned(),
            )
            .await?;

        // Catalog
        manager
            .create_table(
                Table::create()
                    .table(HeartProducts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HeartProducts::Code)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HeartProducts::Name).string_len(100).not_null())
                    .col(ColumnDef::new(HeartProducts::Description).text().null())
                    .col(ColumnDef::new(HeartProducts::Hearts).big_integer().not_null())
                    .col(
                        ColumnDef::new(HeartProducts::BonusHearts)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(HeartProducts::Price).big_integer().not_null())
                    .col(ColumnDef::new(HeartProducts::SortOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(HeartProducts::IsActive).boolean().not_null().default(true))
                    .col(timestamp_col(HeartProducts::CreatedAt))
                    .col(timestamp_col(HeartProducts::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Orders: snapshotted pricing, no live product reference
        manager
            .create_table(
                Table::create()
                    .table(BillingOrders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BillingOrders::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BillingOrders::UserId).uuid().not_null())
                    .col(ColumnDef::new(BillingOrders::ProductCode).string_len(32).not_null())
                    .col(ColumnDef::new(BillingOrders::Quantity).integer().not_null())
                    .col(ColumnDef::new(BillingOrders::PricePerUnit).big_integer().not_null())
                    .col(ColumnDef::new(BillingOrders::HeartsPerUnit).big_integer().not_null())
                    .col(
                        ColumnDef::new(BillingOrders::BonusHeartsPerUnit)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BillingOrders::TotalAmount).big_integer().not_null())
                    .col(ColumnDef::new(BillingOrders::Status).string_len(16).not_null())
                    .col(ColumnDef::new(BillingOrders::PaymentKey).string_len(200).null())
                    .col(ColumnDef::new(BillingOrders::PgProvider).string_len(50).null())
                    .col(timestamp_col(BillingOrders::RequestedAt))
                    .col(ColumnDef::new(BillingOrders::PaidAt).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(BillingOrders::CanceledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(BillingOrders::Metadata).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_billing_orders_user_requested")
                    .table(BillingOrders::Table)
                    .col(BillingOrders::UserId)
                    .col(BillingOrders::RequestedAt)
                    .to_owned(),
            )
            .await?;

        // Admin audit trail, written outside the ledger unit
        manager
            .create_table(
                Table::create()
                    .table(AdminAuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AdminAuditLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AdminAuditLogs::ActorId).uuid().not_null())
                    .col(ColumnDef::new(AdminAuditLogs::Action).string_len(64).not_null())
                    .col(ColumnDef::new(AdminAuditLogs::TargetUserId).uuid().not_null())
                    .col(ColumnDef::new(AdminAuditLogs::Delta).big_integer().not_null())
                    .col(ColumnDef::new(AdminAuditLogs::Detail).text().not_null())
                    .col(ColumnDef::new(AdminAuditLogs::Outcome).string_len(16).not_null())
                    .col(ColumnDef::new(AdminAuditLogs::TransactionId).uuid().null())
                    .col(timestamp_col(AdminAuditLogs::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_audit_logs_target")
                    .table(AdminAuditLogs::Table)
                    .col(AdminAuditLogs::TargetUserId)
                    .col(AdminAuditLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminAuditLogs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BillingOrders::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HeartProducts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HeartTransactions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HeartWallets::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn timestamp_col<T: Iden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum HeartWallets {
    Table,
    UserId,
    Balance,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HeartTransactions {
    Table,
    Id,
    UserId,
    OrderId,
    Amount,
    BalanceAfter,
    WalletVersion,
    TransactionType,
    Description,
    Metadata,
    CreatedAt,
}

#[derive(DeriveIden)]
enum HeartProducts {
    Table,
    Code,
    Name,
    Description,
    Hearts,
    BonusHearts,
    Price,
    SortOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BillingOrders {
    Table,
    Id,
    UserId,
    ProductCode,
    Quantity,
    PricePerUnit,
    HeartsPerUnit,
    BonusHeartsPerUnit,
    TotalAmount,
    Status,
    PaymentKey,
    PgProvider,
    RequestedAt,
    PaidAt,
    CanceledAt,
    Metadata,
}

#[derive(DeriveIden)]
enum AdminAuditLogs {
    Table,
    Id,
    ActorId,
    Action,
    TargetUserId,
    Delta,
    Detail,
    Outcome,
    TransactionId,
    CreatedAt,
}
