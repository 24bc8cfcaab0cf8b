//! users / links 表迁移
//!
//! 创建用户表和短链接表，并写入系统保留的 legacy 用户（id = 1），
//! 用于承接引入用户归属之前创建的链接。

use sea_orm_migration::prelude::*;

/// 系统保留的 legacy 用户 ID
pub const LEGACY_USER_ID: i64 = 1;
/// 系统保留的 legacy 用户名
pub const LEGACY_USERNAME: &str = "__legacy";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 users 表（ID 由外部身份提供方分配，不自增）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // JSON 数组，保持首次出现的顺序
                    .col(ColumnDef::new(Users::IpAddresses).text().not_null())
                    .col(ColumnDef::new(Users::RawObject).text().not_null())
                    .col(
                        ColumnDef::new(Users::IsBlocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 links 表
        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Links::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Links::Name).string_len(512).not_null())
                    .col(ColumnDef::new(Links::Destination).text().not_null())
                    .col(
                        ColumnDef::new(Links::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Links::CreatedById)
                            .big_integer()
                            .not_null()
                            .default(LEGACY_USER_ID),
                    )
                    .col(
                        ColumnDef::new(Links::CreatedFromIp)
                            .string_len(45)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Links::IsDisabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Links::IsBlocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_links_users_created_by_id")
                            .from(Links::Table, Links::CreatedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // name 唯一索引是并发创建时的最终保障
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_links_name")
                    .table(Links::Table)
                    .col(Links::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_links_created_by_id")
                    .table(Links::Table)
                    .col(Links::CreatedById)
                    .to_owned(),
            )
            .await?;

        // 写入 legacy 用户
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(Users::Table)
                    .columns([
                        Users::Id,
                        Users::Username,
                        Users::CreatedAt,
                        Users::UpdatedAt,
                        Users::IpAddresses,
                        Users::RawObject,
                        Users::IsBlocked,
                    ])
                    .values_panic([
                        LEGACY_USER_ID.into(),
                        LEGACY_USERNAME.into(),
                        Expr::current_timestamp().into(),
                        Expr::current_timestamp().into(),
                        "[]".into(),
                        r#"{"legacy":true}"#.into(),
                        false.into(),
                    ])
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("ix_links_created_by_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("ix_links_name").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    CreatedAt,
    UpdatedAt,
    IpAddresses,
    RawObject,
    IsBlocked,
}

#[derive(DeriveIden)]
enum Links {
    Table,
    Id,
    Name,
    Destination,
    CreatedAt,
    CreatedById,
    CreatedFromIp,
    IsDisabled,
    IsBlocked,
}
