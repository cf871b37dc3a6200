//! 访问日志表迁移
//!
//! 创建 visits 表用于存储页面访问事件（追加写，不做更新/删除），包括：
//! - 页面路径与来源 (page, referrer)
//! - 服务端识别的 device / browser / os
//! - 会话标识与停留时长 (session_id, duration)
//! - Web Vitals 性能指标 (lcp, fcp, cls, ttfb)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 visits 表
        manager
            .create_table(
                Table::create()
                    .table(Visits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Visits::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Visits::Page).string_len(500).not_null())
                    .col(
                        ColumnDef::new(Visits::Referrer)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Visits::UserAgent)
                            .string_len(500)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Visits::Language)
                            .string_len(35)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Visits::ScreenWidth).integer().null())
                    .col(ColumnDef::new(Visits::ScreenHeight).integer().null())
                    .col(ColumnDef::new(Visits::Device).string_len(20).not_null())
                    .col(ColumnDef::new(Visits::Browser).string_len(20).not_null())
                    .col(ColumnDef::new(Visits::Os).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Visits::SessionId)
                            .string_len(64)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Visits::Duration)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Visits::Lcp).double().null())
                    .col(ColumnDef::new(Visits::Fcp).double().null())
                    .col(ColumnDef::new(Visits::Cls).double().null())
                    .col(ColumnDef::new(Visits::Ttfb).double().null())
                    .col(
                        ColumnDef::new(Visits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 created_at 索引（用于时间窗口查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visits_created_at")
                    .table(Visits::Table)
                    .col(Visits::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 创建 session_id 索引（用于会话统计）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visits_session_id")
                    .table(Visits::Table)
                    .col(Visits::SessionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_visits_session_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_visits_created_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Visits::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Visits {
    Table,
    Id,
    Page,
    Referrer,
    UserAgent,
    Language,
    ScreenWidth,
    ScreenHeight,
    Device,
    Browser,
    Os,
    SessionId,
    Duration,
    Lcp,
    Fcp,
    Cls,
    Ttfb,
    CreatedAt,
}
