//! Migration: Create notification_log table with delivery checks and job cascade.

use sea_orm_migration::prelude::*;

use domain::{
    DeliveryStatus, NotificationType, DEFAULT_RETRY_COUNT, DELIVERY_STATUS_PENDING,
    EMAIL_MAX_LENGTH, STATUS_MAX_LENGTH,
};

use super::{check_in, check_non_negative, drop_constraint};

const TABLE: &str = "notification_log";
const CHK_TYPE: &str = "chk_notification_log_type";
const CHK_STATUS: &str = "chk_notification_log_status";
const CHK_RETRY_COUNT: &str = "chk_notification_log_retry_count";
const FK_JOB: &str = "fk_notification_log_job";
const IDX_JOB_ID: &str = "idx_notifications_job_id";
const IDX_STATUS: &str = "idx_notifications_status";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationLog::NotificationId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(NotificationLog::JobId).uuid().not_null())
                    .col(
                        ColumnDef::new(NotificationLog::NotificationType)
                            .string_len(STATUS_MAX_LENGTH)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationLog::RecipientEmail)
                            .string_len(EMAIL_MAX_LENGTH)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationLog::DeliveryStatus)
                            .string_len(STATUS_MAX_LENGTH)
                            .not_null()
                            .default(DELIVERY_STATUS_PENDING),
                    )
                    .col(
                        ColumnDef::new(NotificationLog::RetryCount)
                            .integer()
                            .not_null()
                            .default(DEFAULT_RETRY_COUNT),
                    )
                    .col(ColumnDef::new(NotificationLog::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(NotificationLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(NotificationLog::SentAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        let types: Vec<&str> = NotificationType::ALL.iter().map(|t| t.as_str()).collect();
        let statuses: Vec<&str> = DeliveryStatus::ALL.iter().map(|s| s.as_str()).collect();
        let db = manager.get_connection();
        db.execute_unprepared(&check_in(TABLE, CHK_TYPE, "notification_type", &types))
            .await?;
        db.execute_unprepared(&check_in(TABLE, CHK_STATUS, "delivery_status", &statuses))
            .await?;
        db.execute_unprepared(&check_non_negative(TABLE, CHK_RETRY_COUNT, "retry_count"))
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_JOB_ID)
                    .table(NotificationLog::Table)
                    .col(NotificationLog::JobId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_STATUS)
                    .table(NotificationLog::Table)
                    .col(NotificationLog::DeliveryStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_JOB)
                    .from(NotificationLog::Table, NotificationLog::JobId)
                    .to(VideoJobs::Table, VideoJobs::JobId)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::NoAction)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_JOB)
                    .table(NotificationLog::Table)
                    .to_owned(),
            )
            .await?;

        for name in [IDX_STATUS, IDX_JOB_ID] {
            manager
                .drop_index(Index::drop().name(name).table(NotificationLog::Table).to_owned())
                .await?;
        }

        let db = manager.get_connection();
        for constraint in [CHK_RETRY_COUNT, CHK_STATUS, CHK_TYPE] {
            db.execute_unprepared(&drop_constraint(TABLE, constraint))
                .await?;
        }

        manager
            .drop_table(Table::drop().table(NotificationLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum NotificationLog {
    Table,
    NotificationId,
    JobId,
    NotificationType,
    RecipientEmail,
    DeliveryStatus,
    RetryCount,
    ErrorMessage,
    CreatedAt,
    SentAt,
}

#[derive(Iden)]
enum VideoJobs {
    Table,
    JobId,
}
