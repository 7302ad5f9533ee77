//! Migration: Create video_jobs table with status check and user cascade.

use sea_orm_migration::prelude::*;

use domain::{JobStatus, FILENAME_MAX_LENGTH, JOB_STATUS_PENDING, STATUS_MAX_LENGTH};

use super::{check_in, check_non_negative, check_not_empty, drop_constraint};

const TABLE: &str = "video_jobs";
const CHK_STATUS: &str = "chk_video_jobs_status";
const CHK_FRAME_COUNT: &str = "chk_video_jobs_frame_count";
const CHK_FILENAME: &str = "chk_video_jobs_filename";
const CHK_VIDEO_URL: &str = "chk_video_jobs_video_url";
const FK_USER: &str = "fk_video_jobs_user";

/// Secondary indexes, in creation order.
const INDEXES: [(&str, &[VideoJobs]); 4] = [
    ("idx_jobs_user_id", &[VideoJobs::UserId]),
    ("idx_jobs_status", &[VideoJobs::Status]),
    ("idx_jobs_created_at", &[VideoJobs::CreatedAt]),
    ("idx_jobs_user_status", &[VideoJobs::UserId, VideoJobs::Status]),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VideoJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VideoJobs::JobId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(VideoJobs::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(VideoJobs::Filename)
                            .string_len(FILENAME_MAX_LENGTH)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoJobs::Status)
                            .string_len(STATUS_MAX_LENGTH)
                            .not_null()
                            .default(JOB_STATUS_PENDING),
                    )
                    .col(ColumnDef::new(VideoJobs::VideoUrl).text().not_null())
                    .col(ColumnDef::new(VideoJobs::ResultUrl).text().null())
                    .col(ColumnDef::new(VideoJobs::FrameCount).integer().null())
                    .col(ColumnDef::new(VideoJobs::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(VideoJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(VideoJobs::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VideoJobs::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        let statuses: Vec<&str> = JobStatus::ALL.iter().map(|s| s.as_str()).collect();
        let db = manager.get_connection();
        db.execute_unprepared(&check_in(TABLE, CHK_STATUS, "status", &statuses))
            .await?;
        db.execute_unprepared(&check_non_negative(TABLE, CHK_FRAME_COUNT, "frame_count"))
            .await?;
        db.execute_unprepared(&check_not_empty(TABLE, CHK_FILENAME, "filename"))
            .await?;
        db.execute_unprepared(&check_not_empty(TABLE, CHK_VIDEO_URL, "video_url"))
            .await?;

        for (name, columns) in INDEXES {
            let mut index = Index::create();
            index.name(name).table(VideoJobs::Table);
            for column in columns {
                index.col(*column);
            }
            manager.create_index(index.to_owned()).await?;
        }

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_USER)
                    .from(VideoJobs::Table, VideoJobs::UserId)
                    .to(Users::Table, Users::UserId)
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
                    .name(FK_USER)
                    .table(VideoJobs::Table)
                    .to_owned(),
            )
            .await?;

        for (name, _) in INDEXES.iter().rev() {
            manager
                .drop_index(Index::drop().name(*name).table(VideoJobs::Table).to_owned())
                .await?;
        }

        let db = manager.get_connection();
        for constraint in [CHK_VIDEO_URL, CHK_FILENAME, CHK_FRAME_COUNT, CHK_STATUS] {
            db.execute_unprepared(&drop_constraint(TABLE, constraint))
                .await?;
        }

        manager
            .drop_table(Table::drop().table(VideoJobs::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum VideoJobs {
    Table,
    JobId,
    UserId,
    Filename,
    Status,
    VideoUrl,
    ResultUrl,
    FrameCount,
    ErrorMessage,
    CreatedAt,
    StartedAt,
    CompletedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    UserId,
}
