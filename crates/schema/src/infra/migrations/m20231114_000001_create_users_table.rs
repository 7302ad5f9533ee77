//! Migration: Create users table.

use sea_orm_migration::prelude::*;

use domain::{
    EMAIL_MAX_LENGTH, PASSWORD_HASH_MAX_LENGTH, USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH,
    USERNAME_PATTERN,
};

use super::{check, check_not_empty, drop_constraint, quote};

const TABLE: &str = "users";
const CHK_USERNAME_LENGTH: &str = "chk_users_username_length";
const CHK_USERNAME_FORMAT: &str = "chk_users_username_format";
const CHK_PASSWORD_HASH: &str = "chk_users_password_hash";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::UserId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(USERNAME_MAX_LENGTH)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(EMAIL_MAX_LENGTH)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::PasswordHash)
                            .string_len(PASSWORD_HASH_MAX_LENGTH)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        db.execute_unprepared(&check(
            TABLE,
            CHK_USERNAME_LENGTH,
            &format!(
                "char_length(username) BETWEEN {} AND {}",
                USERNAME_MIN_LENGTH, USERNAME_MAX_LENGTH
            ),
        ))
        .await?;
        db.execute_unprepared(&check(
            TABLE,
            CHK_USERNAME_FORMAT,
            &format!("username ~ {}", quote(USERNAME_PATTERN)),
        ))
        .await?;
        db.execute_unprepared(&check_not_empty(TABLE, CHK_PASSWORD_HASH, "password_hash"))
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_users_username")
                    .table(Users::Table)
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        for constraint in [CHK_PASSWORD_HASH, CHK_USERNAME_FORMAT, CHK_USERNAME_LENGTH] {
            db.execute_unprepared(&drop_constraint(TABLE, constraint))
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    UserId,
    Username,
    Email,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}
