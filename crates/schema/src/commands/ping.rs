//! Ping command - Database connectivity check.

use common::AppResult;

use crate::infra::SchemaAdmin;

/// Execute the ping command
pub async fn execute(admin: &dyn SchemaAdmin) -> AppResult<()> {
    admin.ping().await?;
    tracing::info!("Database is reachable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockSchemaAdmin;
    use sea_orm::DbErr;

    #[tokio::test]
    async fn test_ping_propagates_connection_error() {
        let mut admin = MockSchemaAdmin::new();
        admin
            .expect_ping()
            .times(1)
            .returning(|| Err(DbErr::Custom("connection refused".to_string())));

        let err = execute(&admin).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
