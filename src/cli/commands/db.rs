use sqlx::SqlitePool;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;

pub async fn migrate(pool: &SqlitePool, output_format: OutputFormat) -> anyhow::Result<()> {
    DatabaseManager::migrate(pool).await?;
    output_success(output_format, "Database migrations applied", None)
}
