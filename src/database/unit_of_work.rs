use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::Method};
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::database::manager::DatabaseError;
use crate::error::ApiError;
use crate::state::AppState;

/// How a unit of work takes its lock on the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// `BEGIN`: the lock is taken lazily, by the first statement that needs it.
    Read,
    /// `BEGIN IMMEDIATE`: the write lock is held from the start. A unit that reads
    /// before it writes never sees a snapshot another writer has already moved past.
    Write,
}

impl TxMode {
    /// Safe methods only read; everything else may write.
    pub fn for_method(method: &Method) -> Self {
        if *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS {
            TxMode::Read
        } else {
            TxMode::Write
        }
    }

    fn begin_sql(self) -> &'static str {
        match self {
            TxMode::Read => "BEGIN",
            TxMode::Write => "BEGIN IMMEDIATE",
        }
    }
}

/// One request's transaction against the store.
///
/// Handlers receive it as an extractor and call [`UnitOfWork::commit`] once every
/// check has passed. Dropping it without committing rolls everything back, so an
/// early `?` return never leaves a partial write behind.
///
/// The unit owns its pooled connection until it is committed or rolled back.
pub struct UnitOfWork {
    conn: Option<PoolConnection<Sqlite>>,
}

impl UnitOfWork {
    pub async fn begin(pool: &SqlitePool, mode: TxMode) -> Result<Self, DatabaseError> {
        let mut conn = pool.acquire().await?;
        sqlx::query(mode.begin_sql()).execute(&mut *conn).await?;
        Ok(Self { conn: Some(conn) })
    }

    pub fn conn(&mut self) -> &mut SqliteConnection {
        match self.conn.as_deref_mut() {
            Some(conn) => conn,
            // Only commit, rollback and drop take the connection, and all of them consume the unit
            None => unreachable!("unit of work used after it finished"),
        }
    }

    pub async fn commit(mut self) -> Result<(), DatabaseError> {
        if let Some(mut conn) = self.conn.take() {
            if let Err(e) = sqlx::query("COMMIT").execute(&mut *conn).await {
                // Still inside the transaction; Drop rolls it back
                self.conn = Some(conn);
                return Err(e.into());
            }
        }
        Ok(())
    }

    pub async fn rollback(mut self) {
        if let Some(mut conn) = self.conn.take() {
            if let Err(e) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                tracing::error!("Transaction rollback failed: {}", e);
            }
        }
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        let Some(mut conn) = self.conn.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            // The connection goes back to the pool only once the rollback has run
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                        tracing::error!("Transaction rollback on drop failed: {}", e);
                    }
                });
            }
            Err(_) => {
                tracing::warn!("Unit of work dropped outside a runtime; closing its connection");
                drop(conn.detach());
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UnitOfWork {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(UnitOfWork::begin(&state.pool, TxMode::for_method(&parts.method)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::DatabaseManager;

    async fn count_categories(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn file_pool(dir: &tempfile::TempDir) -> SqlitePool {
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("uow.db").display()),
            max_connections: 4,
            connection_timeout: 5,
            run_migrations: true,
        };
        let pool = DatabaseManager::connect(&config).await.unwrap();
        DatabaseManager::migrate(&pool).await.unwrap();
        pool
    }

    #[test]
    fn safe_methods_read_and_the_rest_write() {
        assert_eq!(TxMode::for_method(&Method::GET), TxMode::Read);
        assert_eq!(TxMode::for_method(&Method::HEAD), TxMode::Read);
        assert_eq!(TxMode::for_method(&Method::POST), TxMode::Write);
        assert_eq!(TxMode::for_method(&Method::PUT), TxMode::Write);
        assert_eq!(TxMode::for_method(&Method::DELETE), TxMode::Write);
    }

    #[tokio::test]
    async fn commit_persists_writes() {
        let pool = DatabaseManager::in_memory().await.unwrap();

        let mut uow = UnitOfWork::begin(&pool, TxMode::Write).await.unwrap();
        sqlx::query("INSERT INTO categories (name) VALUES ('rust')")
            .execute(uow.conn())
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(count_categories(&pool).await, 1);
    }

    #[tokio::test]
    async fn explicit_rollback_discards_writes() {
        let pool = DatabaseManager::in_memory().await.unwrap();

        let mut uow = UnitOfWork::begin(&pool, TxMode::Write).await.unwrap();
        sqlx::query("INSERT INTO categories (name) VALUES ('rust')")
            .execute(uow.conn())
            .await
            .unwrap();
        uow.rollback().await;

        assert_eq!(count_categories(&pool).await, 0);
    }

    #[tokio::test]
    async fn dropping_an_open_unit_rolls_back_and_frees_the_connection() {
        // One connection: the count below can only run once the dropped unit released it
        let pool = DatabaseManager::in_memory().await.unwrap();

        {
            let mut uow = UnitOfWork::begin(&pool, TxMode::Write).await.unwrap();
            sqlx::query("INSERT INTO categories (name) VALUES ('rust')")
                .execute(uow.conn())
                .await
                .unwrap();
        }

        assert_eq!(count_categories(&pool).await, 0);

        let uow = UnitOfWork::begin(&pool, TxMode::Write).await.unwrap();
        uow.commit().await.unwrap();
    }

    #[tokio::test]
    async fn overlapping_read_then_write_units_all_commit() {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir).await;

        // Each unit checks for the name and then inserts it, like category creation does
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let mut uow = UnitOfWork::begin(&pool, TxMode::Write).await?;
                    let name = format!("topic-{i}");
                    let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE name = ?")
                        .bind(&name)
                        .fetch_one(uow.conn())
                        .await?;
                    assert_eq!(taken, 0);
                    tokio::task::yield_now().await;
                    sqlx::query("INSERT INTO categories (name) VALUES (?)")
                        .bind(&name)
                        .execute(uow.conn())
                        .await?;
                    uow.commit().await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(count_categories(&pool).await, 8);
    }
}
