//! Database Module
//!
//! 嵌入式 SurrealDB 连接和索引初始化

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

/// Database service — owns an embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self { db };
        service.select_namespace().await?;
        service.init_schema().await?;

        tracing::info!("Database connection established (SurrealDB RocksDB at {db_path})");
        Ok(service)
    }

    /// In-memory database for tests
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        let service = Self { db };
        service.select_namespace().await?;
        service.init_schema().await?;
        Ok(service)
    }

    async fn select_namespace(&self) -> Result<(), AppError> {
        self.db
            .use_ns("cafe")
            .use_db("cafe")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
        Ok(())
    }

    /// Define the unique indexes the application relies on
    ///
    /// DEFINE ... IF NOT EXISTS makes startup idempotent.
    async fn init_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                r#"
                DEFINE INDEX IF NOT EXISTS user_email_unique ON TABLE user COLUMNS email UNIQUE;
                DEFINE INDEX IF NOT EXISTS blog_slug_unique ON TABLE blog COLUMNS slug UNIQUE;
                DEFINE INDEX IF NOT EXISTS wishlist_user_unique ON TABLE wishlist COLUMNS user UNIQUE;
                "#,
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;
        Ok(())
    }
}
