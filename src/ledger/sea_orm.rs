//! Sea-ORM ledger backend (SQLite / MySQL / PostgreSQL)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectOptions, Database,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};
use tracing::{info, warn};

use crate::errors::{ClickguardError, Result};
use crate::ledger::{ClickLedger, ClickRecord};

use migration::{Migrator, MigratorTrait, entities::sponsored_click};

#[derive(Clone)]
pub struct SeaOrmLedger {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmLedger {
    pub async fn new(database_url: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(ClickguardError::database_config("database.url is not set"));
        }

        let backend_name = Self::backend_name_from_url(database_url);

        let db = if backend_name == "sqlite" {
            Self::connect_sqlite(database_url).await?
        } else {
            Self::connect_generic(database_url, &backend_name).await?
        };

        let ledger = SeaOrmLedger { db, backend_name };

        ledger.run_migrations().await?;

        warn!("{} ledger initialized.", ledger.backend_name.to_uppercase());
        Ok(ledger)
    }

    fn backend_name_from_url(database_url: &str) -> String {
        if database_url.starts_with("sqlite") {
            "sqlite".to_string()
        } else if database_url.starts_with("mysql") {
            "mysql".to_string()
        } else {
            "postgres".to_string()
        }
    }

    /// Connect to SQLite (auto-create + WAL tuning)
    async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::SqlitePool;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                ClickguardError::database_config(format!("invalid SQLite URL: {}", e))
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
            ClickguardError::database_connection(format!("cannot connect to SQLite: {}", e))
        })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// Connect to MySQL/PostgreSQL with bounded pool timeouts. All ledger
    /// reads and the final append inherit these bounds, so the ingestion
    /// path never blocks on an unbounded wait.
    async fn connect_generic(database_url: &str, backend_name: &str) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(std::time::Duration::from_secs(8))
            .acquire_timeout(std::time::Duration::from_secs(8))
            .idle_timeout(std::time::Duration::from_secs(8))
            .sqlx_logging(false);

        Database::connect(opt).await.map_err(|e| {
            ClickguardError::database_connection(format!(
                "cannot connect to {} database: {}",
                backend_name.to_uppercase(),
                e
            ))
        })
    }

    async fn run_migrations(&self) -> Result<()> {
        Migrator::up(&self.db, None)
            .await
            .map_err(|e| ClickguardError::database_operation(format!("migration failed: {}", e)))?;

        info!("Database migrations completed");
        Ok(())
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    fn record_to_active_model(record: ClickRecord) -> sponsored_click::ActiveModel {
        sponsored_click::ActiveModel {
            link_id: Set(record.link_id),
            session_id: Set(record.session_id),
            ip_hash: Set(record.ip_hash),
            fingerprint_hash: Set(record.fingerprint_hash),
            user_agent: Set(record.user_agent),
            referrer: Set(record.referrer),
            is_valid: Set(record.is_valid),
            invalid_reason: Set(record.invalid_reason.map(|r| r.as_str().to_string())),
            created_at: Set(record.created_at),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ClickLedger for SeaOrmLedger {
    async fn append(&self, record: ClickRecord) -> Result<i64> {
        let model = Self::record_to_active_model(record).insert(&self.db).await?;
        Ok(model.id)
    }

    async fn count_valid(&self, ip_hash: &str, since: DateTime<Utc>) -> Result<u64> {
        let count = sponsored_click::Entity::find()
            .filter(sponsored_click::Column::IpHash.eq(ip_hash))
            .filter(sponsored_click::Column::IsValid.eq(true))
            .filter(sponsored_click::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn exists_valid(
        &self,
        session_id: &str,
        link_id: &str,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        let count = sponsored_click::Entity::find()
            .filter(sponsored_click::Column::SessionId.eq(session_id))
            .filter(sponsored_click::Column::LinkId.eq(link_id))
            .filter(sponsored_click::Column::IsValid.eq(true))
            .filter(sponsored_click::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_valid_fingerprint(
        &self,
        fingerprint_hash: &str,
        link_id: &str,
        excluding_session: Option<&str>,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        let mut query = sponsored_click::Entity::find()
            .filter(sponsored_click::Column::FingerprintHash.eq(fingerprint_hash))
            .filter(sponsored_click::Column::LinkId.eq(link_id))
            .filter(sponsored_click::Column::IsValid.eq(true))
            .filter(sponsored_click::Column::CreatedAt.gte(since));

        if let Some(session_id) = excluding_session {
            // NULL sessions still count as "a different session"
            query = query.filter(
                Condition::any()
                    .add(sponsored_click::Column::SessionId.ne(session_id))
                    .add(sponsored_click::Column::SessionId.is_null()),
            );
        }

        let count = query.count(&self.db).await?;
        Ok(count > 0)
    }

    async fn exists_any(&self, ip_hash: &str, since: DateTime<Utc>) -> Result<bool> {
        let count = sponsored_click::Entity::find()
            .filter(sponsored_click::Column::IpHash.eq(ip_hash))
            .filter(sponsored_click::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
