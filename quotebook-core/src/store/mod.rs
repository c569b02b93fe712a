//! Record collections for quotes and thinkers.
//!
//! Provides a `Collection` trait with implementations for:
//! - **Postgres**: `PgQuotes` / `PgThinkers`, backed by a shared `PgPool`
//! - **Memory**: `MemoryCollection`, insertion-ordered and process-local

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::{QuotebookError, StoreError};
use crate::models::{Quote, Thinker};

pub mod memory;
pub mod postgres;

pub use memory::MemoryCollection;
pub use postgres::{PgQuotes, PgThinkers};

/// A record type held in a collection.
pub trait Document: Clone + Send + Sync + 'static {
    /// Fields supplied on creation.
    type New: Send + 'static;
    /// Fields supplied on partial update.
    type Patch: Send + 'static;

    fn create(id: Uuid, created_at: DateTime<Utc>, new: Self::New) -> Self;
    fn apply(&mut self, patch: Self::Patch);
    fn id(&self) -> Uuid;
}

/// Single-record operations over one entity's collection. Each call is
/// atomic on its own; nothing spans calls.
#[async_trait]
pub trait Collection<D: Document>: Send + Sync {
    /// Persist a new record under a fresh identifier.
    async fn insert(&self, new: D::New) -> Result<D, StoreError>;

    /// Every record, in natural (insertion) order.
    async fn find_all(&self) -> Result<Vec<D>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<D>, StoreError>;

    /// Apply `patch` to the record. `None` when no record has this id.
    async fn update(&self, id: Uuid, patch: D::Patch) -> Result<Option<D>, StoreError>;

    /// Remove the record. `false` when no record has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// The record at `offset` in natural order, if any.
    async fn find_nth(&self, offset: u64) -> Result<Option<D>, StoreError>;
}

/// Quote-only queries layered on top of the generic collection.
#[async_trait]
pub trait QuoteCollection: Collection<Quote> {
    /// Quotes whose category equals `category` exactly.
    async fn find_by_category(&self, category: &str) -> Result<Vec<Quote>, StoreError>;

    async fn find_by_thinker(&self, thinker_id: Uuid) -> Result<Vec<Quote>, StoreError>;
}

/// Both collections plus whatever backs them.
#[derive(Clone)]
pub struct Store {
    pub quotes: Arc<dyn QuoteCollection>,
    pub thinkers: Arc<dyn Collection<Thinker>>,
    pool: Option<PgPool>,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            quotes: Arc::new(PgQuotes::new(pool.clone())),
            thinkers: Arc::new(PgThinkers::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(MemoryCollection::<Quote>::new()),
            Arc::new(MemoryCollection::<Thinker>::new()),
        )
    }

    pub fn from_parts(
        quotes: Arc<dyn QuoteCollection>,
        thinkers: Arc<dyn Collection<Thinker>>,
    ) -> Self {
        Self {
            quotes,
            thinkers,
            pool: None,
        }
    }

    /// Connect to Postgres using `config`, running migrations if enabled.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, QuotebookError> {
        let url = config
            .url
            .as_deref()
            .ok_or(QuotebookError::MissingConfig("database.url"))?;
        let pool = crate::db::create_pool(url, config.max_connections).await?;
        if config.run_migrations {
            crate::db::run_migrations(&pool).await?;
        }
        Ok(Self::postgres(pool))
    }

    /// Describe the backing storage, failing if it is unreachable.
    pub async fn health(&self) -> Result<String, StoreError> {
        match &self.pool {
            Some(pool) => Ok(crate::db::health_check(pool).await?),
            None => Ok("in-memory".to_string()),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("postgres", &self.pool.is_some())
            .finish()
    }
}
