//! Person persistence: one contract, two backends selected by configuration.

pub mod memory;
pub mod postgres;

use crate::config::{AppConfig, StoreBackend};
use crate::error::StoreError;
use crate::model::{Person, PersonId};
use async_trait::async_trait;
use std::sync::Arc;

pub use memory::VolatileStore;
pub use postgres::{ensure_database_exists, PgStore};

/// Storage contract shared by every backend. Implementations must be safe to
/// call from many request tasks at once.
///
/// Absence is reported through `Option`/`bool`, never as an error; `Err` is
/// reserved for the medium failing.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<Person>, StoreError>;

    async fn get(&self, id: PersonId) -> Result<Option<Person>, StoreError>;

    /// Inserts a record under a freshly assigned id.
    async fn create(&self, name: &str) -> Result<Person, StoreError>;

    /// Replaces the name of an existing record. `None` when no record matched.
    async fn update(&self, id: PersonId, name: &str) -> Result<Option<Person>, StoreError>;

    /// Removes the record. Returns whether anything was removed.
    async fn delete(&self, id: PersonId) -> Result<bool, StoreError>;

    /// Cheap liveness probe against the medium.
    async fn ping(&self) -> Result<(), StoreError>;
}

pub type DynStore = Arc<dyn PersonStore>;

/// Builds the backend named by `config`. For Postgres this connects, creates
/// the database if missing and ensures the table exists.
pub async fn open_store(config: &AppConfig) -> Result<DynStore, StoreError> {
    match config.store {
        StoreBackend::Memory => {
            let store = if config.seed {
                VolatileStore::seeded()
            } else {
                VolatileStore::new()
            };
            tracing::info!(records = store.len()?, "using in-memory store");
            Ok(Arc::new(store))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| StoreError::InvalidUrl("DATABASE_URL is not set".into()))?;
            let store = PgStore::connect(url, config.max_connections).await?;
            tracing::info!("using postgres store");
            Ok(Arc::new(store))
        }
    }
}
