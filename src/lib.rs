//! Pessoas API: Person records over HTTP with a swappable storage backend.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{AppConfig, StoreBackend};
pub use error::{AppError, ConfigError, StoreError};
pub use model::{Person, PersonId, PersonInput};
pub use routes::{app, common_routes, pessoa_routes};
pub use state::AppState;
pub use store::{open_store, DynStore, PersonStore, PgStore, VolatileStore};
