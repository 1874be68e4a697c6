//! Shared application state for all routes.

use crate::store::DynStore;

#[derive(Clone)]
pub struct AppState {
    pub store: DynStore,
}

impl AppState {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }
}
