//! Pessoas resource routes.

use crate::handlers::pessoa::{create, delete as delete_handler, list, read, root, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn pessoa_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/pessoas", get(list).post(create))
        .route("/pessoas/:id", get(read).put(update).delete(delete_handler))
        .with_state(state)
}
