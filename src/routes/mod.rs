//! Router assembly.

pub mod common;
pub mod pessoa;

pub use common::common_routes;
pub use pessoa::pessoa_routes;

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

/// Full application: operational routes plus the pessoas resource, with a
/// request body cap of `body_limit` bytes.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(pessoa_routes(state))
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(body_limit)))
}
