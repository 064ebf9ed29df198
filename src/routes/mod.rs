//! Router assembly.

mod common;
mod resources;

pub use common::common_routes;
pub use resources::{company_routes, industry_routes, invoice_routes};

use crate::error::AppError;
use crate::state::AppState;
use axum::{http::Uri, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Full application: operational routes, the three resources, a JSON 404 fallback,
/// a request body limit and request tracing.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(company_routes(state.clone()))
        .merge(invoice_routes(state.clone()))
        .merge(industry_routes(state))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}
