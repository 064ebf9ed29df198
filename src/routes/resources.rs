//! Resource routes. Industries deliberately have no PUT.

use crate::handlers::{companies, industries, invoices};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn company_routes(state: AppState) -> Router {
    Router::new()
        .route("/companies", get(companies::list).post(companies::create))
        .route(
            "/companies/:code",
            get(companies::read).put(companies::update).delete(companies::delete),
        )
        .with_state(state)
}

pub fn invoice_routes(state: AppState) -> Router {
    Router::new()
        .route("/invoices", get(invoices::list).post(invoices::create))
        .route(
            "/invoices/:id",
            get(invoices::read).put(invoices::update).delete(invoices::delete),
        )
        .with_state(state)
}

pub fn industry_routes(state: AppState) -> Router {
    Router::new()
        .route("/industries", get(industries::list).post(industries::create))
        .route("/industries/:code", get(industries::read).delete(industries::delete))
        .with_state(state)
}
