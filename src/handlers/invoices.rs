//! /invoices handlers. Path ids are parsed here; a non-integer id is a malformed request.

use crate::error::AppError;
use crate::model::InvoicePayload;
use crate::response::{created, deleted, ok};
use crate::service::{parse_id, InvoiceService};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let invoices = InvoiceService::list(state.store.as_ref()).await?;
    Ok(ok("invoices", invoices))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let invoice = InvoiceService::get(state.store.as_ref(), id).await?;
    Ok(ok("invoice", invoice))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<InvoicePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = body?;
    let invoice = InvoiceService::create(state.store.as_ref(), payload).await?;
    Ok(created("invoice", invoice))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<InvoicePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(payload) = body?;
    let invoice = InvoiceService::update(state.store.as_ref(), id, payload).await?;
    Ok(ok("invoice", invoice))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    InvoiceService::delete(state.store.as_ref(), id).await?;
    Ok(deleted())
}
