//! /companies handlers.

use crate::error::AppError;
use crate::model::CompanyPayload;
use crate::response::{created, deleted, ok};
use crate::service::CompanyService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let companies = CompanyService::list(state.store.as_ref()).await?;
    Ok(ok("companies", companies))
}

pub async fn read(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let company = CompanyService::get(state.store.as_ref(), &code).await?;
    Ok(ok("company", company))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CompanyPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = body?;
    let company = CompanyService::create(state.store.as_ref(), payload).await?;
    Ok(created("company", company))
}

pub async fn update(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Result<Json<CompanyPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = body?;
    let company = CompanyService::update(state.store.as_ref(), &code, payload).await?;
    Ok(ok("company", company))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    CompanyService::delete(state.store.as_ref(), &code).await?;
    Ok(deleted())
}
