//! /industries handlers. There is no update route.

use crate::error::AppError;
use crate::model::IndustryPayload;
use crate::response::{created, deleted, ok};
use crate::service::IndustryService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let industries = IndustryService::list(state.store.as_ref()).await?;
    Ok(ok("industries", industries))
}

pub async fn read(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let industry = IndustryService::get(state.store.as_ref(), &code).await?;
    Ok(ok("industry", industry))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<IndustryPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = body?;
    let industry = IndustryService::create(state.store.as_ref(), payload).await?;
    Ok(created("industry", industry))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    IndustryService::delete(state.store.as_ref(), &code).await?;
    Ok(deleted())
}
