//! Product catalog route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bella_core::product::{
    self,
    model::{Product, ProductInput},
};

use crate::error::{api_error, created, parse_id, ApiError, Created};
use crate::state::AppState;

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = product::list_products(&state.db).map_err(api_error)?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    let found = product::get_product(&state.db, id).map_err(api_error)?;
    Ok(Json(found))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductInput>,
) -> Result<Created<Product>, ApiError> {
    let new = product::create_product(&state.db, &*state.clock, req).map_err(api_error)?;
    Ok(created("products", new.id, new))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProductInput>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    let updated = product::update_product(&state.db, &*state.clock, id, req).map_err(api_error)?;
    Ok(Json(updated))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    product::delete_product(&state.db, id).map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
