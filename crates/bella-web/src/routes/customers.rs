//! Customer route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bella_core::customer::{
    self,
    model::{Customer, CustomerInput},
};

use crate::error::{api_error, created, parse_id, ApiError, Created};
use crate::state::AppState;

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = customer::list_customers(&state.db).map_err(api_error)?;
    Ok(Json(customers))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let id = parse_id(&id)?;
    let found = customer::get_customer(&state.db, id).map_err(api_error)?;
    Ok(Json(found))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<CustomerInput>,
) -> Result<Created<Customer>, ApiError> {
    let new = customer::create_customer(&state.db, &*state.clock, req).map_err(api_error)?;
    Ok(created("customers", new.id, new))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CustomerInput>,
) -> Result<Json<Customer>, ApiError> {
    let id = parse_id(&id)?;
    let updated = customer::update_customer(&state.db, &*state.clock, id, req).map_err(api_error)?;
    Ok(Json(updated))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    customer::delete_customer(&state.db, id).map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
