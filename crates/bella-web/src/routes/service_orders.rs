//! Service order route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bella_core::service_order::{
    self,
    model::{ServiceOrder, ServiceOrderQuery, ServiceOrderRequest, ServiceOrderStatusRequest},
};

use crate::error::{api_error, created, parse_id, ApiError, Created};
use crate::state::AppState;

pub async fn list_service_orders(
    State(state): State<AppState>,
    Query(query): Query<ServiceOrderQuery>,
) -> Result<Json<Vec<ServiceOrder>>, ApiError> {
    let list = service_order::list_service_orders(&state.db, &query).map_err(api_error)?;
    Ok(Json(list))
}

pub async fn get_service_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceOrder>, ApiError> {
    let id = parse_id(&id)?;
    let found = service_order::get_service_order(&state.db, id).map_err(api_error)?;
    Ok(Json(found))
}

pub async fn create_service_order(
    State(state): State<AppState>,
    Json(req): Json<ServiceOrderRequest>,
) -> Result<Created<ServiceOrder>, ApiError> {
    let so = service_order::create_service_order(&state.db, &*state.clock, req)
        .map_err(api_error)?;
    Ok(created("serviceOrders", so.id, so))
}

pub async fn update_service_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ServiceOrderRequest>,
) -> Result<Json<ServiceOrder>, ApiError> {
    let id = parse_id(&id)?;
    let so = service_order::update_service_order(&state.db, &*state.clock, id, req)
        .map_err(api_error)?;
    Ok(Json(so))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ServiceOrderStatusRequest>,
) -> Result<Json<ServiceOrder>, ApiError> {
    let id = parse_id(&id)?;
    let so = service_order::update_status(&state.db, &*state.clock, id, req.status)
        .map_err(api_error)?;
    Ok(Json(so))
}

pub async fn delete_service_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    service_order::delete_service_order(&state.db, id).map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
