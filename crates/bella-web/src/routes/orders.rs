//! Order route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bella_core::order::{
    self,
    model::{CreateOrderRequest, Order, OrderQuery, UpdateOrderRequest},
};

use crate::error::{api_error, created, parse_id, ApiError, Created};
use crate::state::AppState;

pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = order::list_orders(&state.db, &query).map_err(api_error)?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let id = parse_id(&id)?;
    let order = order::get_order(&state.db, id).map_err(api_error)?;
    Ok(Json(order))
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Created<Order>, ApiError> {
    let order = order::create_order(&state.db, &*state.clock, req).map_err(api_error)?;
    Ok(created("orders", order.id, order))
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    let id = parse_id(&id)?;
    let order = order::update_order(&state.db, &*state.clock, id, req).map_err(api_error)?;
    Ok(Json(order))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    order::delete_order(&state.db, id).map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
