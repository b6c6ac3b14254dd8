//! Expense route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bella_core::expense::{
    self,
    model::{Expense, ExpenseInput, ExpenseQuery},
};

use crate::error::{api_error, created, parse_id, ApiError, Created};
use crate::state::AppState;

pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseQuery>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = expense::list_expenses(&state.db, &query).map_err(api_error)?;
    Ok(Json(expenses))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Expense>, ApiError> {
    let id = parse_id(&id)?;
    let found = expense::get_expense(&state.db, id).map_err(api_error)?;
    Ok(Json(found))
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(req): Json<ExpenseInput>,
) -> Result<Created<Expense>, ApiError> {
    let new = expense::create_expense(&state.db, &*state.clock, req).map_err(api_error)?;
    Ok(created("expenses", new.id, new))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ExpenseInput>,
) -> Result<Json<Expense>, ApiError> {
    let id = parse_id(&id)?;
    let updated = expense::update_expense(&state.db, &*state.clock, id, req).map_err(api_error)?;
    Ok(Json(updated))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    expense::delete_expense(&state.db, id).map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
