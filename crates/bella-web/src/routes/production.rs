//! Production schedule route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bella_core::production::{
    self,
    model::{ProductionSchedule, ScheduleQuery, ScheduleRequest, ScheduleStatusRequest},
};

use crate::error::{api_error, created, parse_id, ApiError, Created};
use crate::state::AppState;

pub async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Vec<ProductionSchedule>>, ApiError> {
    let schedules = production::list_schedules(&state.db, &query).map_err(api_error)?;
    Ok(Json(schedules))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductionSchedule>, ApiError> {
    let id = parse_id(&id)?;
    let found = production::get_schedule(&state.db, id).map_err(api_error)?;
    Ok(Json(found))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Created<ProductionSchedule>, ApiError> {
    let new = production::create_schedule(&state.db, &*state.clock, req).map_err(api_error)?;
    Ok(created("productionSchedules", new.id, new))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ScheduleStatusRequest>,
) -> Result<Json<ProductionSchedule>, ApiError> {
    let id = parse_id(&id)?;
    let updated = production::update_status(&state.db, &*state.clock, id, req.status)
        .map_err(api_error)?;
    Ok(Json(updated))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    production::delete_schedule(&state.db, id).map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
