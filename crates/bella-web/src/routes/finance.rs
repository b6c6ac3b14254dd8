//! Financial summary route handler.

use axum::{
    extract::{Query, State},
    Json,
};
use bella_core::finance::{self, MonthlySummary, SummaryQuery};

use crate::error::{api_error, ApiError};
use crate::state::AppState;

pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<MonthlySummary>, ApiError> {
    let summary = finance::monthly_summary(&state.db, query.year, query.month).map_err(api_error)?;
    Ok(Json(summary))
}
