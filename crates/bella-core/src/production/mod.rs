//! Daily production scheduling.
//!
//! A schedule snapshots the product's bill of materials multiplied by the
//! planned quantity. Later product edits do not touch existing snapshots.

pub mod model;

use crate::clock::Clock;
use crate::error::{BellaError, BellaResult};
use bella_db::queries::production::{self as queries, ScheduleFilter, SchedulePartRow, ScheduleRow};
use bella_db::queries::products;
use bella_db::{DbError, DbPool};
use model::{ProductionSchedule, ScheduleQuery, ScheduleRequest, ScheduleStatus};
use uuid::Uuid;
use validator::Validate;

/// Plan a production run.
pub fn create_schedule(
    pool: &DbPool,
    clock: &dyn Clock,
    request: ScheduleRequest,
) -> BellaResult<ProductionSchedule> {
    request.validate()?;

    match products::get_product(pool, request.product_id) {
        Ok(_) => {}
        Err(DbError::NotFound(_)) => return Err(BellaError::ProductNotFound),
        Err(e) => return Err(e.into()),
    }
    let product_parts = products::list_parts(pool, request.product_id)?;

    let id = Uuid::new_v4();
    let mut parts = Vec::with_capacity(product_parts.len());
    for part in product_parts {
        let quantity = part
            .quantity
            .checked_mul(request.quantity)
            .ok_or_else(|| BellaError::validation("quantity is too large"))?;
        parts.push(SchedulePartRow {
            id: Uuid::new_v4(),
            schedule_id: id,
            position: part.position,
            name: part.name,
            measurements: part.measurements,
            quantity,
        });
    }

    let row = ScheduleRow {
        id,
        product_id: request.product_id,
        scheduled_date: request.scheduled_date,
        quantity: request.quantity,
        status: request.status.as_str().to_string(),
        created_at: clock.now(),
        updated_at: None,
    };
    queries::insert_schedule(pool, &row, &parts)?;
    tracing::info!(
        schedule_id = %id,
        product_id = %row.product_id,
        date = %row.scheduled_date,
        quantity = row.quantity,
        "Production scheduled"
    );

    ProductionSchedule::from_rows(row, parts)
}

pub fn get_schedule(pool: &DbPool, id: Uuid) -> BellaResult<ProductionSchedule> {
    let row = queries::get_schedule(pool, id)?;
    let parts = queries::list_schedule_parts(pool, id)?;
    ProductionSchedule::from_rows(row, parts)
}

/// List schedules by date, parts included.
pub fn list_schedules(pool: &DbPool, query: &ScheduleQuery) -> BellaResult<Vec<ProductionSchedule>> {
    let filter = ScheduleFilter {
        scheduled_date: query.scheduled_date,
        product_id: query.product_id,
    };
    queries::list_schedules(pool, &filter)?
        .into_iter()
        .map(|row| {
            let parts = queries::list_schedule_parts(pool, row.id)?;
            ProductionSchedule::from_rows(row, parts)
        })
        .collect()
}

pub fn update_status(
    pool: &DbPool,
    clock: &dyn Clock,
    id: Uuid,
    status: ScheduleStatus,
) -> BellaResult<ProductionSchedule> {
    queries::update_schedule_status(pool, id, status.as_str(), clock.now())?;
    tracing::info!(schedule_id = %id, status = status.as_str(), "Schedule status changed");
    get_schedule(pool, id)
}

pub fn delete_schedule(pool: &DbPool, id: Uuid) -> BellaResult<()> {
    queries::delete_schedule(pool, id)?;
    tracing::info!(schedule_id = %id, "Schedule deleted");
    Ok(())
}
