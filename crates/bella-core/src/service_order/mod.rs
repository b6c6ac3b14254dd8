//! Service orders: delivery and installation jobs derived from a sales
//! order.
//!
//! A service order copies lines from its parent order. Explicitly linked
//! lines must belong to that order; when none are given, every order item is
//! mirrored. Ad hoc lines without a link are appended after the copies.

pub mod model;

use crate::clock::Clock;
use crate::customer::model::Customer;
use crate::error::{BellaError, BellaResult};
use crate::money;
use crate::order::model::OrderItem;
use crate::text;
use bella_db::queries::orders::{self, OrderItemRow, OrderRow};
use bella_db::queries::service_orders::{
    self as queries, ServiceOrderFilter, ServiceOrderItemRow, ServiceOrderRow,
};
use bella_db::queries::customers;
use bella_db::{DbError, DbPool};
use model::{
    OrderSummary, ServiceOrder, ServiceOrderItemRequest, ServiceOrderQuery, ServiceOrderRequest,
    ServiceOrderStatus,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

/// Resolve the parent order and check it belongs to the requested customer.
fn resolve_order(
    pool: &DbPool,
    request: &ServiceOrderRequest,
) -> BellaResult<(OrderRow, Vec<OrderItemRow>)> {
    let order = match orders::get_order(pool, request.order_id) {
        Ok(order) => order,
        Err(DbError::NotFound(_)) => return Err(BellaError::OrderNotFound),
        Err(e) => return Err(e.into()),
    };
    if order.customer_id != request.customer_id {
        return Err(BellaError::CustomerMismatch);
    }
    if !customers::customer_exists(pool, request.customer_id)? {
        return Err(BellaError::CustomerNotFound);
    }
    let items = orders::list_order_items(pool, order.id)?;
    Ok((order, items))
}

/// Build the line list for a service order from the parent order's items
/// and the requested lines.
pub(crate) fn build_items(
    service_order_id: Uuid,
    order_items: &[OrderItemRow],
    requested: Vec<ServiceOrderItemRequest>,
) -> BellaResult<Vec<ServiceOrderItemRow>> {
    let by_id: HashMap<Uuid, &OrderItemRow> = order_items.iter().map(|i| (i.id, i)).collect();
    let (linked, ad_hoc): (Vec<_>, Vec<_>) = requested
        .into_iter()
        .partition(|item| item.order_item_id.is_some());

    let mut lines: Vec<(Option<Uuid>, String, i64, Decimal)> = Vec::new();
    if linked.is_empty() {
        lines.extend(
            order_items
                .iter()
                .map(|source| (Some(source.id), source.description.clone(), source.quantity, source.unit_price)),
        );
    } else {
        for item in linked {
            let Some(source) = item.order_item_id.and_then(|id| by_id.get(&id)) else {
                return Err(BellaError::ForeignOrderItems);
            };
            let description = if text::is_blank(item.description.as_deref()) {
                source.description.clone()
            } else {
                item.description.unwrap_or_default().trim().to_string()
            };
            lines.push((Some(source.id), description, item.quantity, item.unit_price));
        }
    }

    for item in ad_hoc {
        let description = text::optional(item.description).ok_or_else(|| {
            BellaError::validation("description is required for items not linked to the order")
        })?;
        lines.push((None, description, item.quantity, item.unit_price));
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(position, (order_item_id, description, quantity, unit_price))| {
            let unit_price = money::ensure_non_negative("unitPrice", unit_price)?;
            money::line_total(quantity, unit_price)?;
            Ok(ServiceOrderItemRow {
                id: Uuid::new_v4(),
                service_order_id,
                order_item_id,
                position: position as i64,
                description,
                quantity,
                unit_price,
            })
        })
        .collect()
}

/// Load a service order's items, parent order summary and customer.
fn assemble(pool: &DbPool, row: ServiceOrderRow) -> BellaResult<ServiceOrder> {
    let items = queries::list_service_order_items(pool, row.id)?;
    let order = orders::get_order(pool, row.order_id)?;
    let order_items = orders::list_order_items(pool, row.order_id)?;
    let customer = customers::get_customer(pool, row.customer_id)?;

    let summary = OrderSummary {
        id: order.id,
        code: order.code,
        delivery_date: order.delivery_date,
        items: order_items
            .into_iter()
            .map(OrderItem::from_row)
            .collect::<BellaResult<_>>()?,
    };
    ServiceOrder::from_rows(row, items, summary, Customer::from_row(customer))
}

fn normalized(request: ServiceOrderRequest) -> ServiceOrderRequest {
    ServiceOrderRequest {
        responsible: text::optional(request.responsible),
        notes: text::optional(request.notes),
        ..request
    }
}

/// Schedule a service order for an order.
pub fn create_service_order(
    pool: &DbPool,
    clock: &dyn Clock,
    request: ServiceOrderRequest,
) -> BellaResult<ServiceOrder> {
    let request = normalized(request);
    request.validate()?;

    let (order, order_items) = resolve_order(pool, &request)?;
    let id = Uuid::new_v4();
    let items = build_items(id, &order_items, request.items)?;

    let row = ServiceOrderRow {
        id,
        order_id: order.id,
        customer_id: order.customer_id,
        scheduled_date: request.scheduled_date,
        status: ServiceOrderStatus::Scheduled.as_str().to_string(),
        responsible: request.responsible,
        notes: request.notes,
        created_at: clock.now(),
        updated_at: None,
    };
    queries::insert_service_order(pool, &row, &items)?;
    tracing::info!(
        service_order_id = %id,
        order_id = %order.id,
        scheduled_date = %row.scheduled_date,
        items = items.len(),
        "Service order created"
    );

    assemble(pool, row)
}

/// Get a service order with its embedded order summary and customer.
pub fn get_service_order(pool: &DbPool, id: Uuid) -> BellaResult<ServiceOrder> {
    let row = queries::get_service_order(pool, id)?;
    assemble(pool, row)
}

/// List service orders by scheduled date.
pub fn list_service_orders(
    pool: &DbPool,
    query: &ServiceOrderQuery,
) -> BellaResult<Vec<ServiceOrder>> {
    let filter = ServiceOrderFilter {
        customer_id: query.customer_id,
        order_id: query.order_id,
        status: query.status.map(|s| s.as_str().to_string()),
        scheduled_from: query.scheduled_from,
        scheduled_to: query.scheduled_to,
    };
    let rows = queries::list_service_orders(pool, &filter)?;
    tracing::debug!(count = rows.len(), "Listed service orders");

    rows.into_iter().map(|row| assemble(pool, row)).collect()
}

/// Re-derive a service order from the request. The status is kept.
pub fn update_service_order(
    pool: &DbPool,
    clock: &dyn Clock,
    id: Uuid,
    request: ServiceOrderRequest,
) -> BellaResult<ServiceOrder> {
    let request = normalized(request);
    request.validate()?;

    let mut row = queries::get_service_order(pool, id)?;
    let (order, order_items) = resolve_order(pool, &request)?;
    let items = build_items(id, &order_items, request.items)?;

    row.order_id = order.id;
    row.customer_id = order.customer_id;
    row.scheduled_date = request.scheduled_date;
    row.responsible = request.responsible;
    row.notes = request.notes;
    row.updated_at = Some(clock.now());
    queries::update_service_order(pool, &row, &items)?;
    tracing::info!(service_order_id = %id, items = items.len(), "Service order updated");

    assemble(pool, row)
}

/// Overwrite the status. Any status may follow any other.
pub fn update_status(
    pool: &DbPool,
    clock: &dyn Clock,
    id: Uuid,
    status: ServiceOrderStatus,
) -> BellaResult<ServiceOrder> {
    queries::update_service_order_status(pool, id, status.as_str(), clock.now())?;
    tracing::info!(service_order_id = %id, status = status.label(), "Service order status changed");
    get_service_order(pool, id)
}

/// Delete a service order and its items.
pub fn delete_service_order(pool: &DbPool, id: Uuid) -> BellaResult<()> {
    queries::delete_service_order(pool, id)?;
    tracing::info!(service_order_id = %id, "Service order deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::error::ErrorKind;
    use crate::order::{self, model::{CreateOrderRequest, Order}};
    use crate::test_support::{customer, item, pool};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn order_for(pool: &DbPool, customer_id: Uuid) -> Order {
        order::create_order(
            pool,
            &SystemClock,
            CreateOrderRequest {
                customer_id,
                code: None,
                delivery_date: None,
                items: vec![item("Armario", 1, dec!(2500)), item("Instalacao", 2, dec!(250))],
            },
        )
        .unwrap()
    }

    fn request(order: &Order, items: Vec<ServiceOrderItemRequest>) -> ServiceOrderRequest {
        ServiceOrderRequest {
            order_id: order.id,
            customer_id: order.customer_id,
            scheduled_date: NaiveDate::from_ymd_opt(2026, 6, 10).unwrap(),
            responsible: Some("Joao".to_string()),
            notes: None,
            items,
        }
    }

    fn line(order_item_id: Option<Uuid>, description: Option<&str>, quantity: i64) -> ServiceOrderItemRequest {
        ServiceOrderItemRequest {
            order_item_id,
            description: description.map(str::to_string),
            quantity,
            unit_price: dec!(100),
        }
    }

    #[test]
    fn test_without_links_mirrors_every_order_item() {
        let pool = pool();
        let ana = customer(&pool, "Ana");
        let order = order_for(&pool, ana.id);

        let created = create_service_order(&pool, &SystemClock, request(&order, vec![])).unwrap();

        assert_eq!(created.status, ServiceOrderStatus::Scheduled);
        assert_eq!(created.items.len(), order.items.len());
        for (copy, source) in created.items.iter().zip(&order.items) {
            assert_eq!(copy.order_item_id, Some(source.id));
            assert_eq!(copy.description, source.description);
            assert_eq!(copy.quantity, source.quantity);
            assert_eq!(copy.unit_price, source.unit_price);
        }
        assert_eq!(created.order.code, order.code);
        assert_eq!(created.order.items.len(), 2);
        assert_eq!(created.customer.name, "Ana");
    }

    #[test]
    fn test_linked_items_override_mirroring_and_ad_hoc_is_appended() {
        let pool = pool();
        let ana = customer(&pool, "Ana");
        let order = order_for(&pool, ana.id);
        let cabinet = order.items[0].id;

        let created = create_service_order(
            &pool,
            &SystemClock,
            request(
                &order,
                vec![
                    line(None, Some("  Frete extra "), 1),
                    line(Some(cabinet), Some("   "), 1),
                ],
            ),
        )
        .unwrap();

        assert_eq!(created.items.len(), 2);
        assert_eq!(created.items[0].order_item_id, Some(cabinet));
        assert_eq!(created.items[0].description, "Armario");
        assert_eq!(created.items[0].unit_price, dec!(100));
        assert_eq!(created.items[1].order_item_id, None);
        assert_eq!(created.items[1].description, "Frete extra");
    }

    #[test]
    fn test_ad_hoc_only_still_mirrors_order() {
        let pool = pool();
        let ana = customer(&pool, "Ana");
        let order = order_for(&pool, ana.id);

        let created = create_service_order(
            &pool,
            &SystemClock,
            request(&order, vec![line(None, Some("Frete"), 1)]),
        )
        .unwrap();
        assert_eq!(created.items.len(), 3);
        assert_eq!(created.items[2].description, "Frete");
    }

    #[test]
    fn test_customer_mismatch_persists_nothing() {
        let pool = pool();
        let ana = customer(&pool, "Ana");
        let bia = customer(&pool, "Bia");
        let order = order_for(&pool, ana.id);

        let mut req = request(&order, vec![]);
        req.customer_id = bia.id;
        let err = create_service_order(&pool, &SystemClock, req).unwrap_err();

        assert!(matches!(err, BellaError::CustomerMismatch));
        assert_eq!(err.kind(), ErrorKind::CrossAggregateMismatch);
        assert_eq!(queries::count_service_orders(&pool).unwrap(), 0);
    }

    #[test]
    fn test_foreign_order_item_persists_nothing() {
        let pool = pool();
        let ana = customer(&pool, "Ana");
        let order = order_for(&pool, ana.id);
        let other = order_for(&pool, ana.id);

        let err = create_service_order(
            &pool,
            &SystemClock,
            request(
                &order,
                vec![
                    line(Some(order.items[0].id), None, 1),
                    line(Some(other.items[0].id), None, 1),
                ],
            ),
        )
        .unwrap_err();

        assert!(matches!(err, BellaError::ForeignOrderItems));
        assert_eq!(queries::count_service_orders(&pool).unwrap(), 0);
    }

    #[test]
    fn test_unknown_order_is_a_bad_reference() {
        let pool = pool();
        let ana = customer(&pool, "Ana");
        let order = order_for(&pool, ana.id);

        let mut req = request(&order, vec![]);
        req.order_id = Uuid::new_v4();
        let err = create_service_order(&pool, &SystemClock, req).unwrap_err();
        assert!(matches!(err, BellaError::OrderNotFound));
        assert_eq!(err.kind(), ErrorKind::ReferenceNotFound);
    }

    #[test]
    fn test_ad_hoc_item_needs_description() {
        let pool = pool();
        let ana = customer(&pool, "Ana");
        let order = order_for(&pool, ana.id);

        let err = create_service_order(
            &pool,
            &SystemClock,
            request(&order, vec![line(None, Some(" "), 1)]),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    }

    #[test]
    fn test_update_replaces_items_and_keeps_status() {
        let pool = pool();
        let ana = customer(&pool, "Ana");
        let order = order_for(&pool, ana.id);
        let created = create_service_order(&pool, &SystemClock, request(&order, vec![])).unwrap();
        update_status(&pool, &SystemClock, created.id, ServiceOrderStatus::InRoute).unwrap();

        let mut req = request(&order, vec![line(Some(order.items[1].id), Some("Montagem"), 2)]);
        req.scheduled_date = NaiveDate::from_ymd_opt(2026, 6, 12).unwrap();
        let updated = update_service_order(&pool, &SystemClock, created.id, req).unwrap();

        assert_eq!(updated.status, ServiceOrderStatus::InRoute);
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].description, "Montagem");
        assert_eq!(updated.scheduled_date, NaiveDate::from_ymd_opt(2026, 6, 12).unwrap());
        assert!(updated.updated_at.is_some());
        assert_eq!(get_service_order(&pool, created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let pool = pool();
        let ana = customer(&pool, "Ana");
        let order = order_for(&pool, ana.id);
        let err = update_service_order(&pool, &SystemClock, Uuid::new_v4(), request(&order, vec![]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_list_filters_by_order_and_status() {
        let pool = pool();
        let ana = customer(&pool, "Ana");
        let first = order_for(&pool, ana.id);
        let second = order_for(&pool, ana.id);
        let a = create_service_order(&pool, &SystemClock, request(&first, vec![])).unwrap();
        create_service_order(&pool, &SystemClock, request(&second, vec![])).unwrap();
        update_status(&pool, &SystemClock, a.id, ServiceOrderStatus::Delivered).unwrap();

        let by_order = list_service_orders(
            &pool,
            &ServiceOrderQuery {
                order_id: Some(first.id),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(by_order.len(), 1);
        assert_eq!(by_order[0].id, a.id);

        let scheduled = list_service_orders(
            &pool,
            &ServiceOrderQuery {
                status: Some(ServiceOrderStatus::Scheduled),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].order_id, second.id);
    }

    #[test]
    fn test_order_with_service_order_cannot_be_deleted() {
        let pool = pool();
        let ana = customer(&pool, "Ana");
        let order = order_for(&pool, ana.id);
        let created = create_service_order(&pool, &SystemClock, request(&order, vec![])).unwrap();

        let err = order::delete_order(&pool, order.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReferenceInUse);

        delete_service_order(&pool, created.id).unwrap();
        order::delete_order(&pool, order.id).unwrap();
    }
}
