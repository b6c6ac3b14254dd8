//! Product catalog.

pub mod model;

use crate::clock::Clock;
use crate::error::BellaResult;
use crate::money;
use bella_db::queries::products::{self as queries, ProductPartRow, ProductRow};
use bella_db::DbPool;
use model::{Product, ProductInput, ProductPartInput};
use uuid::Uuid;
use validator::Validate;

fn part_rows(product_id: Uuid, parts: Vec<ProductPartInput>) -> Vec<ProductPartRow> {
    parts
        .into_iter()
        .enumerate()
        .map(|(position, part)| ProductPartRow {
            id: Uuid::new_v4(),
            product_id,
            position: position as i64,
            name: part.name,
            measurements: part.measurements,
            quantity: part.quantity,
        })
        .collect()
}

/// Add a product to the catalog.
pub fn create_product(
    pool: &DbPool,
    clock: &dyn Clock,
    input: ProductInput,
) -> BellaResult<Product> {
    let input = input.normalized();
    input.validate()?;
    let price = money::ensure_catalog_price(input.default_sale_price)?;

    let row = ProductRow {
        id: Uuid::new_v4(),
        name: input.name,
        description: input.description,
        default_sale_price: price,
        is_active: input.is_active,
        created_at: clock.now(),
        updated_at: None,
    };
    let parts = part_rows(row.id, input.parts);
    queries::insert_product(pool, &row, &parts)?;
    tracing::info!(product_id = %row.id, parts = parts.len(), "Product created");

    Ok(Product::from_rows(row, parts))
}

/// Get a product with its parts.
pub fn get_product(pool: &DbPool, id: Uuid) -> BellaResult<Product> {
    let row = queries::get_product(pool, id)?;
    let parts = queries::list_parts(pool, id)?;
    Ok(Product::from_rows(row, parts))
}

/// List all products ordered by name, parts included.
pub fn list_products(pool: &DbPool) -> BellaResult<Vec<Product>> {
    queries::list_products(pool)?
        .into_iter()
        .map(|row| {
            let parts = queries::list_parts(pool, row.id)?;
            Ok(Product::from_rows(row, parts))
        })
        .collect()
}

/// Overwrite a product and replace its parts.
pub fn update_product(
    pool: &DbPool,
    clock: &dyn Clock,
    id: Uuid,
    input: ProductInput,
) -> BellaResult<Product> {
    let input = input.normalized();
    input.validate()?;
    let price = money::ensure_catalog_price(input.default_sale_price)?;

    let mut row = queries::get_product(pool, id)?;
    row.name = input.name;
    row.description = input.description;
    row.default_sale_price = price;
    row.is_active = input.is_active;
    row.updated_at = Some(clock.now());
    let parts = part_rows(id, input.parts);
    queries::update_product(pool, &row, &parts)?;
    tracing::info!(product_id = %id, parts = parts.len(), "Product updated");

    Ok(Product::from_rows(row, parts))
}

/// Remove a product. Order items that referenced it keep their copy.
pub fn delete_product(pool: &DbPool, id: Uuid) -> BellaResult<()> {
    queries::delete_product(pool, id)?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(())
}
