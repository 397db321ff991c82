//! Database operations for the `products` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row and input types
// ---------------------------------------------------------------------------

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub size: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub stock: i32,
    pub description: Option<String>,
    pub image_url: String,
    pub notes: Vec<String>,
    pub status: String,
    pub rating: Decimal,
    pub review_count: i32,
    pub is_best_seller: bool,
    pub is_featured: bool,
    pub is_hero_carousel: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full column set for inserting a product. Callers validate category,
/// sub-category, and status strings before building one of these.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub size: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub stock: i32,
    pub description: Option<String>,
    pub image_url: String,
    pub notes: Vec<String>,
    pub status: String,
    pub rating: Decimal,
    pub review_count: i32,
    pub is_best_seller: bool,
    pub is_featured: bool,
    pub is_hero_carousel: bool,
}

/// Sparse update for a product. `None` keeps the current value; for the
/// nullable columns the outer `Option` means "was supplied" and the inner
/// one carries the new value (which may clear the column).
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<Option<String>>,
    pub size: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Option<Decimal>>,
    pub stock: Option<i32>,
    pub description: Option<Option<String>>,
    pub image_url: Option<String>,
    pub notes: Option<Vec<String>>,
    pub status: Option<String>,
    pub is_best_seller: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_hero_carousel: Option<bool>,
}

/// Input filters for the public product listing.
///
/// Boolean flags follow the storefront convention: `Some(true)` narrows the
/// listing to flagged products, `None` applies no predicate.
#[derive(Debug, Clone, Default)]
pub struct ProductFilters<'a> {
    pub category: Option<&'a str>,
    pub sub_category: Option<&'a str>,
    pub best_sellers: Option<bool>,
    pub featured: Option<bool>,
    pub hero_carousel: Option<bool>,
    pub limit: i64,
}

const PRODUCT_COLUMNS: &str = "id, name, category, sub_category, size, price, original_price, \
     stock, description, image_url, notes, status, rating, review_count, \
     is_best_seller, is_featured, is_hero_carousel, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns active products matching the filters, newest first, capped at
/// `filters.limit`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(
    pool: &PgPool,
    filters: ProductFilters<'_>,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} \
         FROM products \
         WHERE status = 'Active' \
           AND ($1::TEXT IS NULL OR category = $1) \
           AND ($2::TEXT IS NULL OR sub_category = $2) \
           AND ($3::BOOLEAN IS NULL OR is_best_seller = $3) \
           AND ($4::BOOLEAN IS NULL OR is_featured = $4) \
           AND ($5::BOOLEAN IS NULL OR is_hero_carousel = $5) \
         ORDER BY created_at DESC \
         LIMIT $6"
    ))
    .bind(filters.category)
    .bind(filters.sub_category)
    .bind(filters.best_sellers)
    .bind(filters.featured)
    .bind(filters.hero_carousel)
    .bind(filters.limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single product by id regardless of status, or `None` if absent.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a product row and returns it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_product(pool: &PgPool, input: &ProductInput) -> Result<ProductRow, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "INSERT INTO products \
             (name, category, sub_category, size, price, original_price, stock, \
              description, image_url, notes, status, rating, review_count, \
              is_best_seller, is_featured, is_hero_carousel) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&input.name)
    .bind(&input.category)
    .bind(&input.sub_category)
    .bind(&input.size)
    .bind(input.price)
    .bind(input.original_price)
    .bind(input.stock)
    .bind(&input.description)
    .bind(&input.image_url)
    .bind(&input.notes)
    .bind(&input.status)
    .bind(input.rating)
    .bind(input.review_count)
    .bind(input.is_best_seller)
    .bind(input.is_featured)
    .bind(input.is_hero_carousel)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Applies a sparse update to a product and returns the updated row, or
/// `None` if the id does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    patch: &ProductPatch,
) -> Result<Option<ProductRow>, DbError> {
    // Nullable columns need a "was supplied" flag so None can be written
    // through; see the CASE WHEN arms below.
    let sub_category_supplied = patch.sub_category.is_some();
    let sub_category_val = patch.sub_category.clone().flatten();
    let original_price_supplied = patch.original_price.is_some();
    let original_price_val = patch.original_price.flatten();
    let description_supplied = patch.description.is_some();
    let description_val = patch.description.clone().flatten();

    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "UPDATE products \
         SET name             = COALESCE($2, name), \
             category         = COALESCE($3, category), \
             sub_category     = CASE WHEN $4::BOOL THEN $5 ELSE sub_category END, \
             size             = COALESCE($6, size), \
             price            = COALESCE($7, price), \
             original_price   = CASE WHEN $8::BOOL THEN $9 ELSE original_price END, \
             stock            = COALESCE($10, stock), \
             description      = CASE WHEN $11::BOOL THEN $12 ELSE description END, \
             image_url        = COALESCE($13, image_url), \
             notes            = COALESCE($14, notes), \
             status           = COALESCE($15, status), \
             is_best_seller   = COALESCE($16, is_best_seller), \
             is_featured      = COALESCE($17, is_featured), \
             is_hero_carousel = COALESCE($18, is_hero_carousel), \
             updated_at       = NOW() \
         WHERE id = $1 \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(&patch.name)
    .bind(&patch.category)
    .bind(sub_category_supplied)
    .bind(sub_category_val)
    .bind(&patch.size)
    .bind(patch.price)
    .bind(original_price_supplied)
    .bind(original_price_val)
    .bind(patch.stock)
    .bind(description_supplied)
    .bind(description_val)
    .bind(&patch.image_url)
    .bind(&patch.notes)
    .bind(&patch.status)
    .bind(patch.is_best_seller)
    .bind(patch.is_featured)
    .bind(patch.is_hero_carousel)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Hard-deletes a product. Returns `true` when a row was removed.
///
/// Order line items keep their snapshot and merely lose the product
/// reference (`ON DELETE SET NULL`); reviews cascade away with the product.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_product(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
