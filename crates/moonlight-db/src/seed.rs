//! Demo-data seeding: the admin account and a small catalog covering all
//! four categories. Seeding is idempotent — products upsert by name, the
//! admin by username — and runs inside a single transaction so a partial
//! seed is never left behind.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::products::ProductInput;
use crate::DbError;

/// Creates or refreshes the admin account. `password_sha256` is the hex
/// digest of the configured password — hashing happens at the caller so
/// plaintext never enters this crate.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn seed_admin(
    pool: &PgPool,
    username: &str,
    password_sha256: &str,
) -> Result<(), DbError> {
    crate::admins::upsert_admin(pool, username, password_sha256, "Admin").await?;
    Ok(())
}

/// Upserts the demo catalog, keyed by product name. Returns the number of
/// products processed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the transaction rolls
/// back and no products are applied.
pub async fn seed_products(pool: &PgPool) -> Result<usize, DbError> {
    let products = demo_products();
    let mut tx = pool.begin().await?;

    for product in &products {
        // Product names carry no unique constraint (admins may create
        // duplicates), so the seed upserts manually: update in place, insert
        // when the name is new.
        let updated = sqlx::query(
            "UPDATE products SET \
                 category = $2, sub_category = $3, size = $4, price = $5, \
                 original_price = $6, stock = $7, description = $8, image_url = $9, \
                 notes = $10, status = $11, rating = $12, review_count = $13, \
                 is_best_seller = $14, is_featured = $15, is_hero_carousel = $16, \
                 updated_at = NOW() \
             WHERE name = $1",
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.sub_category)
        .bind(&product.size)
        .bind(product.price)
        .bind(product.original_price)
        .bind(product.stock)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(&product.notes)
        .bind(&product.status)
        .bind(product.rating)
        .bind(product.review_count)
        .bind(product.is_best_seller)
        .bind(product.is_featured)
        .bind(product.is_hero_carousel)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            sqlx::query(
                "INSERT INTO products \
                     (name, category, sub_category, size, price, original_price, stock, \
                      description, image_url, notes, status, rating, review_count, \
                      is_best_seller, is_featured, is_hero_carousel) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
            )
            .bind(&product.name)
            .bind(&product.category)
            .bind(&product.sub_category)
            .bind(&product.size)
            .bind(product.price)
            .bind(product.original_price)
            .bind(product.stock)
            .bind(&product.description)
            .bind(&product.image_url)
            .bind(&product.notes)
            .bind(&product.status)
            .bind(product.rating)
            .bind(product.review_count)
            .bind(product.is_best_seller)
            .bind(product.is_featured)
            .bind(product.is_hero_carousel)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(products.len())
}

/// The demo catalog: two attars, two perfumes, one oud, one gift set.
#[must_use]
pub fn demo_products() -> Vec<ProductInput> {
    #[allow(clippy::too_many_arguments)] // positional demo data reads best as one row per product
    fn product(
        name: &str,
        category: &str,
        sub_category: &str,
        size: &str,
        price: i64,
        original_price: Option<i64>,
        stock: i32,
        description: &str,
        notes: &[&str],
        rating: Decimal,
        review_count: i32,
        is_best_seller: bool,
        is_featured: bool,
        image_url: &str,
    ) -> ProductInput {
        ProductInput {
            name: name.to_owned(),
            category: category.to_owned(),
            sub_category: Some(sub_category.to_owned()),
            size: size.to_owned(),
            price: Decimal::from(price),
            original_price: original_price.map(Decimal::from),
            stock,
            description: Some(description.to_owned()),
            image_url: image_url.to_owned(),
            notes: notes.iter().map(|n| (*n).to_owned()).collect(),
            status: "Active".to_owned(),
            rating,
            review_count,
            is_best_seller,
            is_featured,
            is_hero_carousel: false,
        }
    }

    vec![
        product(
            "Royal Oud Intense",
            "Oud",
            "Unisex",
            "50ml",
            4999,
            Some(6999),
            15,
            "Premium oud fragrance with rich, woody notes",
            &["Oud", "Rose", "Saffron"],
            Decimal::new(48, 1),
            124,
            true,
            true,
            "https://images.unsplash.com/photo-1541643600914-78b084683601?w=400&h=400&fit=crop",
        ),
        product(
            "Mystic Rose Attar",
            "Attar",
            "Traditional",
            "12ml",
            2499,
            Some(3499),
            8,
            "Traditional rose attar with jasmine undertones",
            &["Rose", "Jasmine", "Sandalwood"],
            Decimal::new(49, 1),
            89,
            true,
            false,
            "https://images.unsplash.com/photo-1594035910387-fea47794261f?w=400&h=400&fit=crop",
        ),
        product(
            "Midnight Elegance",
            "Perfume",
            "Male",
            "100ml",
            3999,
            Some(5499),
            12,
            "Sophisticated masculine fragrance for evening wear",
            &["Bergamot", "Cedar", "Musk"],
            Decimal::new(46, 1),
            67,
            false,
            true,
            "https://images.unsplash.com/photo-1523293182086-7651a899d37f?w=400&h=400&fit=crop",
        ),
        product(
            "Floral Dreams",
            "Perfume",
            "Female",
            "75ml",
            3499,
            None,
            20,
            "Delicate floral perfume perfect for daily wear",
            &["Peony", "Lily", "White Musk"],
            Decimal::new(47, 1),
            95,
            false,
            false,
            "https://images.unsplash.com/photo-1588405748880-12d1d2a59d75?w=400&h=400&fit=crop",
        ),
        product(
            "Saffron Majesty Attar",
            "Attar",
            "Traditional",
            "6ml",
            1999,
            None,
            15,
            "Pure saffron attar with royal essence",
            &["Saffron", "Rose", "Amber"],
            Decimal::new(48, 1),
            43,
            false,
            false,
            "https://images.unsplash.com/photo-1615634260167-c8cdede054de?w=400&h=400&fit=crop",
        ),
        product(
            "Luxury Gift Collection",
            "Gift Set",
            "Unisex",
            "Set of 3",
            7999,
            Some(9999),
            5,
            "Premium gift set with 3 signature fragrances",
            &["Mixed Collection"],
            Decimal::new(49, 1),
            28,
            false,
            true,
            "https://images.unsplash.com/photo-1549558549-415fe4c37b60?w=400&h=400&fit=crop",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_covers_every_category() {
        let products = demo_products();
        assert_eq!(products.len(), 6);
        for category in ["Attar", "Perfume", "Oud", "Gift Set"] {
            assert!(
                products.iter().any(|p| p.category == category),
                "missing demo product for {category}"
            );
        }
    }

    #[test]
    fn demo_catalog_is_entirely_active() {
        for product in demo_products() {
            assert_eq!(product.status, "Active");
            assert!(product.stock >= 0);
            assert!(!product.notes.is_empty());
        }
    }
}
