//! Database-backed tests for the storefront query layer. Each test runs
//! against a fresh schema via `#[sqlx::test]`.

use moonlight_db::{
    NewOrder, NewOrderItem, NewReview, ProductFilters, ProductInput, ProductPatch,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

fn sample_product(name: &str, category: &str, price: i64) -> ProductInput {
    ProductInput {
        name: name.to_owned(),
        category: category.to_owned(),
        sub_category: Some("Unisex".to_owned()),
        size: "50ml".to_owned(),
        price: Decimal::from(price),
        original_price: None,
        stock: 10,
        description: None,
        image_url: format!("https://cdn.example.com/{name}.jpg"),
        notes: vec!["Rose".to_owned()],
        status: "Active".to_owned(),
        rating: Decimal::ZERO,
        review_count: 0,
        is_best_seller: false,
        is_featured: false,
        is_hero_carousel: false,
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn listing_returns_only_active_products(pool: PgPool) {
    let active = moonlight_db::insert_product(&pool, &sample_product("Active Attar", "Attar", 1999))
        .await
        .expect("insert active");

    let mut inactive = sample_product("Retired Attar", "Attar", 1499);
    inactive.status = "Inactive".to_owned();
    moonlight_db::insert_product(&pool, &inactive)
        .await
        .expect("insert inactive");

    let rows = moonlight_db::list_products(
        &pool,
        ProductFilters {
            limit: 50,
            ..ProductFilters::default()
        },
    )
    .await
    .expect("list");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, active.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn listing_filters_compose(pool: PgPool) {
    let mut best_seller = sample_product("Hero Oud", "Oud", 4999);
    best_seller.is_best_seller = true;
    best_seller.is_hero_carousel = true;
    moonlight_db::insert_product(&pool, &best_seller)
        .await
        .expect("insert best seller");

    moonlight_db::insert_product(&pool, &sample_product("Plain Perfume", "Perfume", 2999))
        .await
        .expect("insert plain");

    let ouds = moonlight_db::list_products(
        &pool,
        ProductFilters {
            category: Some("Oud"),
            best_sellers: Some(true),
            limit: 50,
            ..ProductFilters::default()
        },
    )
    .await
    .expect("filtered list");
    assert_eq!(ouds.len(), 1);
    assert_eq!(ouds[0].name, "Hero Oud");

    let hero = moonlight_db::list_products(
        &pool,
        ProductFilters {
            hero_carousel: Some(true),
            limit: 50,
            ..ProductFilters::default()
        },
    )
    .await
    .expect("hero list");
    assert_eq!(hero.len(), 1);

    let none = moonlight_db::list_products(
        &pool,
        ProductFilters {
            category: Some("Perfume"),
            best_sellers: Some(true),
            limit: 50,
            ..ProductFilters::default()
        },
    )
    .await
    .expect("empty list");
    assert!(none.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn sparse_update_keeps_unsupplied_fields(pool: PgPool) {
    let row = moonlight_db::insert_product(&pool, &sample_product("Quick Edit", "Perfume", 2999))
        .await
        .expect("insert");

    let updated = moonlight_db::update_product(
        &pool,
        row.id,
        &ProductPatch {
            price: Some(Decimal::from(2499)),
            stock: Some(3),
            status: Some("Out of Stock".to_owned()),
            ..ProductPatch::default()
        },
    )
    .await
    .expect("update")
    .expect("row exists");

    assert_eq!(updated.price, Decimal::from(2499));
    assert_eq!(updated.stock, 3);
    assert_eq!(updated.status, "Out of Stock");
    assert_eq!(updated.name, "Quick Edit");
    assert_eq!(updated.sub_category.as_deref(), Some("Unisex"));

    // Explicitly clearing a nullable column writes NULL through.
    let cleared = moonlight_db::update_product(
        &pool,
        row.id,
        &ProductPatch {
            sub_category: Some(None),
            ..ProductPatch::default()
        },
    )
    .await
    .expect("clear")
    .expect("row exists");
    assert!(cleared.sub_category.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_of_missing_product_returns_none(pool: PgPool) {
    let result = moonlight_db::update_product(&pool, 9999, &ProductPatch::default())
        .await
        .expect("update");
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_order_snapshots_items_and_appends_address(pool: PgPool) {
    let product_a = moonlight_db::insert_product(&pool, &sample_product("Attar A", "Attar", 1000))
        .await
        .expect("insert a");
    let product_b = moonlight_db::insert_product(&pool, &sample_product("Perfume B", "Perfume", 2500))
        .await
        .expect("insert b");

    let order = NewOrder {
        order_id: "ORD-TEST000001",
        customer_phone: "+919876543210",
        customer_name: "Asha Verma",
        customer_email: Some("asha@example.com"),
        address: "14 Lotus Street",
        city: "Hyderabad",
        state: Some("Telangana"),
        pincode: "500001",
        subtotal: Decimal::from(4500),
        shipping: Decimal::ZERO,
        total: Decimal::from(4500),
    };
    let items = [
        NewOrderItem {
            product_id: Some(product_a.id),
            name: "Attar A",
            size: "50ml",
            price: Decimal::from(1000),
            quantity: 2,
        },
        NewOrderItem {
            product_id: Some(product_b.id),
            name: "Perfume B",
            size: "50ml",
            price: Decimal::from(2500),
            quantity: 1,
        },
    ];

    let placed = moonlight_db::create_order(&pool, &order, &items)
        .await
        .expect("create order");

    assert_eq!(placed.order.total, Decimal::from(4500));
    assert_eq!(placed.items.len(), 2);
    assert_eq!(placed.items[0].quantity, 2);

    // A second order from the same phone reuses the customer and appends a
    // second address row, even though the address is identical.
    let order_two = NewOrder {
        order_id: "ORD-TEST000002",
        ..order.clone()
    };
    moonlight_db::create_order(&pool, &order_two, &items)
        .await
        .expect("second order");

    let customer = moonlight_db::get_customer_by_phone(&pool, "+919876543210")
        .await
        .expect("lookup")
        .expect("customer exists");
    let addresses = moonlight_db::list_customer_addresses(&pool, customer.id)
        .await
        .expect("addresses");
    assert_eq!(addresses.len(), 2, "address history must append, not dedupe");
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_order_id_is_a_unique_violation(pool: PgPool) {
    let order = NewOrder {
        order_id: "ORD-DUPLICATE1",
        customer_phone: "+911111111111",
        customer_name: "Dup",
        customer_email: None,
        address: "1 Main",
        city: "Pune",
        state: None,
        pincode: "411001",
        subtotal: Decimal::from(100),
        shipping: Decimal::from(199),
        total: Decimal::from(299),
    };
    let items = [NewOrderItem {
        product_id: None,
        name: "Anything",
        size: "6ml",
        price: Decimal::from(100),
        quantity: 1,
    }];

    moonlight_db::create_order(&pool, &order, &items)
        .await
        .expect("first order");
    let err = moonlight_db::create_order(&pool, &order, &items)
        .await
        .expect_err("second order with same id must fail");
    assert!(err.is_unique_violation(), "expected 23505, got: {err:?}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn order_status_update_by_public_id(pool: PgPool) {
    let order = NewOrder {
        order_id: "ORD-STATUS0001",
        customer_phone: "+912222222222",
        customer_name: "Status",
        customer_email: None,
        address: "2 Main",
        city: "Pune",
        state: None,
        pincode: "411001",
        subtotal: Decimal::from(1500),
        shipping: Decimal::from(199),
        total: Decimal::from(1699),
    };
    moonlight_db::create_order(
        &pool,
        &order,
        &[NewOrderItem {
            product_id: None,
            name: "Attar",
            size: "12ml",
            price: Decimal::from(1500),
            quantity: 1,
        }],
    )
    .await
    .expect("create");

    let updated = moonlight_db::update_order_status(&pool, "ORD-STATUS0001", "Shipped")
        .await
        .expect("update")
        .expect("order exists");
    assert_eq!(updated.status, "Shipped");

    let missing = moonlight_db::update_order_status(&pool, "ORD-NOPE", "Shipped")
        .await
        .expect("update missing");
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn review_insert_refreshes_product_aggregate(pool: PgPool) {
    let product = moonlight_db::insert_product(&pool, &sample_product("Rated", "Attar", 1999))
        .await
        .expect("insert");

    for (phone, rating) in [("+911000000001", 5), ("+911000000002", 4), ("+911000000003", 4)] {
        moonlight_db::insert_review_and_refresh_rating(
            &pool,
            &NewReview {
                product_id: product.id,
                customer_phone: phone,
                customer_name: "Reviewer",
                rating,
                comment: None,
            },
        )
        .await
        .expect("insert review");
    }

    let refreshed = moonlight_db::get_product(&pool, product.id)
        .await
        .expect("get")
        .expect("exists");
    // mean(5, 4, 4) = 4.333… → 4.3 at one decimal
    assert_eq!(refreshed.rating, Decimal::new(43, 1));
    assert_eq!(refreshed.review_count, 3);

    let reviews = moonlight_db::list_approved_reviews(&pool, product.id)
        .await
        .expect("list reviews");
    assert_eq!(reviews.len(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_review_is_rejected_and_aggregate_unchanged(pool: PgPool) {
    let product = moonlight_db::insert_product(&pool, &sample_product("Once Only", "Oud", 4999))
        .await
        .expect("insert");

    moonlight_db::insert_review_and_refresh_rating(
        &pool,
        &NewReview {
            product_id: product.id,
            customer_phone: "+913333333333",
            customer_name: "First",
            rating: 5,
            comment: Some("lovely"),
        },
    )
    .await
    .expect("first review");

    let err = moonlight_db::insert_review_and_refresh_rating(
        &pool,
        &NewReview {
            product_id: product.id,
            customer_phone: "+913333333333",
            customer_name: "First Again",
            rating: 1,
            comment: None,
        },
    )
    .await
    .expect_err("duplicate must fail");
    assert!(err.is_unique_violation(), "expected 23505, got: {err:?}");

    let refreshed = moonlight_db::get_product(&pool, product.id)
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(refreshed.rating, Decimal::new(50, 1));
    assert_eq!(refreshed.review_count, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn expire_overdue_offers_only_touches_active_past_deadline(pool: PgPool) {
    use chrono::{Duration, Utc};

    let overdue = moonlight_db::NewOffer {
        title: "Festive 20",
        code: "FESTIVE20",
        kind: "percentage",
        discount: Decimal::from(20),
        valid_until: Utc::now() - Duration::days(1),
        max_uses: Some(100),
        min_order_amount: Decimal::from(999),
    };
    let current = moonlight_db::NewOffer {
        title: "Flat 500",
        code: "FLAT500",
        kind: "fixed",
        discount: Decimal::from(500),
        valid_until: Utc::now() + Duration::days(7),
        max_uses: None,
        min_order_amount: Decimal::ZERO,
    };
    moonlight_db::insert_offer(&pool, &overdue).await.expect("insert overdue");
    moonlight_db::insert_offer(&pool, &current).await.expect("insert current");

    let expired = moonlight_db::expire_overdue_offers(&pool).await.expect("sweep");
    assert_eq!(expired, 1);

    let offers = moonlight_db::list_offers(&pool).await.expect("list");
    let festive = offers.iter().find(|o| o.code == "FESTIVE20").expect("festive");
    let flat = offers.iter().find(|o| o.code == "FLAT500").expect("flat");
    assert_eq!(festive.status, "Expired");
    assert_eq!(flat.status, "Active");

    // The sweep is idempotent.
    let again = moonlight_db::expire_overdue_offers(&pool).await.expect("sweep again");
    assert_eq!(again, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn contact_lifecycle(pool: PgPool) {
    let contact = moonlight_db::insert_contact(
        &pool,
        &moonlight_db::NewContact {
            name: "Ravi",
            email: "ravi@example.com",
            phone: None,
            subject: "Delivery query",
            message: "Where is my order?",
        },
    )
    .await
    .expect("insert");
    assert_eq!(contact.status, "New");

    let updated = moonlight_db::update_contact_status(&pool, contact.id, "Read")
        .await
        .expect("update")
        .expect("exists");
    assert_eq!(updated.status, "Read");

    let all = moonlight_db::list_contacts(&pool).await.expect("list");
    assert_eq!(all.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn seeding_is_idempotent(pool: PgPool) {
    let first = moonlight_db::seed_products(&pool).await.expect("first seed");
    let second = moonlight_db::seed_products(&pool).await.expect("second seed");
    assert_eq!(first, second);

    let rows = moonlight_db::list_products(
        &pool,
        ProductFilters {
            limit: 50,
            ..ProductFilters::default()
        },
    )
    .await
    .expect("list");
    assert_eq!(rows.len(), first, "re-seeding must not duplicate products");

    moonlight_db::seed_admin(&pool, "admin@moonlight", "deadbeef")
        .await
        .expect("seed admin");
    let admin = moonlight_db::find_admin(&pool, "admin@moonlight")
        .await
        .expect("find")
        .expect("admin exists");
    assert_eq!(admin.password_sha256, "deadbeef");
    assert_eq!(admin.role, "admin");
}
