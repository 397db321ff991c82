//! Offline unit tests for moonlight-db pool configuration and row types.
//! These tests do not require a live database connection.

use moonlight_core::{AppConfig, Environment};
use moonlight_db::{OrderRow, PoolConfig, ProductRow};
use rust_decimal::Decimal;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        session_ttl_secs: 3600,
        otp_ttl_secs: 300,
        free_shipping_threshold: Decimal::from(2999),
        shipping_flat_fee: Decimal::from(199),
        product_page_size: 50,
        admin_username: "admin@moonlight".to_string(),
        admin_password: "moonlight2024".to_string(),
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`ProductRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn product_row_has_expected_fields() {
    use chrono::Utc;

    let row = ProductRow {
        id: 42_i64,
        name: "Royal Oud Intense".to_string(),
        category: "Oud".to_string(),
        sub_category: Some("Unisex".to_string()),
        size: "50ml".to_string(),
        price: Decimal::from(4999),
        original_price: Some(Decimal::from(6999)),
        stock: 15,
        description: Some("Premium oud fragrance".to_string()),
        image_url: "https://example.com/oud.jpg".to_string(),
        notes: vec!["Oud".to_string(), "Rose".to_string()],
        status: "Active".to_string(),
        rating: Decimal::new(48, 1),
        review_count: 124,
        is_best_seller: true,
        is_featured: true,
        is_hero_carousel: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.id, 42);
    assert_eq!(row.category, "Oud");
    assert_eq!(row.sub_category.as_deref(), Some("Unisex"));
    assert_eq!(row.rating, Decimal::new(48, 1));
    assert_eq!(row.notes.len(), 2);
    assert!(row.is_best_seller);
    assert!(!row.is_hero_carousel);
}

/// Compile-time smoke test: confirm that [`OrderRow`] snapshots the customer
/// and carries the totals invariant fields. No database required.
#[test]
fn order_row_has_expected_fields() {
    use chrono::Utc;

    let row = OrderRow {
        id: 1_i64,
        order_id: "ORD-7F3K2M9QXA".to_string(),
        customer_phone: "+919876543210".to_string(),
        customer_name: "Asha Verma".to_string(),
        customer_email: None,
        address: "14 Lotus Street".to_string(),
        city: "Hyderabad".to_string(),
        state: Some("Telangana".to_string()),
        pincode: "500001".to_string(),
        subtotal: Decimal::from(4500),
        shipping: Decimal::ZERO,
        total: Decimal::from(4500),
        status: "Pending".to_string(),
        payment_status: "Pending".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.order_id, "ORD-7F3K2M9QXA");
    assert_eq!(row.total, row.subtotal + row.shipping);
    assert_eq!(row.status, "Pending");
    assert_eq!(row.payment_status, "Pending");
}
