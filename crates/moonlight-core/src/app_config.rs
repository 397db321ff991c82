use std::net::SocketAddr;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub session_ttl_secs: u64,
    pub otp_ttl_secs: u64,
    pub free_shipping_threshold: Decimal,
    pub shipping_flat_fee: Decimal,
    pub product_page_size: i64,
    pub admin_username: String,
    pub admin_password: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("otp_ttl_secs", &self.otp_ttl_secs)
            .field("free_shipping_threshold", &self.free_shipping_threshold)
            .field("shipping_flat_fee", &self.shipping_flat_fee)
            .field("product_page_size", &self.product_page_size)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[redacted]")
            .finish()
    }
}
