//! One-time login codes for phone verification.
//!
//! Codes are held in process memory with a short TTL. Delivery is mocked:
//! the SMS provider sits outside this repository, so issuing a code only
//! logs it (at debug level outside development). A re-request replaces any
//! outstanding code for the phone number.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use rand::Rng;
use tokio::sync::Mutex;

#[derive(Debug)]
struct OtpEntry {
    code: String,
    expires_at: Instant,
}

/// Shared in-process OTP map. Cloning shares the underlying state.
#[derive(Debug, Clone)]
pub struct OtpStore {
    ttl: Duration,
    codes: Arc<Mutex<HashMap<String, OtpEntry>>>,
}

impl OtpStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            codes: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Generate a fresh 6-digit code for the phone number, replacing any
    /// outstanding one, and return it for delivery.
    pub async fn issue(&self, phone: &str) -> String {
        let code = format!("{:06}", rand::rng().random_range(0..1_000_000));
        let mut codes = self.codes.lock().await;
        codes.insert(
            phone.to_owned(),
            OtpEntry {
                code: code.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        code
    }

    /// Check a submitted code. A correct, unexpired code is consumed and
    /// returns `true`; a wrong code is left in place so the customer may
    /// retry; an expired code is discarded.
    pub async fn verify(&self, phone: &str, code: &str) -> bool {
        let mut codes = self.codes.lock().await;
        match codes.get(phone) {
            Some(entry) if entry.expires_at <= Instant::now() => {
                codes.remove(phone);
                false
            }
            Some(entry) if entry.code == code => {
                codes.remove(phone);
                true
            }
            _ => false,
        }
    }
}
