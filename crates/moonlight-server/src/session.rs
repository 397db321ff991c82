//! Server-verified sessions.
//!
//! The browser holds nothing but an opaque bearer token; identity, role,
//! and the shopping cart live here, keyed by that token. Sessions expire
//! after a fixed TTL and are purged lazily on creation.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use moonlight_core::Cart;
use rand::Rng;
use tokio::sync::Mutex;

/// Who a session belongs to. Guests exist so a cart can be filled before
/// the customer verifies a phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Guest,
    Customer { phone: String },
    Admin { username: String },
}

impl Identity {
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Identity::Guest => Role::Guest,
            Identity::Customer { .. } => Role::Customer,
            Identity::Admin { .. } => Role::Admin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Guest,
    Customer,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug)]
struct SessionEntry {
    identity: Identity,
    cart: Cart,
    expires_at: Instant,
}

/// Shared in-process session map. Cloning shares the underlying state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Arc<Mutex<HashMap<String, SessionEntry>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a session for the given identity and return its token.
    pub async fn create(&self, identity: Identity) -> String {
        let token = new_token();
        let mut sessions = self.sessions.lock().await;
        purge_expired(&mut sessions);
        sessions.insert(
            token.clone(),
            SessionEntry {
                identity,
                cart: Cart::new(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Resolve a token to its identity. Expired sessions are removed and
    /// treated as absent.
    pub async fn identity(&self, token: &str) -> Option<Identity> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(token) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.identity.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Drop a session. Returns `true` when one existed.
    pub async fn destroy(&self, token: &str) -> bool {
        self.sessions.lock().await.remove(token).is_some()
    }

    /// Attach a verified customer identity to an existing session, keeping
    /// its cart, or create a fresh customer session when the caller had
    /// none. Returns the token to use from now on.
    pub async fn attach_customer(&self, token: Option<&str>, phone: &str) -> String {
        if let Some(token) = token {
            let mut sessions = self.sessions.lock().await;
            if let Some(entry) = sessions.get_mut(token) {
                if entry.expires_at > Instant::now() {
                    entry.identity = Identity::Customer {
                        phone: phone.to_owned(),
                    };
                    return token.to_owned();
                }
                sessions.remove(token);
            }
        }
        self.create(Identity::Customer {
            phone: phone.to_owned(),
        })
        .await
    }

    /// Run a closure against the session's cart, persisting whatever it
    /// mutates. Returns `None` for unknown or expired tokens.
    pub async fn with_cart<R>(&self, token: &str, f: impl FnOnce(&mut Cart) -> R) -> Option<R> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(token) {
            Some(entry) if entry.expires_at > Instant::now() => Some(f(&mut entry.cart)),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Snapshot the session's cart.
    pub async fn cart(&self, token: &str) -> Option<Cart> {
        self.with_cart(token, |cart| cart.clone()).await
    }
}

fn new_token() -> String {
    use std::fmt::Write;

    let bytes: [u8; 16] = rand::rng().random();
    let mut token = String::with_capacity(32);
    for byte in bytes {
        let _ = write!(token, "{byte:02x}");
    }
    token
}

fn purge_expired(sessions: &mut HashMap<String, SessionEntry>) {
    let now = Instant::now();
    sessions.retain(|_, entry| entry.expires_at > now);
}
