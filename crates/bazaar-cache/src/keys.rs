//! Cache key generators for consistent key naming.
//!
//! These are logical keys; the cache service adds the deployment prefix.

/// Generate the key for a user session.
#[must_use]
pub fn session(session_id: &str) -> String {
    format!("session:{}", session_id)
}

/// Generate the key for an order.
#[must_use]
pub fn order(order_id: &str) -> String {
    format!("order:{}", order_id)
}

/// Generate the key for a service listing.
#[must_use]
pub fn service(service_id: &str) -> String {
    format!("service:{}", service_id)
}

/// Generate the key for a user's cart hash.
#[must_use]
pub fn cart(user_id: &str) -> String {
    format!("cart:{}", user_id)
}

/// Generate the key for a user's recently viewed services list.
#[must_use]
pub fn recently_viewed(user_id: &str) -> String {
    format!("recent:{}", user_id)
}

/// Key written by the startup self-test.
#[must_use]
pub fn startup_check() -> &'static str {
    "server_start_test"
}

/// Pattern to invalidate every cached service listing.
#[must_use]
pub fn services_pattern() -> String {
    "service:*".to_string()
}

/// Pattern to invalidate every cached order.
#[must_use]
pub fn orders_pattern() -> String {
    "order:*".to_string()
}

/// Pattern to invalidate every session.
#[must_use]
pub fn sessions_pattern() -> String {
    "session:*".to_string()
}
