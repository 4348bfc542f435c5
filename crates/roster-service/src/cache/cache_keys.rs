//! Cache key generators for consistent key naming.

use roster_core::UserId;

/// Key under which a user record is cached: `user:{id}`.
#[must_use]
pub fn user_by_id(id: UserId) -> String {
    format!("user:{}", id)
}

/// Key for an ancillary per-route request counter.
#[must_use]
pub fn request_counter(route: &str) -> String {
    format!("stats:requests:{}", route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_by_id_key() {
        assert_eq!(user_by_id(UserId::new(42)), "user:42");
        assert_eq!(user_by_id(UserId::new(-1)), "user:-1");
    }

    #[test]
    fn test_request_counter_key() {
        assert_eq!(request_counter("users"), "stats:requests:users");
    }
}
