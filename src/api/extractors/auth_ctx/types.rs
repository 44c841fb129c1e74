/*
 * Responsibility
 * - The "authenticated caller" type handlers see
 * - The bearer middleware builds it and stores it in request extensions
 */
use serde_json::{Map, Value};

/// Context attached to an authenticated request.
///
/// - `user_id` is the token's `sub` claim; every link read or written is scoped to it
/// - `claims` is the full decoded payload
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: String,
    pub claims: Map<String, Value>,
}

impl AuthCtx {
    pub fn new(user_id: String, claims: Map<String, Value>) -> Self {
        Self { user_id, claims }
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }
}
