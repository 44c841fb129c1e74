/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - store: injected link store client handle, identity: bearer token decoder
 * - Cloned per request (everything inside is behind an Arc)
 */
use std::sync::Arc;

use crate::repos::LinkStore;
use crate::services::identity::IdentityService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LinkStore>,
    pub identity: Arc<IdentityService>,
}

impl AppState {
    pub fn new(store: Arc<dyn LinkStore>, identity: Arc<IdentityService>) -> Self {
        Self { store, identity }
    }
}
