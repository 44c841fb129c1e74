/*
 * Responsibility
 * - URL layout under /api
 * - Every route here sits behind the bearer middleware
 */
use axum::{Router, routing::get};

use crate::api::handlers::links::{create_link, list_links};
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new().route("/links", get(list_links).post(create_link));

    access::apply(router, state)
}
