//! Bearer token → `AuthCtx` in request extensions.
//!
//! - `Authorization: Bearer <token>` is required on every route this is applied to.
//! - Token decoding (and signature checks, when a secret is configured) lives in
//!   `services::identity`; this layer only wires the result into the request.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Require a bearer identity on every route of `router`.
///
/// `route_layer` keeps unmatched paths answering 404 instead of 401.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let identity = match state.identity.authenticate(auth) {
        Ok(identity) => identity,
        Err(err) => {
            // never log the token itself
            tracing::warn!(
                error = %err,
                method = %req.method(),
                path = %req.uri().path(),
                "bearer authentication failed"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(user_id = %identity.user_id, "caller identified");

    // middleware → extractor
    req.extensions_mut()
        .insert(AuthCtx::new(identity.user_id, identity.claims));

    Ok(next.run(req).await)
}
