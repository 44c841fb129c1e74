/*
 * Responsibility
 * - /api/links handlers (list / create)
 * - The owner always comes from AuthCtx: filter on read, stamp on write
 * - Store failures bubble up as AppError::Store (status mapping lives in error.rs)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::links::{CreateLinkRequest, LinkResponse},
        extractors::{AppJson, AuthCtxExtractor},
    },
    error::AppError,
    state::AppState,
};

pub async fn list_links(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let rows = state.store.list_for_user(&auth.user_id).await?;

    tracing::debug!(user_id = %auth.user_id, count = rows.len(), "listed links");

    Ok(Json(rows.into_iter().map(LinkResponse::from).collect()))
}

pub async fn create_link(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    AppJson(req): AppJson<CreateLinkRequest>,
) -> Result<(StatusCode, Json<Vec<LinkResponse>>), AppError> {
    let rows = state.store.insert(req.into_new_link(&auth.user_id)).await?;

    tracing::info!(
        user_id = %auth.user_id,
        role = ?auth.claim("role"),
        "link created"
    );

    Ok((
        StatusCode::CREATED,
        Json(rows.into_iter().map(LinkResponse::from).collect()),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::app::build_router;
    use crate::middleware::cors::OriginPolicy;
    use crate::middleware::http::REQUEST_BODY_LIMIT;
    use crate::repos::memory::{FailingLinkStore, MemoryLinkStore, link_row};
    use crate::repos::LinkStore;
    use crate::services::identity::{IdentityService, tests::unsigned_token};
    use crate::state::AppState;

    use super::*;

    const U1_TOKEN: &str = "eyJzdWIiOiJ1MSJ9.sig";

    fn app_with(store: Arc<dyn LinkStore>) -> Router {
        let state = AppState::new(store, Arc::new(IdentityService::unverified()));
        build_router(state, OriginPolicy::new(None, None))
    }

    fn seeded() -> Arc<MemoryLinkStore> {
        Arc::new(MemoryLinkStore::with_rows(vec![
            link_row("u1", "Rust", "https://www.rust-lang.org"),
            link_row("u2", "Tokio", "https://tokio.rs"),
            link_row("u1", "Axum", "https://docs.rs/axum"),
        ]))
    }

    fn get_links(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::get("/api/links");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_links(auth: &str, body: Value) -> Request<Body> {
        Request::post("/api/links")
            .header(header::AUTHORIZATION, auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_or_non_bearer_header_is_401() {
        for auth in [None, Some("Token abc"), Some("bearer eyJzdWIiOiJ1MSJ9.sig")] {
            let res = app_with(seeded()).oneshot(get_links(auth)).await.unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "header {auth:?}");

            let body = json_body(res).await;
            assert_eq!(body["error"]["message"], "Invalid authorization header");
        }
    }

    #[tokio::test]
    async fn undecodable_token_is_401() {
        for auth in ["Bearer ", "Bearer garbage", "Bearer !!!.sig", "Bearer bm90IGpzb24.sig"] {
            let res = app_with(seeded())
                .oneshot(get_links(Some(auth)))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "header {auth:?}");

            let body = json_body(res).await;
            assert_eq!(body["error"]["message"], "Invalid token");
        }
    }

    #[tokio::test]
    async fn list_returns_only_callers_links() {
        let res = app_with(seeded())
            .oneshot(get_links(Some(&format!("Bearer {U1_TOKEN}"))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = json_body(res).await;
        let links = body.as_array().unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l["user_id"] == "u1"));
        assert_eq!(links[0]["title"], "Rust");
        assert_eq!(links[1]["url"], "https://docs.rs/axum");
    }

    #[tokio::test]
    async fn list_for_caller_without_links_is_empty() {
        let token = unsigned_token(&json!({"sub": "u3"}));
        let res = app_with(seeded())
            .oneshot(get_links(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await, json!([]));
    }

    #[tokio::test]
    async fn create_stamps_caller_and_ignores_body_user_id() {
        let store = Arc::new(MemoryLinkStore::default());
        let res = app_with(store.clone())
            .oneshot(post_links(
                &format!("Bearer {U1_TOKEN}"),
                json!({"title": "Example", "url": "https://example.com", "user_id": "u2"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let body = json_body(res).await;
        assert_eq!(body[0]["user_id"], "u1");
        assert_eq!(body[0]["title"], "Example");
        assert_eq!(body[0]["url"], "https://example.com");
        assert!(body[0]["id"].is_string());

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, "u1");
    }

    #[tokio::test]
    async fn created_link_shows_up_in_list() {
        let store = Arc::new(MemoryLinkStore::default());
        let auth = format!("Bearer {U1_TOKEN}");

        let created = app_with(store.clone())
            .oneshot(post_links(
                &auth,
                json!({"title": "Example", "url": "https://example.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);

        let listed = app_with(store)
            .oneshot(get_links(Some(&auth)))
            .await
            .unwrap();
        let body = json_body(listed).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Example");
    }

    #[tokio::test]
    async fn invalid_body_is_422_and_never_reaches_store() {
        let store = Arc::new(FailingLinkStore::default());
        let auth = format!("Bearer {U1_TOKEN}");

        for body in [
            json!({"title": "Example"}),
            json!({"url": "https://example.com"}),
            json!({"title": 1, "url": "https://example.com"}),
            json!({"title": "Example", "url": null}),
        ] {
            let res = app_with(store.clone())
                .oneshot(post_links(&auth, body.clone()))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY, "body {body}");

            let json = json_body(res).await;
            assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        }

        let not_json = Request::post("/api/links")
            .header(header::AUTHORIZATION, &auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{title:"))
            .unwrap();
        let res = app_with(store.clone()).oneshot(not_json).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn body_without_json_content_type_is_422() {
        let store = Arc::new(FailingLinkStore::default());
        let req = Request::post("/api/links")
            .header(header::AUTHORIZATION, format!("Bearer {U1_TOKEN}"))
            .body(Body::from(
                json!({"title": "Example", "url": "https://example.com"}).to_string(),
            ))
            .unwrap();

        let res = app_with(store.clone()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json_body(res).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn oversized_body_is_413_and_never_reaches_store() {
        let store = Arc::new(FailingLinkStore::default());
        let padding = "x".repeat(REQUEST_BODY_LIMIT * 2);
        let payload = json!({"title": padding, "url": "https://example.com"}).to_string();

        let req = Request::post("/api/links")
            .header(header::AUTHORIZATION, format!("Bearer {U1_TOKEN}"))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, payload.len())
            .body(Body::from(payload))
            .unwrap();

        let res = app_with(store.clone()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn unauthenticated_create_is_401_before_body_checks() {
        let store = Arc::new(MemoryLinkStore::default());
        let res = app_with(store.clone())
            .oneshot(post_links("Token x", json!({"title": "Example"})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn store_failure_on_list_is_500_with_upstream_message() {
        let res = app_with(Arc::new(FailingLinkStore::default()))
            .oneshot(get_links(Some(&format!("Bearer {U1_TOKEN}"))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(res).await;
        assert_eq!(body["error"]["message"], FailingLinkStore::MESSAGE);
    }

    #[tokio::test]
    async fn store_failure_on_create_is_500() {
        let store = Arc::new(FailingLinkStore::default());
        let res = app_with(store.clone())
            .oneshot(post_links(
                &format!("Bearer {U1_TOKEN}"),
                json!({"title": "Example", "url": "https://example.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.calls(), 1);

        let body = json_body(res).await;
        assert_eq!(body["error"]["code"], "STORE_ERROR");
    }

    #[tokio::test]
    async fn health_needs_no_token() {
        let res = app_with(seeded())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn unknown_api_path_is_404_not_401() {
        let res = app_with(seeded())
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
