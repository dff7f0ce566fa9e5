//! Routes requests through the full router, including the identity middleware.

use api_lib::adapters::InMemoryRequestStore;
use api_lib::config::Config;
use api_lib::web::middleware::ACTOR_HEADER;
use api_lib::web::router;
use api_lib::web::state::AppState;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use profendorse_core::domain::RequestStatus;
use profendorse_core::ports::RequestStore;
use profendorse_core::testing::sample_request;
use std::sync::Arc;
use tower::ServiceExt;

fn app(store: InMemoryRequestStore) -> axum::Router {
    let config = Config::from_lookup(|key| match key {
        "STORE_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .unwrap();
    router(Arc::new(AppState::new(Arc::new(store), Arc::new(config))))
}

fn accept(id: uuid::Uuid, actor: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(format!("/requests/{}/accept", id))
        .header(CONTENT_TYPE, "application/json");
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor);
    }
    builder.body(Body::from("{}")).unwrap()
}

#[tokio::test]
async fn transitions_require_an_actor() {
    let request = sample_request();
    let store = InMemoryRequestStore::with_requests([request.clone()]);

    let response = app(store.clone())
        .oneshot(accept(request.id, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(store.clone())
        .oneshot(accept(request.id, Some("  ")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let stored = store.get_request(request.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Pending);
}

#[tokio::test]
async fn actor_header_is_recorded_in_history() {
    let request = sample_request();
    let store = InMemoryRequestStore::with_requests([request.clone()]);

    let response = app(store.clone())
        .oneshot(accept(request.id, Some("prof42")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = store.get_request(request.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::InProgress);
    assert_eq!(stored.history.last().unwrap().updated_by.as_str(), "prof42");
}

#[tokio::test]
async fn reads_do_not_need_an_actor() {
    let request = sample_request();
    let store = InMemoryRequestStore::with_requests([request.clone()]);

    let response = app(store)
        .oneshot(
            Request::builder()
                .uri(format!("/requests/{}", request.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn actions_accept_an_empty_body() {
    let request = sample_request();
    let store = InMemoryRequestStore::with_requests([request.clone()]);

    let response = app(store.clone())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/requests/{}/accept", request.id))
                .header(ACTOR_HEADER, "prof1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(store.clone())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/requests/{}/complete", request.id))
                .header(ACTOR_HEADER, "prof1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = store.get_request(request.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Completed);
    assert_eq!(stored.history.len(), 3);
    assert!(stored.reference_template.is_some());
}
