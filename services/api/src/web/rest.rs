//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::middleware::require_actor;
use crate::web::protocol::{
    CompletePayload, ListQuery, RequestDisplay, RequestView, TemplatePreview, TransitionPayload,
};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware as axum_middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use chrono::Utc;
use profendorse_core::display::DashboardTab;
use profendorse_core::domain::{Actor, NewReferenceRequest, ReferenceRequest, RequestStatus};
use profendorse_core::lifecycle::LifecycleError;
use profendorse_core::ports::{PortError, RequestFilter};
use profendorse_core::template::TemplateGenerator;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_request_handler,
        list_requests_handler,
        get_request_handler,
        preview_template_handler,
        accept_request_handler,
        reject_request_handler,
        complete_request_handler,
    ),
    components(
        schemas(RequestView, RequestDisplay, TemplatePreview, TransitionPayload, CompletePayload)
    ),
    tags(
        (name = "ProfEndorse API", description = "Reference letter requests between students and professors.")
    )
)]
pub struct ApiDoc;

/// Builds the API router. State-changing actions sit behind the identity middleware.
pub fn router(app_state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route(
            "/requests",
            post(create_request_handler).get(list_requests_handler),
        )
        .route("/requests/{id}", get(get_request_handler))
        .route("/requests/{id}/template", get(preview_template_handler));

    let protected_routes = Router::new()
        .route("/requests/{id}/accept", post(accept_request_handler))
        .route("/requests/{id}/reject", post(reject_request_handler))
        .route("/requests/{id}/complete", post(complete_request_handler))
        .layer(axum_middleware::from_fn(require_actor));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Status and message returned to the client on failure.
pub type HandlerError = (StatusCode, String);

fn port_error(e: PortError) -> HandlerError {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Conflict(msg) => (
            StatusCode::CONFLICT,
            format!("This request changed since you loaded it; reload and retry. ({})", msg),
        ),
        PortError::Unexpected(msg) => {
            error!("Request store failure: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

fn lifecycle_error(e: LifecycleError) -> HandlerError {
    match e {
        LifecycleError::InvalidTransition { .. } => (StatusCode::CONFLICT, e.to_string()),
        LifecycleError::ConcurrentModification { .. } => (
            StatusCode::CONFLICT,
            format!("This request changed since you loaded it; reload and retry. ({})", e),
        ),
    }
}

fn view(request: ReferenceRequest) -> RequestView {
    RequestView::new(request, Utc::now().date_naive())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Open a new reference request.
#[utoipa::path(
    post,
    path = "/requests",
    request_body(content_type = "application/json", description = "The student's submission."),
    responses(
        (status = 201, description = "Request created", body = RequestView),
        (status = 422, description = "Submission failed validation"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_request_handler(
    State(app_state): State<Arc<AppState>>,
    Json(new_request): Json<NewReferenceRequest>,
) -> Result<(StatusCode, Json<RequestView>), HandlerError> {
    let request = ReferenceRequest::create(new_request, Utc::now()).map_err(|e| {
        warn!("Rejected new request: {}", e);
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;

    app_state
        .store
        .create_request(&request)
        .await
        .map_err(port_error)?;

    Ok((StatusCode::CREATED, Json(view(request))))
}

/// List requests, optionally narrowed by status, dashboard tab or student.
#[utoipa::path(
    get,
    path = "/requests",
    params(ListQuery),
    responses(
        (status = 200, description = "Matching requests", body = Vec<RequestView>),
        (status = 400, description = "Unknown status or tab")
    )
)]
pub async fn list_requests_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RequestView>>, HandlerError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<RequestStatus>)
        .transpose()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let tab = query
        .tab
        .as_deref()
        .map(str::parse::<DashboardTab>)
        .transpose()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let filter = RequestFilter {
        student_id: query.student_id,
        status,
        tab,
    };
    let requests = app_state
        .store
        .list_requests(&filter)
        .await
        .map_err(port_error)?;

    let today = Utc::now().date_naive();
    Ok(Json(
        requests
            .into_iter()
            .map(|r| RequestView::new(r, today))
            .collect(),
    ))
}

/// Fetch one request with its full history.
#[utoipa::path(
    get,
    path = "/requests/{id}",
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "The request", body = RequestView),
        (status = 404, description = "Unknown request")
    )
)]
pub async fn get_request_handler(
    State(app_state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<RequestView>, HandlerError> {
    let request = app_state
        .store
        .get_request(request_id)
        .await
        .map_err(port_error)?;
    Ok(Json(view(request)))
}

/// Render a draft letter for the request without storing it.
#[utoipa::path(
    get,
    path = "/requests/{id}/template",
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Generated draft", body = TemplatePreview),
        (status = 404, description = "Unknown request")
    )
)]
pub async fn preview_template_handler(
    State(app_state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<TemplatePreview>, HandlerError> {
    let request = app_state
        .store
        .get_request(request_id)
        .await
        .map_err(port_error)?;

    Ok(Json(TemplatePreview {
        request_id,
        reference_type: request.reference_type,
        template: TemplateGenerator::generate(&request, Utc::now().date_naive()),
    }))
}

/// The professor action being applied.
enum Action {
    Accept,
    Reject,
    Complete { edited_template: Option<String> },
}

/// Loads the request, applies `action` and stores the result with a
/// compare-and-swap on the status that was loaded.
async fn apply_action(
    app_state: &AppState,
    request_id: Uuid,
    actor: &Actor,
    expected_status: Option<RequestStatus>,
    note: Option<String>,
    action: Action,
) -> Result<ReferenceRequest, HandlerError> {
    let mut request = app_state
        .store
        .get_request(request_id)
        .await
        .map_err(port_error)?;
    let loaded_status = request.status;
    if let Some(expected) = expected_status {
        request.expect_status(expected).map_err(lifecycle_error)?;
    }

    let now = Utc::now();
    let outcome = match action {
        Action::Accept => request.accept(actor, note, now),
        Action::Reject => request.reject(actor, note, now),
        Action::Complete { edited_template } => request.complete(actor, note, edited_template, now),
    };
    outcome.map(|_| ()).map_err(lifecycle_error)?;

    app_state
        .store
        .save_transition(&request, loaded_status)
        .await
        .map_err(port_error)?;

    info!(
        request_id = %request.id,
        from = %loaded_status,
        to = %request.status,
        actor = %actor,
        "Stored request transition"
    );
    Ok(request)
}

/// Accept a pending request and generate its draft letter.
#[utoipa::path(
    post,
    path = "/requests/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Request id"),
        ("x-actor-id" = String, Header, description = "Id of the acting professor.")
    ),
    request_body = TransitionPayload,
    responses(
        (status = 200, description = "Request accepted", body = RequestView),
        (status = 401, description = "Missing actor"),
        (status = 404, description = "Unknown request"),
        (status = 409, description = "Invalid transition or stale request")
    )
)]
pub async fn accept_request_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(request_id): Path<Uuid>,
    payload: Option<Json<TransitionPayload>>,
) -> Result<Json<RequestView>, HandlerError> {
    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    let request = apply_action(
        &app_state,
        request_id,
        &actor,
        payload.expected_status,
        payload.note,
        Action::Accept,
    )
    .await?;
    Ok(Json(view(request)))
}

/// Decline a pending or in-progress request.
#[utoipa::path(
    post,
    path = "/requests/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Request id"),
        ("x-actor-id" = String, Header, description = "Id of the acting professor.")
    ),
    request_body = TransitionPayload,
    responses(
        (status = 200, description = "Request rejected", body = RequestView),
        (status = 401, description = "Missing actor"),
        (status = 404, description = "Unknown request"),
        (status = 409, description = "Invalid transition or stale request")
    )
)]
pub async fn reject_request_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(request_id): Path<Uuid>,
    payload: Option<Json<TransitionPayload>>,
) -> Result<Json<RequestView>, HandlerError> {
    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    let request = apply_action(
        &app_state,
        request_id,
        &actor,
        payload.expected_status,
        payload.note,
        Action::Reject,
    )
    .await?;
    Ok(Json(view(request)))
}

/// Submit the final letter, optionally replacing the draft with the edited text.
#[utoipa::path(
    post,
    path = "/requests/{id}/complete",
    params(
        ("id" = Uuid, Path, description = "Request id"),
        ("x-actor-id" = String, Header, description = "Id of the acting professor.")
    ),
    request_body = CompletePayload,
    responses(
        (status = 200, description = "Request fulfilled", body = RequestView),
        (status = 401, description = "Missing actor"),
        (status = 404, description = "Unknown request"),
        (status = 409, description = "Invalid transition or stale request")
    )
)]
pub async fn complete_request_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(request_id): Path<Uuid>,
    payload: Option<Json<CompletePayload>>,
) -> Result<Json<RequestView>, HandlerError> {
    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    let request = apply_action(
        &app_state,
        request_id,
        &actor,
        payload.expected_status,
        payload.note,
        Action::Complete {
            edited_template: payload.reference_template,
        },
    )
    .await?;
    Ok(Json(view(request)))
}
