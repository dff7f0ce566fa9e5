//! services/api/src/web/protocol.rs
//!
//! JSON payloads exchanged between the mobile client and the API server.

use chrono::NaiveDate;
use profendorse_core::display::{
    days_remaining, purpose_label, status_color, status_label, urgency_color, urgency_level,
    DashboardTab,
};
use profendorse_core::domain::{ReferenceRequest, ReferenceType, RequestStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client TO the Server
//=========================================================================================

/// Body of the accept and reject actions.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct TransitionPayload {
    /// The status the client saw when it loaded the request. Defaults to the
    /// stored status.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "pending")]
    pub expected_status: Option<RequestStatus>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Body of the complete action.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct CompletePayload {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "in_progress")]
    pub expected_status: Option<RequestStatus>,
    #[serde(default)]
    pub note: Option<String>,
    /// The professor's edited letter. Stored as-is when present.
    #[serde(default)]
    pub reference_template: Option<String>,
}

/// Query string of the listing endpoint.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// One of `pending`, `in_progress`, `completed`, `rejected`.
    pub status: Option<String>,
    /// Dashboard tab: `pending`, `in_progress` or `completed` (includes rejected).
    pub tab: Option<String>,
    pub student_id: Option<String>,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client
//=========================================================================================

/// Presentation values derived at render time.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct RequestDisplay {
    pub status_label: String,
    pub status_color: String,
    pub tab: String,
    pub purpose_label: String,
    pub days_remaining: Option<i64>,
    pub urgency_level: Option<String>,
    pub urgency_color: String,
}

impl RequestDisplay {
    pub fn new(request: &ReferenceRequest, today: NaiveDate) -> Self {
        let urgency = urgency_level(request.due_date, today);
        Self {
            status_label: status_label(request.status).to_string(),
            status_color: status_color(request.status).to_string(),
            tab: DashboardTab::for_status(request.status).as_str().to_string(),
            purpose_label: purpose_label(request.purpose, request.custom_purpose.as_deref()),
            days_remaining: days_remaining(request.due_date, today),
            urgency_level: urgency.map(|level| level.as_str().to_string()),
            urgency_color: urgency_color(urgency).to_string(),
        }
    }
}

/// A request together with its display values.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct RequestView {
    #[schema(value_type = Object)]
    pub request: ReferenceRequest,
    pub display: RequestDisplay,
}

impl RequestView {
    pub fn new(request: ReferenceRequest, today: NaiveDate) -> Self {
        let display = RequestDisplay::new(&request, today);
        Self { request, display }
    }
}

/// A freshly generated draft that has not been stored.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct TemplatePreview {
    pub request_id: Uuid,
    #[schema(value_type = String, example = "academic")]
    pub reference_type: ReferenceType,
    pub template: String,
}
