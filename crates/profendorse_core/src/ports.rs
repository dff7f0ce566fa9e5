//! crates/profendorse_core/src/ports.rs
//!
//! Defines the storage contract the lifecycle relies on.
//! Adapters (PostgreSQL, in-memory) live outside the core and implement these traits.

use async_trait::async_trait;
use uuid::Uuid;

use crate::display::DashboardTab;
use crate::domain::{ReferenceRequest, RequestStatus};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The stored state no longer matches what the caller expected.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Request Store
//=========================================================================================

/// Narrows a listing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub student_id: Option<String>,
    pub status: Option<RequestStatus>,
    pub tab: Option<DashboardTab>,
}

impl RequestFilter {
    pub fn matches(&self, request: &ReferenceRequest) -> bool {
        self.student_id
            .as_deref()
            .map_or(true, |id| request.student.id == id)
            && self.status.map_or(true, |status| request.status == status)
            && self.tab.map_or(true, |tab| tab.contains(request.status))
    }
}

#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Persists a freshly created request.
    async fn create_request(&self, request: &ReferenceRequest) -> PortResult<()>;

    async fn get_request(&self, request_id: Uuid) -> PortResult<ReferenceRequest>;

    /// Lists matching requests, most recently requested first.
    async fn list_requests(&self, filter: &RequestFilter) -> PortResult<Vec<ReferenceRequest>>;

    /// Persists the outcome of a transition: new status, draft letter and any
    /// history entries not yet stored.
    ///
    /// Fails with [`PortError::Conflict`] when the stored status is not
    /// `expected_status`, leaving storage untouched.
    async fn save_transition(
        &self,
        request: &ReferenceRequest,
        expected_status: RequestStatus,
    ) -> PortResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_request;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(RequestFilter::default().matches(&sample_request()));
    }

    #[test]
    fn filter_fields_combine() {
        let mut request = sample_request();
        request.status = RequestStatus::Rejected;

        let by_tab = RequestFilter {
            tab: Some(DashboardTab::Completed),
            ..Default::default()
        };
        assert!(by_tab.matches(&request));

        let mismatched = RequestFilter {
            student_id: Some("someone-else".to_string()),
            tab: Some(DashboardTab::Completed),
            ..Default::default()
        };
        assert!(!mismatched.matches(&request));

        let by_status = RequestFilter {
            status: Some(RequestStatus::Completed),
            ..Default::default()
        };
        assert!(!by_status.matches(&request));
    }
}
