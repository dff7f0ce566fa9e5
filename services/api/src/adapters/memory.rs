//! services/api/src/adapters/memory.rs
//!
//! In-memory implementation of the `RequestStore` port, used for tests and for
//! running the service without a database. Data is lost on restart.

use async_trait::async_trait;
use profendorse_core::domain::{ReferenceRequest, RequestStatus};
use profendorse_core::ports::{PortError, PortResult, RequestFilter, RequestStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

/// Request store backed by a shared map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRequestStore {
    requests: Arc<RwLock<HashMap<Uuid, ReferenceRequest>>>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `requests`.
    pub fn with_requests(requests: impl IntoIterator<Item = ReferenceRequest>) -> Self {
        let map = requests.into_iter().map(|r| (r.id, r)).collect();
        Self {
            requests: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn len(&self) -> usize {
        self.requests.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn create_request(&self, request: &ReferenceRequest) -> PortResult<()> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(&request.id) {
            return Err(PortError::Conflict(format!(
                "Request {} already exists",
                request.id
            )));
        }
        requests.insert(request.id, request.clone());
        debug!(request_id = %request.id, "Stored new request in memory");
        Ok(())
    }

    async fn get_request(&self, request_id: Uuid) -> PortResult<ReferenceRequest> {
        self.requests
            .read()
            .await
            .get(&request_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Request {} not found", request_id)))
    }

    async fn list_requests(&self, filter: &RequestFilter) -> PortResult<Vec<ReferenceRequest>> {
        let requests = self.requests.read().await;
        let mut matching: Vec<ReferenceRequest> = requests
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.request_date
                .cmp(&a.request_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matching)
    }

    async fn save_transition(
        &self,
        request: &ReferenceRequest,
        expected_status: RequestStatus,
    ) -> PortResult<()> {
        let mut requests = self.requests.write().await;
        let stored = requests
            .get_mut(&request.id)
            .ok_or_else(|| PortError::NotFound(format!("Request {} not found", request.id)))?;

        if stored.status != expected_status {
            warn!(
                request_id = %request.id,
                expected = %expected_status,
                actual = %stored.status,
                "Refusing stale transition"
            );
            return Err(PortError::Conflict(format!(
                "Request {} is '{}', expected '{}'",
                request.id, stored.status, expected_status
            )));
        }
        if !request.history.starts_with(&stored.history) {
            return Err(PortError::Conflict(format!(
                "Request {} history diverged from the stored history",
                request.id
            )));
        }

        stored.status = request.status;
        stored.reference_template = request.reference_template.clone();
        stored.history = request.history.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use profendorse_core::domain::Actor;
    use profendorse_core::testing::sample_request;
    use profendorse_core::DashboardTab;

    #[tokio::test]
    async fn create_and_get() {
        let store = InMemoryRequestStore::new();
        let request = sample_request();
        store.create_request(&request).await.unwrap();

        let found = store.get_request(request.id).await.unwrap();
        assert_eq!(found, request);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_create_conflicts() {
        let request = sample_request();
        let store = InMemoryRequestStore::with_requests([request.clone()]);
        assert!(matches!(
            store.create_request(&request).await,
            Err(PortError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let store = InMemoryRequestStore::new();
        assert!(matches!(
            store.get_request(Uuid::new_v4()).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn save_transition_is_compare_and_swap() {
        let original = sample_request();
        let store = InMemoryRequestStore::with_requests([original.clone()]);
        let prof = Actor::new("prof1");

        let mut first = original.clone();
        first.accept(&prof, None, Utc::now()).unwrap();
        store
            .save_transition(&first, RequestStatus::Pending)
            .await
            .unwrap();

        // A second session still holding the pending copy loses.
        let mut second = original.clone();
        second.reject(&prof, None, Utc::now()).unwrap();
        assert!(matches!(
            store.save_transition(&second, RequestStatus::Pending).await,
            Err(PortError::Conflict(_))
        ));

        let stored = store.get_request(original.id).await.unwrap();
        assert_eq!(stored.status, RequestStatus::InProgress);
        assert_eq!(stored.history.len(), 2);
        assert!(stored.reference_template.is_some());
    }

    #[tokio::test]
    async fn list_filters_by_tab() {
        let pending = sample_request();
        let mut rejected = sample_request();
        rejected.reject(&Actor::new("prof1"), None, Utc::now()).unwrap();
        let store = InMemoryRequestStore::with_requests([pending.clone(), rejected.clone()]);

        let completed_tab = RequestFilter {
            tab: Some(DashboardTab::Completed),
            ..Default::default()
        };
        let listed = store.list_requests(&completed_tab).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, rejected.id);

        let everything = store.list_requests(&RequestFilter::default()).await.unwrap();
        assert_eq!(everything.len(), 2);
    }
}
