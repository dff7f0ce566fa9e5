//! crates/profendorse_core/src/lifecycle.rs
//!
//! The request status state machine and its append-only history.
//!
//! ```text
//! pending ──accept──> in_progress ──complete──> completed
//!    │                     │
//!    └──────reject─────────┴──────reject──────> rejected
//! ```
//!
//! Every successful transition appends exactly one history entry. A failed
//! transition leaves the request untouched.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    Actor, NewReferenceRequest, ReferenceRequest, RequestHistory, RequestStatus,
};
use crate::template::TemplateGenerator;
use crate::validation::{validate, ValidationError};

/// Errors raised by lifecycle operations. None of them are retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Invalid transition from '{from}' to '{to}'")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
    #[error("Request changed since it was loaded: expected '{expected}', found '{actual}'")]
    ConcurrentModification {
        expected: RequestStatus,
        actual: RequestStatus,
    },
}

impl RequestStatus {
    /// Whether `self -> to` is an allowed transition. Self-loops never are.
    pub fn can_transition_to(self, to: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, to),
            (Pending, InProgress)
                | (Pending, Rejected)
                | (InProgress, Completed)
                | (InProgress, Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Rejected)
    }
}

impl ReferenceRequest {
    /// Validates a submission and opens it as a `pending` request with one
    /// `system` history entry.
    pub fn create(new: NewReferenceRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        validate(&new)?;

        let request = Self {
            id: Uuid::new_v4(),
            student: new.student,
            status: RequestStatus::Pending,
            purpose: new.purpose,
            custom_purpose: new.custom_purpose,
            request_date: now.date_naive(),
            due_date: new.due_date,
            additional_notes: new.additional_notes,
            estimated_completion_date: None,
            history: vec![RequestHistory::new(
                RequestStatus::Pending,
                Actor::system(),
                None,
                now,
            )],
            documents: new.documents,
            institutional_email: new.institutional_email,
            reference_type: new.reference_type,
            is_urgent: new.is_urgent,
            reference_template: None,
            courses_with_professor: new.courses_with_professor,
            academic_performance: new.academic_performance,
            relationship_duration: new.relationship_duration,
            interaction_context: new.interaction_context,
            strengths_and_qualities: new.strengths_and_qualities,
            extracurricular_activities: new.extracurricular_activities,
            relevant_projects: new.relevant_projects,
            career_goals: new.career_goals,
            reason_for_request: new.reason_for_request,
            target_audience: new.target_audience,
            deadline_instructions: new.deadline_instructions,
            submission_method: new.submission_method,
        };
        info!(request_id = %request.id, student_id = %request.student.id, "Reference request created");
        Ok(request)
    }

    /// Moves the request to `target`, recording `actor` and `note` in a new
    /// history entry. Entering `in_progress` regenerates the draft letter.
    pub fn transition(
        &mut self,
        target: RequestStatus,
        actor: &Actor,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&RequestHistory, LifecycleError> {
        let from = self.status;
        if !from.can_transition_to(target) {
            warn!(request_id = %self.id, %from, to = %target, "Rejected invalid transition");
            return Err(LifecycleError::InvalidTransition { from, to: target });
        }

        if target == RequestStatus::InProgress {
            self.reference_template =
                Some(TemplateGenerator::generate(self, now.date_naive()));
        }
        self.status = target;
        self.history
            .push(RequestHistory::new(target, actor.clone(), note, now));

        info!(request_id = %self.id, %from, to = %target, actor = %actor, "Request transitioned");
        Ok(&self.history[self.history.len() - 1])
    }

    /// Like [`transition`](Self::transition), but first checks that the request is
    /// still in the `expected` status the caller based its decision on.
    pub fn transition_expecting(
        &mut self,
        expected: RequestStatus,
        target: RequestStatus,
        actor: &Actor,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&RequestHistory, LifecycleError> {
        self.expect_status(expected)?;
        self.transition(target, actor, note, now)
    }

    /// Fails with `ConcurrentModification` unless the request is in `expected`.
    pub fn expect_status(&self, expected: RequestStatus) -> Result<(), LifecycleError> {
        if self.status != expected {
            warn!(request_id = %self.id, %expected, actual = %self.status, "Stale transition attempt");
            return Err(LifecycleError::ConcurrentModification {
                expected,
                actual: self.status,
            });
        }
        Ok(())
    }

    /// Professor accepts the request: `pending -> in_progress`.
    pub fn accept(
        &mut self,
        actor: &Actor,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&RequestHistory, LifecycleError> {
        self.transition(RequestStatus::InProgress, actor, note, now)
    }

    /// Professor declines the request from `pending` or `in_progress`.
    pub fn reject(
        &mut self,
        actor: &Actor,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&RequestHistory, LifecycleError> {
        self.transition(RequestStatus::Rejected, actor, note, now)
    }

    /// Professor submits the final letter: `in_progress -> completed`.
    ///
    /// A supplied `edited_template` replaces the stored draft in the same step;
    /// it is never regenerated here.
    pub fn complete(
        &mut self,
        actor: &Actor,
        note: Option<String>,
        edited_template: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&RequestHistory, LifecycleError> {
        if !self.status.can_transition_to(RequestStatus::Completed) {
            return Err(LifecycleError::InvalidTransition {
                from: self.status,
                to: RequestStatus::Completed,
            });
        }
        if let Some(text) = edited_template {
            self.reference_template = Some(text);
        }
        self.transition(RequestStatus::Completed, actor, note, now)
    }
}

/// Functional form of [`ReferenceRequest::transition`]: returns an updated copy and
/// leaves `request` as it was.
pub fn transition(
    request: &ReferenceRequest,
    target: RequestStatus,
    actor: &Actor,
    note: Option<String>,
    now: DateTime<Utc>,
) -> Result<ReferenceRequest, LifecycleError> {
    let mut next = request.clone();
    next.transition(target, actor, note, now)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_new_request, sample_request};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 9, 30, 0).unwrap()
    }

    fn prof() -> Actor {
        Actor::new("prof1")
    }

    #[test]
    fn create_starts_pending_with_system_entry() {
        let request = ReferenceRequest::create(sample_new_request(), now()).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.history.len(), 1);
        assert_eq!(request.history[0].status, RequestStatus::Pending);
        assert_eq!(request.history[0].updated_by, Actor::system());
        assert_eq!(request.request_date, now().date_naive());
        assert!(request.reference_template.is_none());
    }

    #[test]
    fn create_rejects_invalid_submission() {
        let mut new = sample_new_request();
        new.strengths_and_qualities.clear();
        assert_eq!(
            ReferenceRequest::create(new, now()),
            Err(ValidationError::NoStrengths)
        );
    }

    #[test]
    fn transition_table_is_exact() {
        use RequestStatus::*;
        let allowed = [
            (Pending, InProgress),
            (Pending, Rejected),
            (InProgress, Completed),
            (InProgress, Rejected),
        ];
        for from in RequestStatus::ALL {
            for to in RequestStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn pending_cannot_complete() {
        let mut request = sample_request();
        let before = request.clone();
        let err = request
            .transition(RequestStatus::Completed, &prof(), None, now())
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: RequestStatus::Pending,
                to: RequestStatus::Completed
            }
        );
        assert_eq!(request, before);
    }

    #[test]
    fn self_transition_is_always_invalid() {
        let mut request = sample_request();
        for status in RequestStatus::ALL {
            request.status = status;
            request.history.last_mut().unwrap().status = status;
            let before = request.clone();
            assert!(matches!(
                request.transition(status, &prof(), None, now()),
                Err(LifecycleError::InvalidTransition { .. })
            ));
            assert_eq!(request, before);
        }
    }

    #[test]
    fn successful_transition_appends_one_entry() {
        let mut request = sample_request();
        let prior = request.history.clone();

        request
            .reject(&prof(), Some("Not enough contact".to_string()), now())
            .unwrap();

        assert_eq!(request.history.len(), prior.len() + 1);
        assert_eq!(&request.history[..prior.len()], &prior[..]);
        let last = request.last_history().unwrap();
        assert_eq!(last.status, request.status);
        assert_eq!(last.updated_by, prof());
        assert_eq!(last.note.as_deref(), Some("Not enough contact"));
        assert_eq!(last.timestamp, now());
    }

    #[test]
    fn terminal_states_accept_nothing() {
        let mut request = sample_request();
        request.reject(&prof(), None, now()).unwrap();
        for target in RequestStatus::ALL {
            assert!(request.transition(target, &prof(), None, now()).is_err());
        }
        assert_eq!(request.history.len(), 2);
    }

    #[test]
    fn accepting_generates_draft() {
        let mut request = sample_request();
        request.accept(&prof(), None, now()).unwrap();
        let draft = request.reference_template.as_deref().unwrap();
        assert!(draft.contains("Jane"));
        assert!(draft.starts_with("March 20, 2024"));
    }

    #[test]
    fn stale_expected_status_is_a_concurrent_modification() {
        let mut request = sample_request();
        request.accept(&prof(), None, now()).unwrap();
        let before = request.clone();

        let err = request
            .transition_expecting(
                RequestStatus::Pending,
                RequestStatus::Rejected,
                &prof(),
                None,
                now(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::ConcurrentModification {
                expected: RequestStatus::Pending,
                actual: RequestStatus::InProgress
            }
        );
        assert_eq!(request, before);
    }

    #[test]
    fn functional_transition_leaves_input_alone() {
        let request = sample_request();
        let next = transition(&request, RequestStatus::InProgress, &prof(), None, now()).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.history.len(), 1);
        assert_eq!(next.status, RequestStatus::InProgress);
        assert_eq!(next.history.len(), 2);
    }

    #[test]
    fn complete_on_pending_keeps_existing_template() {
        let mut request = sample_request();
        let err = request
            .complete(&prof(), None, Some("edited".to_string()), now())
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
        assert!(request.reference_template.is_none());
    }

    #[test]
    fn end_to_end_accept_then_complete_with_edited_letter() {
        let mut request = sample_request();
        assert_eq!(request.history.len(), 1);

        request
            .transition(
                RequestStatus::InProgress,
                &prof(),
                Some("accepted".to_string()),
                now(),
            )
            .unwrap();
        assert_eq!(request.status, RequestStatus::InProgress);
        assert_eq!(request.history.len(), 2);
        let draft = request.reference_template.clone().unwrap();
        assert!(!draft.is_empty());
        assert!(draft.contains(&request.student.first_name));

        let edited = format!("{}\n\nP.S. Hand-edited closing.", draft);
        request
            .complete(&prof(), None, Some(edited.clone()), now())
            .unwrap();
        assert_eq!(request.status, RequestStatus::Completed);
        assert_eq!(request.history.len(), 3);
        assert_eq!(request.reference_template.as_deref(), Some(edited.as_str()));
    }
}
