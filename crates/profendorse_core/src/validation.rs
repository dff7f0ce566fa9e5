//! crates/profendorse_core/src/validation.rs
//!
//! Checks a student's submission before a request is created.

use crate::domain::{NewReferenceRequest, RequestPurpose};

/// Why a new request was refused. Checks run in declaration order and the first
/// failure is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("A custom purpose is required when the purpose is 'other'")]
    MissingCustomPurpose,
    #[error("At least one course taken with the professor is required")]
    NoCourses,
    #[error("Course #{0} is missing its code, name or term")]
    IncompleteCourse(usize),
    #[error("The duration of the relationship with the professor is required")]
    MissingRelationshipDuration,
    #[error("At least one interaction context is required")]
    NoInteractionContext,
    #[error("At least one strength or quality is required")]
    NoStrengths,
    #[error("A reason for the request is required")]
    MissingReason,
    #[error("Submission method details are required")]
    MissingSubmissionDetails,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validates a submission. Template generation never repeats these checks.
pub fn validate(new: &NewReferenceRequest) -> Result<(), ValidationError> {
    if new.purpose == RequestPurpose::Other
        && new.custom_purpose.as_deref().map_or(true, is_blank)
    {
        return Err(ValidationError::MissingCustomPurpose);
    }

    if new.courses_with_professor.is_empty() {
        return Err(ValidationError::NoCourses);
    }
    if let Some(index) = new.courses_with_professor.iter().position(|c| {
        is_blank(&c.course_code) || is_blank(&c.course_name) || is_blank(&c.term_taken)
    }) {
        return Err(ValidationError::IncompleteCourse(index + 1));
    }

    if is_blank(&new.relationship_duration) {
        return Err(ValidationError::MissingRelationshipDuration);
    }
    if new.interaction_context.is_empty() {
        return Err(ValidationError::NoInteractionContext);
    }
    if new.strengths_and_qualities.is_empty() {
        return Err(ValidationError::NoStrengths);
    }
    if is_blank(&new.reason_for_request) {
        return Err(ValidationError::MissingReason);
    }
    if let Some(method) = &new.submission_method {
        if is_blank(&method.details) {
            return Err(ValidationError::MissingSubmissionDetails);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_new_request;
    use crate::domain::{SubmissionKind, SubmissionMethod};

    #[test]
    fn accepts_complete_submission() {
        assert_eq!(validate(&sample_new_request()), Ok(()));
    }

    #[test]
    fn other_purpose_needs_custom_text() {
        let mut new = sample_new_request();
        new.purpose = RequestPurpose::Other;
        new.custom_purpose = Some("   ".to_string());
        assert_eq!(validate(&new), Err(ValidationError::MissingCustomPurpose));

        new.custom_purpose = Some("Exchange program".to_string());
        assert_eq!(validate(&new), Ok(()));
    }

    #[test]
    fn reports_first_incomplete_course() {
        let mut new = sample_new_request();
        let mut broken = new.courses_with_professor[0].clone();
        broken.term_taken = String::new();
        new.courses_with_professor.push(broken);
        assert_eq!(validate(&new), Err(ValidationError::IncompleteCourse(3)));
    }

    #[test]
    fn rejects_missing_required_text() {
        let mut new = sample_new_request();
        new.courses_with_professor.clear();
        assert_eq!(validate(&new), Err(ValidationError::NoCourses));

        let mut new = sample_new_request();
        new.relationship_duration = " ".to_string();
        assert_eq!(validate(&new), Err(ValidationError::MissingRelationshipDuration));

        let mut new = sample_new_request();
        new.interaction_context.clear();
        assert_eq!(validate(&new), Err(ValidationError::NoInteractionContext));

        let mut new = sample_new_request();
        new.strengths_and_qualities.clear();
        assert_eq!(validate(&new), Err(ValidationError::NoStrengths));

        let mut new = sample_new_request();
        new.reason_for_request.clear();
        assert_eq!(validate(&new), Err(ValidationError::MissingReason));
    }

    #[test]
    fn submission_method_needs_details() {
        let mut new = sample_new_request();
        new.submission_method = Some(SubmissionMethod {
            kind: SubmissionKind::Portal,
            details: String::new(),
        });
        assert_eq!(validate(&new), Err(ValidationError::MissingSubmissionDetails));
    }
}
