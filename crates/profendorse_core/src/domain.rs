//! crates/profendorse_core/src/domain.rs
//!
//! Defines the core data structures for reference requests.
//! These structs carry no storage concerns; adapters map them to their own records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Enumerations
//=========================================================================================

/// Lifecycle state of a reference request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted by the student, waiting for the professor.
    Pending,
    /// Accepted; a draft letter exists and is being worked on.
    InProgress,
    /// Final letter submitted. Terminal.
    Completed,
    /// Declined by the professor. Terminal.
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::InProgress,
        RequestStatus::Completed,
        RequestStatus::Rejected,
    ];

    /// The wire/storage name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown request status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Why the student needs the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPurpose {
    GraduateSchool,
    JobApplication,
    Scholarship,
    ResearchPosition,
    Internship,
    Other,
}

impl RequestPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestPurpose::GraduateSchool => "graduate_school",
            RequestPurpose::JobApplication => "job_application",
            RequestPurpose::Scholarship => "scholarship",
            RequestPurpose::ResearchPosition => "research_position",
            RequestPurpose::Internship => "internship",
            RequestPurpose::Other => "other",
        }
    }
}

impl fmt::Display for RequestPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "graduate_school" => Ok(RequestPurpose::GraduateSchool),
            "job_application" => Ok(RequestPurpose::JobApplication),
            "scholarship" => Ok(RequestPurpose::Scholarship),
            "research_position" => Ok(RequestPurpose::ResearchPosition),
            "internship" => Ok(RequestPurpose::Internship),
            "other" => Ok(RequestPurpose::Other),
            _ => Err(format!("Unknown request purpose: {}", s)),
        }
    }
}

/// Selects the letter family. Fixed when the request is created.
///
/// Unknown names fall back to `Academic` when parsed or deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ReferenceType {
    #[default]
    Academic,
    Professional,
    Character,
}

impl ReferenceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceType::Academic => "academic",
            ReferenceType::Professional => "professional",
            ReferenceType::Character => "character",
        }
    }
}

impl From<&str> for ReferenceType {
    fn from(value: &str) -> Self {
        match value {
            "professional" => ReferenceType::Professional,
            "character" => ReferenceType::Character,
            _ => ReferenceType::Academic,
        }
    }
}

impl From<String> for ReferenceType {
    fn from(value: String) -> Self {
        ReferenceType::from(value.as_str())
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the finished letter reaches its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Email,
    Portal,
    Physical,
    Other,
}

//=========================================================================================
// Supporting Records
//=========================================================================================

/// The identifier recorded as `updated_by` on history entries.
///
/// Supplied by the surrounding identity provider; never authenticated here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    pub const SYSTEM: &'static str = "system";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The actor used for the creation entry of every request.
    pub fn system() -> Self {
        Self(Self::SYSTEM.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The student asking for the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub institution: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub year_of_study: String,
    #[serde(default)]
    pub expected_graduation: Option<String>,
}

/// Metadata for a file attached to a request (transcript, CV, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub doc_type: String,
    pub url: String,
    pub uploaded_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionMethod {
    pub kind: SubmissionKind,
    pub details: String,
}

/// A course the student took with the professor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInformation {
    pub course_code: String,
    pub course_name: String,
    pub term_taken: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub project_work: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicPerformance {
    #[serde(default)]
    pub gpa: Option<String>,
    #[serde(default)]
    pub academic_honors: Vec<String>,
    #[serde(default)]
    pub research_experience: Option<String>,
    #[serde(default)]
    pub publications: Vec<String>,
    #[serde(default)]
    pub presentations: Vec<String>,
}

/// One entry of a request's history. Never edited once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHistory {
    pub id: Uuid,
    /// The status being entered.
    pub status: RequestStatus,
    pub timestamp: DateTime<Utc>,
    pub updated_by: Actor,
    #[serde(default)]
    pub note: Option<String>,
}

impl RequestHistory {
    pub fn new(
        status: RequestStatus,
        updated_by: Actor,
        note: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            status,
            timestamp,
            updated_by,
            note,
        }
    }
}

//=========================================================================================
// Reference Request
//=========================================================================================

/// The central entity: a student's request for a reference letter.
///
/// `status` and `history` are only changed through the lifecycle methods in
/// [`crate::lifecycle`]; the last history entry always carries the current status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRequest {
    pub id: Uuid,
    pub student: Student,
    pub status: RequestStatus,
    pub purpose: RequestPurpose,
    #[serde(default)]
    pub custom_purpose: Option<String>,
    pub request_date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub estimated_completion_date: Option<NaiveDate>,
    pub history: Vec<RequestHistory>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub institutional_email: Option<String>,
    pub reference_type: ReferenceType,
    /// Set by the student at creation. Display urgency is computed from `due_date`.
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub reference_template: Option<String>,

    pub courses_with_professor: Vec<CourseInformation>,
    #[serde(default)]
    pub academic_performance: AcademicPerformance,
    pub relationship_duration: String,
    pub interaction_context: Vec<String>,
    pub strengths_and_qualities: Vec<String>,
    #[serde(default)]
    pub extracurricular_activities: Vec<String>,
    #[serde(default)]
    pub relevant_projects: Vec<String>,
    #[serde(default)]
    pub career_goals: Option<String>,
    pub reason_for_request: String,
    /// The institution, company or program the letter is addressed to.
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub deadline_instructions: Option<String>,
    #[serde(default)]
    pub submission_method: Option<SubmissionMethod>,
}

impl ReferenceRequest {
    /// The most recent history entry.
    pub fn last_history(&self) -> Option<&RequestHistory> {
        self.history.last()
    }
}

/// The data a student submits to open a new request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReferenceRequest {
    pub student: Student,
    pub purpose: RequestPurpose,
    #[serde(default)]
    pub custom_purpose: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub institutional_email: Option<String>,
    #[serde(default)]
    pub reference_type: ReferenceType,
    #[serde(default)]
    pub is_urgent: bool,
    pub courses_with_professor: Vec<CourseInformation>,
    #[serde(default)]
    pub academic_performance: AcademicPerformance,
    pub relationship_duration: String,
    pub interaction_context: Vec<String>,
    pub strengths_and_qualities: Vec<String>,
    #[serde(default)]
    pub extracurricular_activities: Vec<String>,
    #[serde(default)]
    pub relevant_projects: Vec<String>,
    #[serde(default)]
    pub career_goals: Option<String>,
    pub reason_for_request: String,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub deadline_instructions: Option<String>,
    #[serde(default)]
    pub submission_method: Option<SubmissionMethod>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_name() {
        for status in RequestStatus::ALL {
            assert_eq!(status.as_str().parse::<RequestStatus>(), Ok(status));
        }
        assert!("needs_info".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_string(&RequestStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn unknown_reference_type_falls_back_to_academic() {
        let parsed: ReferenceType = serde_json::from_str("\"recommendation\"").unwrap();
        assert_eq!(parsed, ReferenceType::Academic);

        let parsed: ReferenceType = serde_json::from_str("\"character\"").unwrap();
        assert_eq!(parsed, ReferenceType::Character);
    }

    #[test]
    fn actor_serializes_as_plain_string() {
        let json = serde_json::to_string(&Actor::new("prof1")).unwrap();
        assert_eq!(json, "\"prof1\"");
        assert_eq!(Actor::system().as_str(), "system");
    }
}
