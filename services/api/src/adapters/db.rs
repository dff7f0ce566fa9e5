//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `RequestStore` port from the core crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use profendorse_core::display::DashboardTab;
use profendorse_core::domain::{
    AcademicPerformance, Actor, CourseInformation, Document, ReferenceRequest, ReferenceType,
    RequestHistory, RequestPurpose, RequestStatus, Student, SubmissionMethod,
};
use profendorse_core::ports::{PortError, PortResult, RequestFilter, RequestStore};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `RequestStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const REQUEST_COLUMNS: &str = "id, student, status, purpose, custom_purpose, request_date, \
    due_date, additional_notes, estimated_completion_date, documents, institutional_email, \
    reference_type, is_urgent, reference_template, courses_with_professor, academic_performance, \
    relationship_duration, interaction_context, strengths_and_qualities, \
    extracurricular_activities, relevant_projects, career_goals, reason_for_request, \
    target_audience, deadline_instructions, submission_method";

#[derive(FromRow)]
struct RequestRecord {
    id: Uuid,
    student: Json<Student>,
    status: String,
    purpose: String,
    custom_purpose: Option<String>,
    request_date: NaiveDate,
    due_date: Option<NaiveDate>,
    additional_notes: Option<String>,
    estimated_completion_date: Option<NaiveDate>,
    documents: Json<Vec<Document>>,
    institutional_email: Option<String>,
    reference_type: String,
    is_urgent: bool,
    reference_template: Option<String>,
    courses_with_professor: Json<Vec<CourseInformation>>,
    academic_performance: Json<AcademicPerformance>,
    relationship_duration: String,
    interaction_context: Vec<String>,
    strengths_and_qualities: Vec<String>,
    extracurricular_activities: Vec<String>,
    relevant_projects: Vec<String>,
    career_goals: Option<String>,
    reason_for_request: String,
    target_audience: Option<String>,
    deadline_instructions: Option<String>,
    submission_method: Option<Json<SubmissionMethod>>,
}

impl RequestRecord {
    fn to_domain(self, history: Vec<RequestHistory>) -> PortResult<ReferenceRequest> {
        let status = self
            .status
            .parse::<RequestStatus>()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let purpose = self
            .purpose
            .parse::<RequestPurpose>()
            .map_err(PortError::Unexpected)?;

        Ok(ReferenceRequest {
            id: self.id,
            student: self.student.0,
            status,
            purpose,
            custom_purpose: self.custom_purpose,
            request_date: self.request_date,
            due_date: self.due_date,
            additional_notes: self.additional_notes,
            estimated_completion_date: self.estimated_completion_date,
            history,
            documents: self.documents.0,
            institutional_email: self.institutional_email,
            reference_type: ReferenceType::from(self.reference_type.as_str()),
            is_urgent: self.is_urgent,
            reference_template: self.reference_template,
            courses_with_professor: self.courses_with_professor.0,
            academic_performance: self.academic_performance.0,
            relationship_duration: self.relationship_duration,
            interaction_context: self.interaction_context,
            strengths_and_qualities: self.strengths_and_qualities,
            extracurricular_activities: self.extracurricular_activities,
            relevant_projects: self.relevant_projects,
            career_goals: self.career_goals,
            reason_for_request: self.reason_for_request,
            target_audience: self.target_audience,
            deadline_instructions: self.deadline_instructions,
            submission_method: self.submission_method.map(|m| m.0),
        })
    }
}

#[derive(FromRow)]
struct HistoryRecord {
    id: Uuid,
    request_id: Uuid,
    status: String,
    recorded_at: DateTime<Utc>,
    updated_by: String,
    note: Option<String>,
}

impl HistoryRecord {
    fn to_domain(self) -> PortResult<RequestHistory> {
        Ok(RequestHistory {
            id: self.id,
            status: self
                .status
                .parse::<RequestStatus>()
                .map_err(|e| PortError::Unexpected(e.to_string()))?,
            timestamp: self.recorded_at,
            updated_by: Actor::new(self.updated_by),
            note: self.note,
        })
    }
}

/// Statuses a filter admits, or `None` for all of them.
fn admitted_statuses(filter: &RequestFilter) -> Option<Vec<String>> {
    if filter.status.is_none() && filter.tab.is_none() {
        return None;
    }
    Some(
        RequestStatus::ALL
            .into_iter()
            .filter(|s| filter.status.map_or(true, |wanted| wanted == *s))
            .filter(|s| filter.tab.map_or(true, |tab: DashboardTab| tab.contains(*s)))
            .map(|s| s.as_str().to_string())
            .collect(),
    )
}

//=========================================================================================
// History Helpers
//=========================================================================================

impl DbAdapter {
    async fn load_history(
        &self,
        request_ids: &[Uuid],
    ) -> PortResult<HashMap<Uuid, Vec<RequestHistory>>> {
        let records = sqlx::query_as::<_, HistoryRecord>(
            "SELECT id, request_id, status, recorded_at, updated_by, note FROM request_history \
             WHERE request_id = ANY($1) ORDER BY request_id, seq ASC",
        )
        .bind(request_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut by_request: HashMap<Uuid, Vec<RequestHistory>> = HashMap::new();
        for record in records {
            let request_id = record.request_id;
            by_request
                .entry(request_id)
                .or_default()
                .push(record.to_domain()?);
        }
        Ok(by_request)
    }

    async fn insert_history(
        tx: &mut Transaction<'_, Postgres>,
        request_id: Uuid,
        entries: &[RequestHistory],
        first_seq: usize,
    ) -> PortResult<()> {
        for (offset, entry) in entries.iter().enumerate() {
            sqlx::query(
                "INSERT INTO request_history (id, request_id, seq, status, recorded_at, updated_by, note) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(entry.id)
            .bind(request_id)
            .bind((first_seq + offset) as i32)
            .bind(entry.status.as_str())
            .bind(entry.timestamp)
            .bind(entry.updated_by.as_str())
            .bind(entry.note.as_deref())
            .execute(&mut **tx)
            .await
            .map_err(unexpected)?;
        }
        Ok(())
    }
}

//=========================================================================================
// `RequestStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl RequestStore for DbAdapter {
    async fn create_request(&self, request: &ReferenceRequest) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            "INSERT INTO reference_requests (id, student_id, student, status, purpose, custom_purpose, \
             request_date, due_date, additional_notes, estimated_completion_date, documents, \
             institutional_email, reference_type, is_urgent, reference_template, courses_with_professor, \
             academic_performance, relationship_duration, interaction_context, strengths_and_qualities, \
             extracurricular_activities, relevant_projects, career_goals, reason_for_request, \
             target_audience, deadline_instructions, submission_method) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
             $18, $19, $20, $21, $22, $23, $24, $25, $26, $27)",
        )
        .bind(request.id)
        .bind(&request.student.id)
        .bind(Json(&request.student))
        .bind(request.status.as_str())
        .bind(request.purpose.as_str())
        .bind(request.custom_purpose.as_deref())
        .bind(request.request_date)
        .bind(request.due_date)
        .bind(request.additional_notes.as_deref())
        .bind(request.estimated_completion_date)
        .bind(Json(&request.documents))
        .bind(request.institutional_email.as_deref())
        .bind(request.reference_type.as_str())
        .bind(request.is_urgent)
        .bind(request.reference_template.as_deref())
        .bind(Json(&request.courses_with_professor))
        .bind(Json(&request.academic_performance))
        .bind(&request.relationship_duration)
        .bind(&request.interaction_context)
        .bind(&request.strengths_and_qualities)
        .bind(&request.extracurricular_activities)
        .bind(&request.relevant_projects)
        .bind(request.career_goals.as_deref())
        .bind(&request.reason_for_request)
        .bind(request.target_audience.as_deref())
        .bind(request.deadline_instructions.as_deref())
        .bind(request.submission_method.as_ref().map(Json))
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Conflict(format!("Request {} already exists", request.id))
            }
            other => unexpected(other),
        })?;

        Self::insert_history(&mut tx, request.id, &request.history, 0).await?;
        tx.commit().await.map_err(unexpected)?;

        debug!(request_id = %request.id, "Inserted reference request");
        Ok(())
    }

    async fn get_request(&self, request_id: Uuid) -> PortResult<ReferenceRequest> {
        let record = sqlx::query_as::<_, RequestRecord>(&format!(
            "SELECT {} FROM reference_requests WHERE id = $1",
            REQUEST_COLUMNS
        ))
        .bind(request_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Request {} not found", request_id))
            }
            _ => unexpected(e),
        })?;

        let mut history = self.load_history(&[request_id]).await?;
        record.to_domain(history.remove(&request_id).unwrap_or_default())
    }

    async fn list_requests(&self, filter: &RequestFilter) -> PortResult<Vec<ReferenceRequest>> {
        let records = sqlx::query_as::<_, RequestRecord>(&format!(
            "SELECT {} FROM reference_requests \
             WHERE ($1::text IS NULL OR student_id = $1) \
             AND ($2::text[] IS NULL OR status = ANY($2)) \
             ORDER BY request_date DESC, created_at DESC",
            REQUEST_COLUMNS
        ))
        .bind(filter.student_id.as_deref())
        .bind(admitted_statuses(filter))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let mut history = self.load_history(&ids).await?;

        records
            .into_iter()
            .map(|record| {
                let entries = history.remove(&record.id).unwrap_or_default();
                record.to_domain(entries)
            })
            .collect()
    }

    async fn save_transition(
        &self,
        request: &ReferenceRequest,
        expected_status: RequestStatus,
    ) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let updated = sqlx::query(
            "UPDATE reference_requests SET status = $1, reference_template = $2 \
             WHERE id = $3 AND status = $4",
        )
        .bind(request.status.as_str())
        .bind(request.reference_template.as_deref())
        .bind(request.id)
        .bind(expected_status.as_str())
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        if updated.rows_affected() == 0 {
            let current = sqlx::query_scalar::<_, String>(
                "SELECT status FROM reference_requests WHERE id = $1",
            )
            .bind(request.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?;

            return Err(match current {
                None => PortError::NotFound(format!("Request {} not found", request.id)),
                Some(actual) => {
                    warn!(
                        request_id = %request.id,
                        expected = %expected_status,
                        %actual,
                        "Refusing stale transition"
                    );
                    PortError::Conflict(format!(
                        "Request {} is '{}', expected '{}'",
                        request.id, actual, expected_status
                    ))
                }
            });
        }

        let stored = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM request_history WHERE request_id = $1",
        )
        .bind(request.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)? as usize;

        if stored > request.history.len() {
            return Err(PortError::Conflict(format!(
                "Request {} history diverged from the stored history",
                request.id
            )));
        }
        Self::insert_history(&mut tx, request.id, &request.history[stored..], stored).await?;
        tx.commit().await.map_err(unexpected)?;

        debug!(request_id = %request.id, status = %request.status, "Persisted transition");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_listing_admits_every_status() {
        assert_eq!(admitted_statuses(&RequestFilter::default()), None);
    }

    #[test]
    fn completed_tab_admits_both_terminal_states() {
        let filter = RequestFilter {
            tab: Some(DashboardTab::Completed),
            ..Default::default()
        };
        assert_eq!(
            admitted_statuses(&filter),
            Some(vec!["completed".to_string(), "rejected".to_string()])
        );
    }

    #[test]
    fn status_and_tab_intersect() {
        let filter = RequestFilter {
            status: Some(RequestStatus::Pending),
            tab: Some(DashboardTab::Completed),
            ..Default::default()
        };
        assert_eq!(admitted_statuses(&filter), Some(vec![]));
    }
}
