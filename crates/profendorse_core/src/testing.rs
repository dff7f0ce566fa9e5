//! crates/profendorse_core/src/testing.rs
//!
//! Request fixtures shared by unit tests and by the service crate's tests.

use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::{
    AcademicPerformance, Actor, CourseInformation, NewReferenceRequest, ReferenceRequest,
    ReferenceType, RequestHistory, RequestPurpose, RequestStatus, Student, SubmissionKind,
    SubmissionMethod,
};

pub fn sample_student() -> Student {
    Student {
        id: "std1".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane.doe@university.edu".to_string(),
        institution: "University of Technology".to_string(),
        department: "Computer Science".to_string(),
        program: "BSc Computer Science".to_string(),
        year_of_study: "4".to_string(),
        expected_graduation: Some("2024".to_string()),
    }
}

/// A fully populated graduate-school submission.
pub fn sample_new_request() -> NewReferenceRequest {
    NewReferenceRequest {
        student: sample_student(),
        purpose: RequestPurpose::GraduateSchool,
        custom_purpose: None,
        due_date: NaiveDate::from_ymd_opt(2024, 6, 30),
        additional_notes: Some("Please highlight my research experience.".to_string()),
        documents: vec![],
        institutional_email: None,
        reference_type: ReferenceType::Academic,
        is_urgent: false,
        courses_with_professor: vec![
            CourseInformation {
                course_code: "CS401".to_string(),
                course_name: "Advanced Algorithms".to_string(),
                term_taken: "Fall 2023".to_string(),
                grade: Some("A".to_string()),
                achievements: vec![
                    "Top project in class".to_string(),
                    "Perfect score on final exam".to_string(),
                ],
                project_work: Some(
                    "Implemented a novel graph algorithm for social network analysis".to_string(),
                ),
            },
            CourseInformation {
                course_code: "CS450".to_string(),
                course_name: "Machine Learning".to_string(),
                term_taken: "Spring 2023".to_string(),
                grade: Some("A-".to_string()),
                achievements: vec!["Best presentation award".to_string()],
                project_work: None,
            },
        ],
        academic_performance: AcademicPerformance {
            gpa: Some("3.92".to_string()),
            academic_honors: vec!["Dean's List 2022-2023".to_string()],
            research_experience: Some("natural language processing".to_string()),
            publications: vec![],
            presentations: vec!["Department Research Symposium 2023".to_string()],
        },
        relationship_duration: "2 years".to_string(),
        interaction_context: vec!["Classroom".to_string(), "Research Lab".to_string()],
        strengths_and_qualities: vec![
            "Critical Thinking".to_string(),
            "Problem Solving".to_string(),
        ],
        extracurricular_activities: vec!["AI Student Society - President".to_string()],
        relevant_projects: vec!["An AI-powered study assistant".to_string()],
        career_goals: None,
        reason_for_request: "Applying to Ph.D. programs in Computer Science".to_string(),
        target_audience: Some("Stanford University".to_string()),
        deadline_instructions: None,
        submission_method: Some(SubmissionMethod {
            kind: SubmissionKind::Portal,
            details: "Graduate admissions portal".to_string(),
        }),
    }
}

/// [`sample_new_request`] opened as a `pending` request.
pub fn sample_request() -> ReferenceRequest {
    let created = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
    ReferenceRequest::create(sample_new_request(), created)
        .expect("sample submission is valid")
}

/// A request carrying only the fields a letter cannot do without.
pub fn minimal_request() -> ReferenceRequest {
    let created = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
    ReferenceRequest {
        id: Uuid::new_v4(),
        student: Student {
            id: "std9".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Lee".to_string(),
            email: "sam.lee@riverside.edu".to_string(),
            institution: "Riverside College".to_string(),
            department: String::new(),
            program: String::new(),
            year_of_study: String::new(),
            expected_graduation: None,
        },
        status: RequestStatus::Pending,
        purpose: RequestPurpose::JobApplication,
        custom_purpose: None,
        request_date: created.date_naive(),
        due_date: None,
        additional_notes: None,
        estimated_completion_date: None,
        history: vec![RequestHistory::new(
            RequestStatus::Pending,
            Actor::system(),
            None,
            created,
        )],
        documents: vec![],
        institutional_email: None,
        reference_type: ReferenceType::Academic,
        is_urgent: false,
        reference_template: None,
        courses_with_professor: vec![],
        academic_performance: AcademicPerformance::default(),
        relationship_duration: "one semester".to_string(),
        interaction_context: vec![],
        strengths_and_qualities: vec![],
        extracurricular_activities: vec![],
        relevant_projects: vec![],
        career_goals: None,
        reason_for_request: String::new(),
        target_audience: None,
        deadline_instructions: None,
        submission_method: None,
    }
}
