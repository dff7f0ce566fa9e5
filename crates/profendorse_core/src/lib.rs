pub mod display;
pub mod domain;
pub mod lifecycle;
pub mod ports;
pub mod template;
pub mod validation;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use display::{status_color, status_label, urgency_color, urgency_level, DashboardTab, UrgencyLevel};
pub use domain::{
    AcademicPerformance, Actor, CourseInformation, Document, NewReferenceRequest, ReferenceRequest,
    ReferenceType, RequestHistory, RequestPurpose, RequestStatus, Student, SubmissionKind,
    SubmissionMethod,
};
pub use lifecycle::{transition, LifecycleError};
pub use ports::{PortError, PortResult, RequestFilter, RequestStore};
pub use template::TemplateGenerator;
pub use validation::{validate, ValidationError};
