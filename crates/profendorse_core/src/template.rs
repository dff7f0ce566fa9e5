//! crates/profendorse_core/src/template.rs
//!
//! Builds the draft reference letter from a request's data.
//!
//! Each reference type has its own prose skeleton; all three share the same
//! data slots. Optional data that is missing drops its sentence rather than
//! leaving a hole in the text.

use chrono::NaiveDate;

use crate::display::{format_long_date, purpose_label};
use crate::domain::{AcademicPerformance, CourseInformation, ReferenceRequest, ReferenceType};

const DEFAULT_SALUTATION: &str = "To Whom It May Concern";

const SIGNATURE: &str = "Sincerely,\n[Professor's Name]\n[Department]\n[Institution]";

/// Stateless draft generator.
pub struct TemplateGenerator;

impl TemplateGenerator {
    /// Renders the letter for `request`, stamped with `date`.
    ///
    /// Same request and same date always give the same text.
    pub fn generate(request: &ReferenceRequest, date: NaiveDate) -> String {
        let ctx = LetterContext::new(request, date);
        let paragraphs = match request.reference_type {
            ReferenceType::Academic => academic_letter(&ctx),
            ReferenceType::Professional => professional_letter(&ctx),
            ReferenceType::Character => character_letter(&ctx),
        };

        let mut sections = vec![ctx.date.clone(), format!("{}:", ctx.salutation)];
        sections.extend(paragraphs.into_iter().filter(|p| !p.is_empty()));
        sections.push(SIGNATURE.to_string());
        sections.join("\n\n")
    }
}

//=========================================================================================
// Derived Fragments
//=========================================================================================

/// "{name} ({code}) during {term}[, achieving a grade of ..][. Notable achievements include: ..][. {project}]",
/// joined with ". " in course order.
pub fn course_summary(courses: &[CourseInformation]) -> String {
    courses
        .iter()
        .map(|course| {
            let mut text = format!(
                "{} ({}) during {}",
                course.course_name, course.course_code, course.term_taken
            );
            if let Some(grade) = non_empty(&course.grade) {
                text.push_str(&format!(", achieving a grade of {}", grade));
            }
            if !course.achievements.is_empty() {
                text.push_str(&format!(
                    ". Notable achievements include: {}",
                    course.achievements.join(", ")
                ));
            }
            if let Some(project) = non_empty(&course.project_work) {
                text.push_str(&format!(". {}", project));
            }
            text
        })
        .collect::<Vec<_>>()
        .join(". ")
}

/// Clauses in fixed order (GPA, honors, research, publications, presentations),
/// listed as natural language: "a, b, and c".
pub fn achievement_summary(performance: &AcademicPerformance) -> String {
    let mut clauses = Vec::new();
    if let Some(gpa) = non_empty(&performance.gpa) {
        clauses.push(format!("maintained a GPA of {}", gpa));
    }
    if !performance.academic_honors.is_empty() {
        clauses.push(format!("received {}", performance.academic_honors.join(", ")));
    }
    if let Some(research) = non_empty(&performance.research_experience) {
        clauses.push(format!("gained valuable research experience in {}", research));
    }
    if !performance.publications.is_empty() {
        clauses.push(format!(
            "contributed to publications including {}",
            performance.publications.join(", ")
        ));
    }
    if !performance.presentations.is_empty() {
        clauses.push(format!(
            "presented research at {}",
            performance.presentations.join(", ")
        ));
    }
    natural_list(&clauses)
}

/// Strengths in the order given, no dedup.
pub fn qualities_summary(strengths: &[String]) -> String {
    strengths.join(", ")
}

fn natural_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

fn joined(items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| items.join(", "))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

//=========================================================================================
// Letter Context
//=========================================================================================

/// Every value a skeleton can interpolate, computed once.
struct LetterContext<'a> {
    date: String,
    salutation: String,
    first_name: &'a str,
    full_name: String,
    institution: &'a str,
    relationship_duration: &'a str,
    contexts: Option<String>,
    purpose: String,
    courses: String,
    achievements: String,
    qualities: String,
    projects: Option<String>,
    activities: Option<String>,
    career_goals: Option<&'a str>,
}

impl<'a> LetterContext<'a> {
    fn new(request: &'a ReferenceRequest, date: NaiveDate) -> Self {
        let student = &request.student;

        Self {
            date: format_long_date(date),
            salutation: match non_empty(&request.target_audience) {
                Some(audience) => format!("To: {}", audience),
                None => DEFAULT_SALUTATION.to_string(),
            },
            first_name: &student.first_name,
            full_name: format!("{} {}", student.first_name, student.last_name),
            institution: &student.institution,
            relationship_duration: &request.relationship_duration,
            contexts: joined(&request.interaction_context),
            purpose: purpose_label(request.purpose, request.custom_purpose.as_deref()),
            courses: course_summary(&request.courses_with_professor),
            achievements: achievement_summary(&request.academic_performance),
            qualities: qualities_summary(&request.strengths_and_qualities),
            projects: joined(&request.relevant_projects),
            activities: joined(&request.extracurricular_activities),
            career_goals: non_empty(&request.career_goals),
        }
    }
}

//=========================================================================================
// Skeletons
//=========================================================================================

fn academic_letter(c: &LetterContext) -> Vec<String> {
    let name = c.first_name;
    let through = c
        .contexts
        .as_ref()
        .map(|contexts| format!(" through our interactions in {}", contexts))
        .unwrap_or_default();
    let mut body = vec![format!(
        "I am writing this letter to strongly recommend {}, who is applying for {}. \
         As a professor at {}, I have had the pleasure of knowing {} for {}{}.",
        c.full_name, c.purpose, c.institution, name, c.relationship_duration, through
    )];

    if !c.courses.is_empty() {
        body.push(format!(
            "During this time, {} has taken the following courses with me: {}.",
            name, c.courses
        ));
    }

    let mut performance = Vec::new();
    if !c.achievements.is_empty() {
        performance.push(format!(
            "{} has demonstrated exceptional academic performance, where they {}.",
            name, c.achievements
        ));
    }
    if !c.qualities.is_empty() {
        performance.push(format!(
            "What truly sets {} apart are their outstanding qualities of {}.",
            name, c.qualities
        ));
    }
    body.push(performance.join(" "));

    let mut extras = Vec::new();
    if let Some(projects) = &c.projects {
        extras.push(format!(
            "I was particularly impressed by their work on {}.",
            projects
        ));
    }
    if let Some(activities) = &c.activities {
        extras.push(format!(
            "Beyond academics, {} has shown leadership and initiative through involvement in {}.",
            name, activities
        ));
    }
    body.push(extras.join("\n"));

    body.push(match c.career_goals {
        Some(goals) => format!(
            "{}'s career goal is to {}, and I am confident that their academic preparation and \
             personal qualities make them an excellent candidate for this opportunity.",
            name, goals
        ),
        None => format!(
            "I am confident that {} would be an outstanding candidate for {}.",
            name, c.purpose
        ),
    });

    body.push(
        "Please feel free to contact me if you require any additional information.".to_string(),
    );
    body
}

fn professional_letter(c: &LetterContext) -> Vec<String> {
    let name = c.first_name;
    let through = c
        .contexts
        .as_ref()
        .map(|contexts| format!(" through {}", contexts))
        .unwrap_or_default();
    let mut body = vec![format!(
        "I am writing to provide my highest recommendation for {}, who is seeking {}. \
         As their professor at {}, I have known {} for {}{}.",
        c.full_name, c.purpose, c.institution, name, c.relationship_duration, through
    )];

    let mut observed = Vec::new();
    if !c.courses.is_empty() {
        observed.push(format!(
            "During our association, I have observed {}'s exceptional capabilities through {}.",
            name, c.courses
        ));
    }
    if !c.qualities.is_empty() {
        observed.push(format!(
            "{} has consistently demonstrated {}, which are essential qualities for success in their chosen field.",
            name, c.qualities
        ));
    }
    body.push(observed.join(" "));

    if !c.achievements.is_empty() {
        body.push(format!(
            "Their academic achievements include: {}.",
            c.achievements
        ));
    }

    let mut extras = Vec::new();
    if let Some(projects) = &c.projects {
        extras.push(format!(
            "Of particular note is their work on {}, which demonstrated their practical skills and professional potential.",
            projects
        ));
    }
    if let Some(activities) = &c.activities {
        extras.push(format!(
            "Additionally, {} has shown leadership and initiative through {}.",
            name, activities
        ));
    }
    body.push(extras.join("\n"));

    body.push(match c.career_goals {
        Some(goals) => format!(
            "{} has expressed a strong interest in {}, and I believe their combination of technical skills, \
             professional demeanor, and strong work ethic makes them an ideal candidate for this opportunity.",
            name, goals
        ),
        None => format!(
            "{} would be a valuable addition to any organization, bringing a strong combination of \
             technical skills, professional demeanor, and work ethic.",
            name
        ),
    });

    body.push("Please don't hesitate to contact me for any additional information.".to_string());
    body
}

fn character_letter(c: &LetterContext) -> Vec<String> {
    let name = c.first_name;
    let observed = match &c.contexts {
        Some(contexts) => format!("Through our interactions in {}, I have", contexts),
        None => "I have".to_string(),
    };
    let mut body = vec![format!(
        "I am writing to provide a character reference for {}, whom I have known for {} as their \
         professor at {}. {} had the opportunity to observe {}'s character and personal qualities closely.",
        c.full_name, c.relationship_duration, c.institution, observed, name
    )];

    let mut character = Vec::new();
    if !c.qualities.is_empty() {
        character.push(format!("{} consistently demonstrates {}.", name, c.qualities));
    }
    if !c.achievements.is_empty() {
        character.push(format!(
            "These qualities have been evident in their academic work, where they {}.",
            c.achievements
        ));
    }
    body.push(character.join(" "));

    if !c.courses.is_empty() {
        body.push(format!(
            "{} has taken the following courses with me: {}.",
            name, c.courses
        ));
    }

    if let Some(activities) = &c.activities {
        body.push(format!(
            "Beyond the classroom, {} has shown their character through involvement in {}.",
            name, activities
        ));
    }
    if let Some(projects) = &c.projects {
        body.push(format!(
            "Their commitment also shows in their work on {}.",
            projects
        ));
    }

    body.push(match c.career_goals {
        Some(goals) => format!(
            "Given {}'s goal to {}, I am confident that their personal qualities and character will \
             serve them well in their future endeavors, including {}.",
            name, goals, c.purpose
        ),
        None => format!(
            "I am confident that {}'s strong character and personal qualities will serve them well \
             in their future endeavors, including {}.",
            name, c.purpose
        ),
    });

    body.push(format!(
        "Please feel free to contact me if you require any additional information about {}'s \
         character and capabilities.",
        name
    ));
    body
}
