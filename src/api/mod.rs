use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    grades::{entities::StudentGradesSnapshot, requests::RecordAssessmentRequest},
    students::entities::Student,
    terms::entities::Term,
};

pub mod http;

/// The remote grading service, as this client consumes it.
///
/// Everything behind this trait is server-owned: grade computation,
/// positions, promotion rules and persistence. The engine only reads
/// snapshots and records assessments.
#[async_trait::async_trait]
pub trait GradingApi: Send + Sync {
    /// Record one assessment score. The request's `subject_id` may be a
    /// synthetic per-term key; the server resolves it by name.
    async fn record_assessment(&self, request: RecordAssessmentRequest) -> Result<()>;

    /// A student's grades for a term.
    async fn student_grades(&self, student_id: &str, term_id: &str)
    -> Result<StudentGradesSnapshot>;

    /// The school's active term, subjects included.
    async fn active_term_by_school(&self, school_id: &str) -> Result<Term>;

    /// Students registered at a school, for the selection dropdown.
    async fn students_by_school(&self, school_id: &str) -> Result<Vec<Student>>;
}

pub fn create_api() -> Result<Arc<dyn GradingApi>> {
    let api = http::HttpGradingApi::from_config()?;
    Ok(Arc::new(api))
}
