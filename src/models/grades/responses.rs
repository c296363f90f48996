use crate::models::ApiResponse;

use super::entities::StudentGradesSnapshot;

// GET /grading/students/{studentId}/assessments/{termId}
pub type StudentGradesResponse = ApiResponse<StudentGradesSnapshot>;

// POST /grading/assessments/record returns an envelope with no payload the
// client cares about.
pub type RecordAssessmentResponse = ApiResponse<serde_json::Value>;
