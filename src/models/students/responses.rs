use serde::{Deserialize, Serialize};

use crate::models::ApiResponse;

use super::entities::Student;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentListData {
    pub school_id: String,
    pub total_students: u64,
    pub students: Vec<Student>,
}

// GET /students/school/{schoolId}
pub type StudentListResponse = ApiResponse<StudentListData>;
