use crate::models::ApiResponse;

use super::entities::Term;

// GET /terms/active/school/{schoolId}
pub type ActiveTermResponse = ApiResponse<Term>;
