use serde::Serialize;

use super::entities::AssessmentKind;

// Write payload for the record endpoint.
//
// `subject_id` carries the synthetic per-term key (`term_0_Mathematics`);
// the server resolves it back to the real subject by name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAssessmentRequest {
    pub student_id: String,
    pub subject_id: String,
    pub term_id: String,
    pub assessment_type: AssessmentKind,
    pub score: u32,
    // Required for all assessment types, exams included.
    pub week: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let req = RecordAssessmentRequest {
            student_id: "stu-1".into(),
            subject_id: "term_0_Mathematics".into(),
            term_id: "term-1".into(),
            assessment_type: AssessmentKind::Summative,
            score: 18,
            week: 7,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["studentId"], "stu-1");
        assert_eq!(json["subjectId"], "term_0_Mathematics");
        assert_eq!(json["assessmentType"], "summative");
        assert_eq!(json["week"], 7);
    }
}
