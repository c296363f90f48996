use serde::{Deserialize, Serialize};

// Assessment kind, determined solely by the week's position in the term.
// `Invalid` is client-side only and never crosses the wire.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
    Weekly,
    Summative,
    Exam,
    Invalid,
}

impl AssessmentKind {
    pub const WEEKLY: &'static str = "weekly";
    pub const SUMMATIVE: &'static str = "summative";
    pub const EXAM: &'static str = "exam";

    /// Phrase used in user-facing warnings.
    pub fn phrase(&self) -> &'static str {
        match self {
            AssessmentKind::Weekly => "weekly assessment",
            AssessmentKind::Summative => "summative test",
            AssessmentKind::Exam => "exam",
            AssessmentKind::Invalid => "invalid week",
        }
    }
}

impl<'de> Deserialize<'de> for AssessmentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            AssessmentKind::WEEKLY => Ok(AssessmentKind::Weekly),
            AssessmentKind::SUMMATIVE => Ok(AssessmentKind::Summative),
            AssessmentKind::EXAM => Ok(AssessmentKind::Exam),
            _ => Err(serde::de::Error::custom(format!(
                "Invalid assessment kind: '{s}'. Supported kinds: weekly, summative, exam"
            ))),
        }
    }
}

impl std::fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssessmentKind::Weekly => write!(f, "{}", AssessmentKind::WEEKLY),
            AssessmentKind::Summative => write!(f, "{}", AssessmentKind::SUMMATIVE),
            AssessmentKind::Exam => write!(f, "{}", AssessmentKind::EXAM),
            AssessmentKind::Invalid => write!(f, "invalid"),
        }
    }
}

// One recorded score: one student, one subject, one week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssessment {
    pub week: u32,
    pub max_points: u32,
    pub score: u32,
}

// All of one subject's assessments for a student in a term. At most one
// assessment per week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGrades {
    pub subject_id: String,
    pub subject_name: String,
    pub assessments: Vec<StudentAssessment>,
}

impl SubjectGrades {
    pub fn assessment_for_week(&self, week: u32) -> Option<&StudentAssessment> {
        self.assessments.iter().find(|a| a.week == week)
    }
}

// The unit cached and reconciled: one student's grades for one term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentGradesSnapshot {
    pub student_name: String,
    pub term_name: String,
    pub subjects: Vec<SubjectGrades>,
}

impl StudentGradesSnapshot {
    /// Case-insensitive subject lookup by name. Subject identity crosses a
    /// naming boundary between the synthetic per-term key and the server's
    /// subject name, so name matching is the join point.
    pub fn subject_by_name(&self, name: &str) -> Option<&SubjectGrades> {
        self.subjects
            .iter()
            .find(|s| s.subject_name.eq_ignore_ascii_case(name))
    }

    pub fn subject_by_name_mut(&mut self, name: &str) -> Option<&mut SubjectGrades> {
        self.subjects
            .iter_mut()
            .find(|s| s.subject_name.eq_ignore_ascii_case(name))
    }
}
