use serde::{Deserialize, Serialize};

/// Default term length, in weeks.
pub const DEFAULT_TOTAL_WEEKS: u32 = 12;

fn default_total_weeks() -> u32 {
    DEFAULT_TOTAL_WEEKS
}

fn default_is_active() -> bool {
    // A term with no explicit flag is treated as active.
    true
}

// A subject taught in a term. Identity is by name; the term endpoint does
// not return subject ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TermSubject {
    pub name: String,
    #[serde(default, rename = "gradeLevel")]
    pub grade_levels: Vec<String>,
}

// A fixed grading period with a known week count. Drives both the week
// classifier and the editability gates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub current_week: Option<u32>,
    #[serde(default = "default_total_weeks")]
    pub total_weeks: u32,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub subjects: Vec<TermSubject>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_wire_defaults() {
        let raw = r#"{"id":"term-1","name":"First Term","subjects":[{"name":"Mathematics"}]}"#;
        let term: Term = serde_json::from_str(raw).unwrap();
        assert_eq!(term.total_weeks, 12);
        assert!(term.is_active);
        assert_eq!(term.current_week, None);
        assert!(term.subjects[0].grade_levels.is_empty());
    }
}
