use serde::{Deserialize, Serialize};

// Staff job role. The wire strings are fixed by the onboarding flow.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum JobRole {
    HeadMistress,
    Teacher,
}

impl JobRole {
    pub const HEAD_MISTRESS: &'static str = "HeadMistress";
    pub const TEACHER: &'static str = "Teacher";
}

impl<'de> Deserialize<'de> for JobRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            JobRole::HEAD_MISTRESS => Ok(JobRole::HeadMistress),
            JobRole::TEACHER => Ok(JobRole::Teacher),
            _ => Err(serde::de::Error::custom(format!(
                "Invalid job role: '{s}'. Supported roles: HeadMistress, Teacher"
            ))),
        }
    }
}

impl std::fmt::Display for JobRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobRole::HeadMistress => write!(f, "{}", JobRole::HEAD_MISTRESS),
            JobRole::Teacher => write!(f, "{}", JobRole::TEACHER),
        }
    }
}

impl std::str::FromStr for JobRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            JobRole::HEAD_MISTRESS => Ok(JobRole::HeadMistress),
            JobRole::TEACHER => Ok(JobRole::Teacher),
            _ => Err(format!("Invalid job role: {s}")),
        }
    }
}

// Everything the UI session carries between views. Persisted as JSON, so
// field names match the original storage format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: Option<JobRole>,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub school_id: String,
    #[serde(default)]
    pub grade_level: String,
    #[serde(default)]
    pub term_id: String,
    #[serde(default)]
    pub term_name: String,
    #[serde(default = "default_table_editable")]
    pub is_table_editable: bool,
}

fn default_table_editable() -> bool {
    true
}

// A fresh session is table-editable until a closed term says otherwise, so
// the derived all-false Default does not fit.
impl Default for SessionState {
    fn default() -> Self {
        Self {
            name: String::new(),
            job: None,
            school: String::new(),
            school_id: String::new(),
            grade_level: String::new(),
            term_id: String::new(),
            term_name: String::new(),
            is_table_editable: true,
        }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        !self.name.is_empty() && self.job.is_some() && !self.school.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_role_wire_strings() {
        assert_eq!(
            serde_json::to_string(&JobRole::HeadMistress).unwrap(),
            "\"HeadMistress\""
        );
        let role: JobRole = serde_json::from_str("\"Teacher\"").unwrap();
        assert_eq!(role, JobRole::Teacher);
        assert!(serde_json::from_str::<JobRole>("\"Principal\"").is_err());
    }

    #[test]
    fn test_authentication_requires_name_job_school() {
        let mut state = SessionState::default();
        assert!(!state.is_authenticated());
        state.name = "Ngozi".into();
        state.job = Some(JobRole::Teacher);
        assert!(!state.is_authenticated());
        state.school = "Sunrise Academy".into();
        assert!(state.is_authenticated());
    }
}
