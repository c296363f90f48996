use serde::{Deserialize, Serialize};

// A registered student, as returned by the students endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub school_id: String,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub grade_level: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub enrollment_date: Option<String>,
    pub is_active: bool,
}

impl Student {
    /// Display form used by the student dropdown.
    pub fn display_name(&self) -> String {
        self.name.to_uppercase()
    }
}
