//! Grade matrix read model.
//!
//! Derived, never stored: the active term's subject list crossed with the
//! fixed week range. Columns always mirror the term's subjects, so the
//! table keeps its shape even for a student with no assessments yet.

use std::collections::HashMap;

use crate::grading::classifier::classify_week;
use crate::grading::subject_key::subject_key;
use crate::models::grades::entities::StudentGradesSnapshot;
use crate::models::terms::entities::Term;

/// The table always renders weeks 1 through 12.
pub const FIRST_WEEK: u32 = 1;
pub const LAST_WEEK: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixCell {
    pub score: Option<u32>,
    pub max_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectColumn {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct GradeMatrix {
    columns: Vec<SubjectColumn>,
    cells: HashMap<(u32, String), MatrixCell>,
}

impl GradeMatrix {
    pub fn weeks() -> impl Iterator<Item = u32> {
        FIRST_WEEK..=LAST_WEEK
    }

    /// Cross-join the term's subjects with the week range, then overlay
    /// whatever assessments the snapshot holds. Snapshot subjects join to
    /// term columns by case-insensitive name.
    pub fn build(term: &Term, snapshot: Option<&StudentGradesSnapshot>) -> Self {
        let columns: Vec<SubjectColumn> = term
            .subjects
            .iter()
            .enumerate()
            .map(|(index, subject)| SubjectColumn {
                key: subject_key(index, &subject.name),
                name: subject.name.clone(),
            })
            .collect();

        let mut cells = HashMap::new();
        for week in Self::weeks() {
            let info = classify_week(week, term.total_weeks);
            for column in &columns {
                cells.insert(
                    (week, column.key.clone()),
                    MatrixCell {
                        score: None,
                        max_points: info.max_points,
                    },
                );
            }
        }

        if let Some(snapshot) = snapshot {
            for subject in &snapshot.subjects {
                let Some(column) = columns
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(&subject.subject_name))
                else {
                    continue;
                };
                for assessment in &subject.assessments {
                    if let Some(cell) = cells.get_mut(&(assessment.week, column.key.clone())) {
                        cell.score = Some(assessment.score);
                        cell.max_points = assessment.max_points;
                    }
                }
            }
        }

        Self { columns, cells }
    }

    pub fn columns(&self) -> &[SubjectColumn] {
        &self.columns
    }

    pub fn cell(&self, week: u32, subject_key: &str) -> Option<&MatrixCell> {
        self.cells.get(&(week, subject_key.to_string()))
    }
}
