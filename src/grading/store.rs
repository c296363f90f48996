//! Local grade cache.
//!
//! Typed layer over the object cache holding the authoritative-until-
//! reconciled snapshot of one student's grades for one term. Key scheme:
//! `student-grades:{student_id}:{term_id}`.

use std::sync::Arc;

use tracing::debug;

use crate::cache::ObjectCache;
use crate::errors::Result;
use crate::grading::classifier::AssessmentInfo;
use crate::models::grades::entities::{StudentAssessment, StudentGradesSnapshot};

pub struct GradeStore {
    cache: Arc<dyn ObjectCache>,
    ttl: u64,
}

impl GradeStore {
    pub fn new(cache: Arc<dyn ObjectCache>, ttl: u64) -> Self {
        Self { cache, ttl }
    }

    fn key(student_id: &str, term_id: &str) -> String {
        format!("student-grades:{student_id}:{term_id}")
    }

    pub async fn get(
        &self,
        student_id: &str,
        term_id: &str,
    ) -> Result<Option<StudentGradesSnapshot>> {
        match self
            .cache
            .get_raw(&Self::key(student_id, term_id))
            .await
            .into_option()
        {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn put(
        &self,
        student_id: &str,
        term_id: &str,
        snapshot: &StudentGradesSnapshot,
    ) -> Result<()> {
        let raw = serde_json::to_string(snapshot)?;
        self.cache
            .insert_raw(Self::key(student_id, term_id), raw, self.ttl)
            .await;
        Ok(())
    }

    /// Drop the cached snapshot so the next read refetches.
    ///
    /// Deliberately not called after a successful save: the optimistic
    /// value stands as live truth because a read-after-write against the
    /// server is not guaranteed to reflect the write yet.
    pub async fn invalidate(&self, student_id: &str, term_id: &str) {
        self.cache.remove_raw(&Self::key(student_id, term_id)).await;
    }

    /// Apply an optimistic score patch and return the pre-patch snapshot
    /// for rollback.
    ///
    /// The subject is matched case-insensitively by its resolved name. A
    /// snapshot that does not list the subject, or an absent snapshot, is
    /// left untouched; the write still goes ahead and the server remains
    /// the judge of it.
    pub async fn apply_optimistic(
        &self,
        student_id: &str,
        term_id: &str,
        subject_name: &str,
        week: u32,
        new_score: u32,
        info: AssessmentInfo,
    ) -> Result<Option<StudentGradesSnapshot>> {
        let Some(previous) = self.get(student_id, term_id).await? else {
            debug!("No cached snapshot for {student_id}/{term_id}; optimistic patch skipped");
            return Ok(None);
        };

        let mut patched = previous.clone();
        match patched.subject_by_name_mut(subject_name) {
            Some(subject) => {
                if let Some(assessment) =
                    subject.assessments.iter_mut().find(|a| a.week == week)
                {
                    assessment.score = new_score;
                } else {
                    subject.assessments.push(StudentAssessment {
                        week,
                        max_points: info.max_points,
                        score: new_score,
                    });
                }
            }
            None => {
                debug!("Subject '{subject_name}' not in snapshot; optimistic patch skipped");
            }
        }

        self.put(student_id, term_id, &patched).await?;
        Ok(Some(previous))
    }

    /// Restore the exact pre-edit snapshot. Full replace, not a merge, so
    /// no partial-patch artifacts survive a failed write.
    pub async fn revert(
        &self,
        student_id: &str,
        term_id: &str,
        snapshot: Option<&StudentGradesSnapshot>,
    ) -> Result<()> {
        match snapshot {
            Some(snapshot) => self.put(student_id, term_id, snapshot).await,
            // Nothing was cached before the edit; leave nothing behind.
            None => {
                self.invalidate(student_id, term_id).await;
                Ok(())
            }
        }
    }
}
