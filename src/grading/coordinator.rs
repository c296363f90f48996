//! Reconciliation coordinator.
//!
//! Owns the edit slot, the term context and the local grade cache, and
//! drives the optimistic save protocol: patch the cache, close the edit
//! box, then write to the server; roll back and reopen the edit if the
//! write fails. No lock is held across the network round trip.

use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, warn};

use crate::api::GradingApi;
use crate::errors::{GradebookError, Result};
use crate::grading::classifier::classify_week;
use crate::grading::editor::{
    Activation, CellEditor, CellRef, CellState, CommitDecision, EditGates, InputModality,
    SaveRequest,
};
use crate::grading::matrix::GradeMatrix;
use crate::grading::store::GradeStore;
use crate::grading::subject_key::SubjectKeyMap;
use crate::models::grades::requests::RecordAssessmentRequest;
use crate::models::terms::entities::Term;
use crate::notifications::NotificationCenter;
use crate::session::SessionStore;

/// The active term plus its resolved subject-key table.
#[derive(Debug, Clone)]
struct TermContext {
    term: Term,
    subject_keys: SubjectKeyMap,
}

pub struct GradeEditCoordinator {
    api: Arc<dyn GradingApi>,
    store: GradeStore,
    session: Arc<SessionStore>,
    notifier: Arc<NotificationCenter>,
    editor: Mutex<CellEditor>,
    term: RwLock<Option<TermContext>>,
    selected_student: RwLock<Option<String>>,
}

impl GradeEditCoordinator {
    pub fn new(
        api: Arc<dyn GradingApi>,
        store: GradeStore,
        session: Arc<SessionStore>,
        notifier: Arc<NotificationCenter>,
    ) -> Self {
        let editor = Mutex::new(CellEditor::new(notifier.clone()));
        Self {
            api,
            store,
            session,
            notifier,
            editor,
            term: RwLock::new(None),
            selected_student: RwLock::new(None),
        }
    }

    /// Install a term: build its subject-key table once, propagate the
    /// term to the session and gate the table on the term's active flag.
    pub fn set_term(&self, term: Term) -> Result<()> {
        self.session.set_term(term.id.clone(), term.name.clone())?;
        self.session.set_table_editable(term.is_active)?;
        let subject_keys = SubjectKeyMap::from_term(&term);
        debug!(
            "Term '{}' loaded with {} subjects",
            term.name,
            subject_keys.len()
        );
        *self.term.write().expect("Term lock poisoned") = Some(TermContext { term, subject_keys });
        Ok(())
    }

    /// Fetch and install the school's active term.
    pub async fn load_active_term(&self) -> Result<Term> {
        let school_id = self
            .session
            .school_id()
            .ok_or_else(|| GradebookError::validation("No school ID available"))?;
        let term = match self.api.active_term_by_school(&school_id).await {
            Ok(term) => term,
            Err(e) => {
                self.notifier.show_error("Error", "Failed to load active term");
                return Err(e);
            }
        };
        self.set_term(term.clone())?;
        Ok(term)
    }

    pub fn term(&self) -> Option<Term> {
        self.term
            .read()
            .expect("Term lock poisoned")
            .as_ref()
            .map(|ctx| ctx.term.clone())
    }

    /// Select a student and fetch their snapshot for the active term. The
    /// previous student's snapshot is discarded.
    pub async fn select_student(&self, student_id: &str) -> Result<()> {
        let term_id = self
            .session
            .term_id()
            .ok_or_else(|| GradebookError::missing_term_context("No active term found"))?;

        let previous = self
            .selected_student
            .write()
            .expect("Selection lock poisoned")
            .replace(student_id.to_string());
        if let Some(previous_id) = previous
            && previous_id != student_id
        {
            self.store.invalidate(&previous_id, &term_id).await;
        }

        match self.api.student_grades(student_id, &term_id).await {
            Ok(snapshot) => {
                self.store.put(student_id, &term_id, &snapshot).await?;
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .show_error("Error", "Failed to load student grades");
                Err(e)
            }
        }
    }

    pub fn selected_student(&self) -> Option<String> {
        self.selected_student
            .read()
            .expect("Selection lock poisoned")
            .clone()
    }

    /// The grade table read model for the selected student.
    pub async fn matrix(&self) -> Result<GradeMatrix> {
        let Some(ctx) = self.term.read().expect("Term lock poisoned").clone() else {
            return Ok(GradeMatrix::default());
        };
        let snapshot = match (self.selected_student(), self.session.term_id()) {
            (Some(student_id), Some(term_id)) => self.store.get(&student_id, &term_id).await?,
            _ => None,
        };
        Ok(GradeMatrix::build(&ctx.term, snapshot.as_ref()))
    }

    /// Try to open an edit on a cell.
    pub fn activate_cell(
        &self,
        cell: CellRef,
        previous: Option<u32>,
        activation: Activation,
        modality: InputModality,
    ) -> bool {
        let Some(ctx) = self.term.read().expect("Term lock poisoned").clone() else {
            return false;
        };
        let gates = EditGates::from_term(&ctx.term, self.session.is_table_editable());
        self.editor
            .lock()
            .expect("Editor lock poisoned")
            .activate(cell, previous, activation, modality, &gates)
    }

    /// Forward input to the edit box.
    pub fn input(&self, text: &str) -> bool {
        self.editor.lock().expect("Editor lock poisoned").input(text)
    }

    /// Cancel the pending edit; nothing reaches the cache or the network.
    pub fn cancel(&self) {
        self.editor.lock().expect("Editor lock poisoned").cancel();
    }

    pub fn editor_state(&self) -> CellState {
        self.editor.lock().expect("Editor lock poisoned").state()
    }

    pub fn editing_cell(&self) -> Option<(CellRef, String)> {
        let editor = self.editor.lock().expect("Editor lock poisoned");
        editor
            .editing_cell()
            .map(|slot| (slot.cell.clone(), slot.entered.clone()))
    }

    /// Commit the pending edit: close the box, patch the cache
    /// optimistically, then reconcile with the server.
    ///
    /// Validation failures abort before any network call and leave the
    /// cache untouched. A failed write rolls the cache back to the exact
    /// pre-edit snapshot, reopens the edit with the failed value and
    /// surfaces the reason as a warning.
    pub async fn commit(&self) -> Result<()> {
        let decision = self
            .editor
            .lock()
            .expect("Editor lock poisoned")
            .take_commit();
        let CommitDecision::Save(request) = decision else {
            // Unchanged or unparsable: the box is closed, nothing to do.
            return Ok(());
        };

        match self.reconcile(&request).await {
            Ok(()) => Ok(()),
            Err(e) => {
                // Whatever failed, the shared slot must not stay in
                // `Saving`: a write failure has already reopened the edit,
                // anything earlier closes it here with a warning.
                let still_saving = {
                    let mut editor = self.editor.lock().expect("Editor lock poisoned");
                    let saving = editor.state() == CellState::Saving;
                    if saving {
                        editor.finish_save();
                    }
                    saving
                };
                if still_saving {
                    self.notifier.show_warning("Error", e.message());
                }
                Err(e)
            }
        }
    }

    async fn reconcile(&self, request: &SaveRequest) -> Result<()> {
        let Some(student_id) = self.selected_student() else {
            return Err(GradebookError::validation("No student selected"));
        };
        let term_id = self
            .session
            .term_id()
            .ok_or_else(|| GradebookError::missing_term_context("No active term found"))?;

        let ctx = self
            .term
            .read()
            .expect("Term lock poisoned")
            .clone()
            .ok_or_else(|| GradebookError::missing_term_context("No active term found"))?;

        let info = classify_week(request.cell.week, ctx.term.total_weeks);
        if !info.is_valid() {
            return Err(GradebookError::week_not_available(format!(
                "Cannot save assessment for Week {}",
                request.cell.week
            )));
        }

        let subject_name = ctx
            .subject_keys
            .resolve(&request.cell.subject_key)
            .ok_or_else(|| {
                GradebookError::subject_not_found(format!(
                    "Unknown subject key '{}'",
                    request.cell.subject_key
                ))
            })?;

        // Optimistic phase: patch the cache and release the edit slot
        // before the write is even issued. The UI stays interactive for
        // the whole round trip.
        let previous_snapshot = self
            .store
            .apply_optimistic(
                &student_id,
                &term_id,
                &subject_name,
                request.cell.week,
                request.score,
                info,
            )
            .await?;
        self.editor
            .lock()
            .expect("Editor lock poisoned")
            .finish_save();

        debug!(
            "Saving assessment: {} points for week {} of '{}'",
            request.score, request.cell.week, subject_name
        );

        let write = self
            .api
            .record_assessment(RecordAssessmentRequest {
                student_id: student_id.clone(),
                subject_id: request.cell.subject_key.clone(),
                term_id: term_id.clone(),
                assessment_type: info.kind,
                score: request.score,
                week: request.cell.week,
            })
            .await;

        match write {
            Ok(()) => {
                // The optimistic value stands as truth. Deliberately no
                // invalidation or background refresh: a read-after-write
                // may not reflect the write yet and would clobber the
                // optimistic state.
                debug!("Assessment recorded successfully");
                Ok(())
            }
            Err(e) => {
                warn!("Assessment write failed, rolling back: {e}");
                // The edit must reopen even when the rollback itself fails,
                // or the failed value would be lost with the slot closed.
                if let Err(revert_err) = self
                    .store
                    .revert(&student_id, &term_id, previous_snapshot.as_ref())
                    .await
                {
                    warn!("Rollback failed, cached snapshot may be stale: {revert_err}");
                }
                self.editor
                    .lock()
                    .expect("Editor lock poisoned")
                    .reopen(request);
                self.notifier.show_warning("Save Failed", e.message());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::cache::{CacheResult, ObjectCache};
    use crate::models::grades::entities::{
        AssessmentKind, StudentAssessment, StudentGradesSnapshot, SubjectGrades,
    };
    use crate::models::students::entities::Student;
    use crate::models::terms::entities::TermSubject;

    /// Scriptable server stand-in. Records every write it receives and
    /// fails the next `fail_writes` record calls.
    struct MockGradingApi {
        snapshot: StudentGradesSnapshot,
        term: Term,
        recorded: Mutex<Vec<RecordAssessmentRequest>>,
        fail_writes: Mutex<u32>,
    }

    impl MockGradingApi {
        fn new() -> Self {
            Self {
                snapshot: snapshot(),
                term: term(),
                recorded: Mutex::new(Vec::new()),
                fail_writes: Mutex::new(0),
            }
        }

        fn fail_next_write(&self) {
            *self.fail_writes.lock().unwrap() += 1;
        }

        fn recorded(&self) -> Vec<RecordAssessmentRequest> {
            self.recorded.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GradingApi for MockGradingApi {
        async fn record_assessment(&self, request: RecordAssessmentRequest) -> crate::errors::Result<()> {
            self.recorded.lock().unwrap().push(request);
            let mut failures = self.fail_writes.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(GradebookError::server_rejected(
                    "Score exceeds maximum for this assessment",
                ));
            }
            Ok(())
        }

        async fn student_grades(
            &self,
            _student_id: &str,
            _term_id: &str,
        ) -> crate::errors::Result<StudentGradesSnapshot> {
            Ok(self.snapshot.clone())
        }

        async fn active_term_by_school(&self, _school_id: &str) -> crate::errors::Result<Term> {
            Ok(self.term.clone())
        }

        async fn students_by_school(&self, _school_id: &str) -> crate::errors::Result<Vec<Student>> {
            Ok(Vec::new())
        }
    }

    fn term() -> Term {
        Term {
            id: "term-1".into(),
            name: "First Term".into(),
            current_week: Some(8),
            total_weeks: 12,
            is_active: true,
            subjects: vec![
                TermSubject {
                    name: "Mathematics".into(),
                    grade_levels: vec![],
                },
                TermSubject {
                    name: "English Language".into(),
                    grade_levels: vec![],
                },
            ],
        }
    }

    fn snapshot() -> StudentGradesSnapshot {
        StudentGradesSnapshot {
            student_name: "ADAEZE OKAFOR".into(),
            term_name: "First Term".into(),
            subjects: vec![SubjectGrades {
                subject_id: "sub-9".into(),
                subject_name: "Mathematics".into(),
                assessments: vec![StudentAssessment {
                    week: 5,
                    max_points: 5,
                    score: 3,
                }],
            }],
        }
    }

    async fn coordinator() -> (GradeEditCoordinator, Arc<MockGradingApi>, Arc<NotificationCenter>) {
        let api = Arc::new(MockGradingApi::new());
        let cache = Arc::new(MokaCacheWrapper::with_settings(64, 300).unwrap());
        let store = GradeStore::new(cache, 300);
        let session_path = std::env::temp_dir().join(format!(
            "athena-coordinator-{}-{}.json",
            std::process::id(),
            uuid::Uuid::new_v4()
        ));
        let session = Arc::new(SessionStore::open(session_path));
        session.set_school("Sunrise Academy", "sch-1").unwrap();
        let notifier = Arc::new(NotificationCenter::new());
        let coordinator =
            GradeEditCoordinator::new(api.clone(), store, session, notifier.clone());

        coordinator.set_term(term()).unwrap();
        coordinator.select_student("s1").await.unwrap();
        (coordinator, api, notifier)
    }

    fn open_and_enter(coordinator: &GradeEditCoordinator, week: u32, previous: Option<u32>, text: &str) {
        assert!(coordinator.activate_cell(
            CellRef {
                week,
                subject_key: "term_0_Mathematics".into(),
            },
            previous,
            Activation::Double,
            InputModality::Pointer,
        ));
        assert!(coordinator.input(text));
    }

    #[tokio::test]
    async fn test_summative_save_patches_cache_and_hits_server() {
        let (coordinator, api, _) = coordinator().await;
        open_and_enter(&coordinator, 7, None, "18");

        coordinator.commit().await.unwrap();

        let recorded = api.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].week, 7);
        assert_eq!(recorded[0].score, 18);
        assert_eq!(recorded[0].assessment_type, AssessmentKind::Summative);
        assert_eq!(recorded[0].term_id, "term-1");

        // The optimistic value stands; the slot is free again.
        let matrix = coordinator.matrix().await.unwrap();
        assert_eq!(matrix.cell(7, "term_0_Mathematics").unwrap().score, Some(18));
        assert_eq!(coordinator.editor_state(), CellState::Idle);
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back_and_reopens() {
        let (coordinator, api, notifier) = coordinator().await;
        api.fail_next_write();
        open_and_enter(&coordinator, 5, Some(3), "4");

        assert!(coordinator.commit().await.is_err());

        // Cache shows the pre-edit value again.
        let matrix = coordinator.matrix().await.unwrap();
        assert_eq!(matrix.cell(5, "term_0_Mathematics").unwrap().score, Some(3));

        // The edit reopens with the failed value for retry.
        assert_eq!(coordinator.editor_state(), CellState::Editing);
        let (cell, entered) = coordinator.editing_cell().unwrap();
        assert_eq!(cell.week, 5);
        assert_eq!(entered, "4");

        let toasts = notifier.active();
        assert!(toasts.iter().any(|t| t.title == "Save Failed"));
    }

    #[tokio::test]
    async fn test_retry_after_failure_succeeds() {
        let (coordinator, api, _) = coordinator().await;
        api.fail_next_write();
        open_and_enter(&coordinator, 5, Some(3), "4");
        assert!(coordinator.commit().await.is_err());

        // The reopened edit still holds "4"; commit again.
        coordinator.commit().await.unwrap();
        assert_eq!(api.recorded().len(), 2);

        let matrix = coordinator.matrix().await.unwrap();
        assert_eq!(matrix.cell(5, "term_0_Mathematics").unwrap().score, Some(4));
    }

    #[tokio::test]
    async fn test_unchanged_value_never_reaches_server() {
        let (coordinator, api, _) = coordinator().await;
        open_and_enter(&coordinator, 5, Some(3), "3");

        coordinator.commit().await.unwrap();
        assert!(api.recorded().is_empty());
        assert_eq!(coordinator.editor_state(), CellState::Idle);
    }

    #[tokio::test]
    async fn test_over_ceiling_input_never_reaches_cache_or_server() {
        let (coordinator, api, notifier) = coordinator().await;
        assert!(coordinator.activate_cell(
            CellRef {
                week: 5,
                subject_key: "term_0_Mathematics".into(),
            },
            Some(3),
            Activation::Double,
            InputModality::Pointer,
        ));
        // Weekly ceiling is 5.
        assert!(!coordinator.input("9"));
        assert!(notifier.active().iter().any(|t| t.title == "Invalid Score"));

        coordinator.commit().await.unwrap();
        assert!(api.recorded().is_empty());

        let matrix = coordinator.matrix().await.unwrap();
        assert_eq!(matrix.cell(5, "term_0_Mathematics").unwrap().score, Some(3));
    }

    #[tokio::test]
    async fn test_stale_subject_key_aborts_before_network() {
        let (coordinator, api, notifier) = coordinator().await;
        assert!(coordinator.activate_cell(
            CellRef {
                week: 5,
                subject_key: "term_7_Further_Mathematics".into(),
            },
            None,
            Activation::Double,
            InputModality::Pointer,
        ));
        assert!(coordinator.input("4"));

        let err = coordinator.commit().await.unwrap_err();
        assert_eq!(err.code(), "E009");
        assert!(api.recorded().is_empty());
        assert!(notifier.active().iter().any(|t| t.title == "Error"));
        assert_eq!(coordinator.editor_state(), CellState::Idle);
    }

    #[tokio::test]
    async fn test_subject_key_resolves_case_insensitively_into_snapshot() {
        let (coordinator, api, _) = coordinator().await;
        // The term lists "Mathematics"; the snapshot stores "Mathematics"
        // too, but resolution tolerates case differences end to end.
        open_and_enter(&coordinator, 6, None, "2");
        coordinator.commit().await.unwrap();
        assert_eq!(api.recorded()[0].subject_id, "term_0_Mathematics");
    }

    #[tokio::test]
    async fn test_selecting_new_student_drops_previous_snapshot() {
        let (coordinator, _, _) = coordinator().await;
        coordinator.select_student("s2").await.unwrap();
        assert_eq!(coordinator.selected_student().as_deref(), Some("s2"));

        // s2's fetched snapshot backs the matrix now.
        let matrix = coordinator.matrix().await.unwrap();
        assert_eq!(matrix.cell(5, "term_0_Mathematics").unwrap().score, Some(3));
    }

    /// Cache backend whose every entry reads back as garbage.
    struct CorruptCache;

    #[async_trait]
    impl ObjectCache for CorruptCache {
        async fn get_raw(&self, _key: &str) -> CacheResult<String> {
            CacheResult::Found("not json".into())
        }

        async fn insert_raw(&self, _key: String, _value: String, _ttl: u64) {}

        async fn remove_raw(&self, _key: &str) {}

        async fn clear(&self) {}
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_frees_the_slot() {
        let api = Arc::new(MockGradingApi::new());
        let store = GradeStore::new(Arc::new(CorruptCache), 300);
        let session_path = std::env::temp_dir().join(format!(
            "athena-corrupt-{}-{}.json",
            std::process::id(),
            uuid::Uuid::new_v4()
        ));
        let session = Arc::new(SessionStore::open(session_path));
        session.set_school("Sunrise Academy", "sch-1").unwrap();
        let notifier = Arc::new(NotificationCenter::new());
        let coordinator =
            GradeEditCoordinator::new(api.clone(), store, session, notifier.clone());

        coordinator.set_term(term()).unwrap();
        coordinator.select_student("s1").await.unwrap();
        open_and_enter(&coordinator, 5, Some(3), "4");

        // The optimistic patch hits the unreadable entry and fails.
        let err = coordinator.commit().await.unwrap_err();
        assert_eq!(err.code(), "E010");
        assert!(api.recorded().is_empty());

        // The failure stays scoped to this save: the slot is free, the
        // user was told, and the next edit opens normally.
        assert_eq!(coordinator.editor_state(), CellState::Idle);
        assert!(notifier.active().iter().any(|t| t.title == "Error"));
        assert!(coordinator.activate_cell(
            CellRef {
                week: 5,
                subject_key: "term_0_Mathematics".into(),
            },
            Some(3),
            Activation::Double,
            InputModality::Pointer,
        ));
    }

    #[tokio::test]
    async fn test_commit_without_term_context_never_reaches_server() {
        let api = Arc::new(MockGradingApi::new());
        let cache = Arc::new(MokaCacheWrapper::with_settings(64, 300).unwrap());
        let store = GradeStore::new(cache, 300);
        let session_path = std::env::temp_dir().join(format!(
            "athena-noterm-{}-{}.json",
            std::process::id(),
            uuid::Uuid::new_v4()
        ));
        let session = Arc::new(SessionStore::open(session_path));
        let notifier = Arc::new(NotificationCenter::new());
        let coordinator = GradeEditCoordinator::new(
            api.clone(),
            store,
            session.clone(),
            notifier.clone(),
        );

        coordinator.set_term(term()).unwrap();
        coordinator.select_student("s1").await.unwrap();
        open_and_enter(&coordinator, 5, Some(3), "4");

        // The session loses its term between edit and commit.
        session.clear().unwrap();

        let err = coordinator.commit().await.unwrap_err();
        assert_eq!(err.code(), "E008");
        assert!(api.recorded().is_empty());
        assert!(notifier.active().iter().any(|t| t.title == "Error"));
        assert_eq!(coordinator.editor_state(), CellState::Idle);
    }

    #[tokio::test]
    async fn test_load_active_term_installs_context() {
        let api = Arc::new(MockGradingApi::new());
        let cache = Arc::new(MokaCacheWrapper::with_settings(64, 300).unwrap());
        let store = GradeStore::new(cache, 300);
        let session_path = std::env::temp_dir().join(format!(
            "athena-loadterm-{}-{}.json",
            std::process::id(),
            uuid::Uuid::new_v4()
        ));
        let session = Arc::new(SessionStore::open(session_path));
        session.set_school("Sunrise Academy", "sch-1").unwrap();
        let coordinator = GradeEditCoordinator::new(
            api,
            store,
            session.clone(),
            Arc::new(NotificationCenter::new()),
        );

        let term = coordinator.load_active_term().await.unwrap();
        assert_eq!(term.id, "term-1");
        assert_eq!(session.term_id().as_deref(), Some("term-1"));
        assert!(session.is_table_editable());
    }
}
