//! Session context store.
//!
//! Mirrors the browser session storage the UI shell keeps between views:
//! staff identity, selected school, active term and the table-editability
//! flag. State persists as JSON at a configurable path; every mutation
//! writes through.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::errors::{GradebookError, Result};
use crate::models::session::entities::{JobRole, SessionState};

pub struct SessionStore {
    state: RwLock<SessionState>,
    persist_path: PathBuf,
}

impl SessionStore {
    /// Open the store at `path`, loading any previously persisted session.
    /// A missing or unreadable file starts a fresh session rather than
    /// failing.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let persist_path = path.as_ref().to_path_buf();
        let state = match std::fs::read_to_string(&persist_path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(e) => {
                    debug!("Discarding unreadable session file: {e}");
                    SessionState::default()
                }
            },
            Err(_) => SessionState::default(),
        };
        Self {
            state: RwLock::new(state),
            persist_path,
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().expect("Session lock poisoned").clone()
    }

    pub fn set_name(&self, name: impl Into<String>) -> Result<()> {
        self.update(|s| s.name = name.into())
    }

    pub fn set_job(&self, job: JobRole) -> Result<()> {
        self.update(|s| s.job = Some(job))
    }

    pub fn set_school(&self, school: impl Into<String>, school_id: impl Into<String>) -> Result<()> {
        self.update(|s| {
            s.school = school.into();
            s.school_id = school_id.into();
        })
    }

    pub fn set_grade_level(&self, grade_level: impl Into<String>) -> Result<()> {
        self.update(|s| s.grade_level = grade_level.into())
    }

    pub fn set_term(&self, term_id: impl Into<String>, term_name: impl Into<String>) -> Result<()> {
        self.update(|s| {
            s.term_id = term_id.into();
            s.term_name = term_name.into();
        })
    }

    pub fn set_table_editable(&self, editable: bool) -> Result<()> {
        self.update(|s| s.is_table_editable = editable)
    }

    pub fn term_id(&self) -> Option<String> {
        let state = self.state.read().expect("Session lock poisoned");
        if state.term_id.is_empty() {
            None
        } else {
            Some(state.term_id.clone())
        }
    }

    pub fn school_id(&self) -> Option<String> {
        let state = self.state.read().expect("Session lock poisoned");
        if state.school_id.is_empty() {
            None
        } else {
            Some(state.school_id.clone())
        }
    }

    pub fn is_table_editable(&self) -> bool {
        self.state
            .read()
            .expect("Session lock poisoned")
            .is_table_editable
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .expect("Session lock poisoned")
            .is_authenticated()
    }

    pub fn clear(&self) -> Result<()> {
        self.update(|s| *s = SessionState::default())
    }

    fn update(&self, mutate: impl FnOnce(&mut SessionState)) -> Result<()> {
        let snapshot = {
            let mut state = self.state.write().expect("Session lock poisoned");
            mutate(&mut state);
            state.clone()
        };
        self.persist(&snapshot)
    }

    fn persist(&self, state: &SessionState) -> Result<()> {
        let raw = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.persist_path, raw).map_err(|e| {
            GradebookError::session_persistence(format!(
                "Failed to write {}: {e}",
                self.persist_path.display()
            ))
        })
    }
}
