//! Cell edit state machine.
//!
//! One editor instance backs the whole grade table: a single shared slot
//! holds the cell being edited or saved, so two cells can never be in
//! flight at once. The slot is released the moment a commit is handed to
//! the reconciliation coordinator; the network round trip itself runs with
//! the table fully interactive.

use std::sync::Arc;

use crate::grading::classifier::{AssessmentInfo, classify_week};
use crate::models::terms::entities::Term;
use crate::notifications::NotificationCenter;
use crate::utils::validate::is_numeric_input;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Idle,
    Editing,
    Saving,
}

/// Table coordinate of a grade cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub week: u32,
    pub subject_key: String,
}

/// The single shared edit slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingCell {
    pub cell: CellRef,
    pub previous: Option<u32>,
    pub entered: String,
    pub info: AssessmentInfo,
}

/// How the cell was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Single,
    Double,
}

/// Touch input activates on a single tap; pointer input needs a double
/// click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModality {
    Pointer,
    Touch,
}

/// Editability context for the active term.
#[derive(Debug, Clone, Copy)]
pub struct EditGates {
    pub term_active: bool,
    pub table_editable: bool,
    pub current_week: Option<u32>,
    pub total_weeks: u32,
}

impl EditGates {
    pub fn from_term(term: &Term, table_editable: bool) -> Self {
        Self {
            term_active: term.is_active,
            table_editable,
            current_week: term.current_week,
            total_weeks: term.total_weeks,
        }
    }

    fn is_current_or_past_week(&self, week: u32) -> bool {
        match self.current_week {
            Some(current) => week <= current,
            None => true,
        }
    }
}

/// What a commit resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitDecision {
    /// Nothing to do: cancelled, unchanged, or unparsable input.
    NoOp,
    /// A changed, valid score to reconcile with the server.
    Save(SaveRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub cell: CellRef,
    pub previous: Option<u32>,
    pub entered: String,
    pub score: u32,
    pub info: AssessmentInfo,
}

pub struct CellEditor {
    state: CellState,
    slot: Option<EditingCell>,
    notifier: Arc<NotificationCenter>,
}

impl CellEditor {
    pub fn new(notifier: Arc<NotificationCenter>) -> Self {
        Self {
            state: CellState::Idle,
            slot: None,
            notifier,
        }
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn editing_cell(&self) -> Option<&EditingCell> {
        self.slot.as_ref()
    }

    /// Try to open an edit on `cell`. Returns whether the slot was taken.
    ///
    /// Gate order matches the warnings the user sees: editability first
    /// (silent), then week validity, then the current-week gate. A single
    /// pointer click is a no-op by design; touch activates on one tap.
    pub fn activate(
        &mut self,
        cell: CellRef,
        previous: Option<u32>,
        activation: Activation,
        modality: InputModality,
        gates: &EditGates,
    ) -> bool {
        if self.state != CellState::Idle {
            // Single shared slot: another cell is mid-edit or mid-save.
            return false;
        }
        if !gates.term_active || !gates.table_editable {
            return false;
        }

        let info = classify_week(cell.week, gates.total_weeks);
        if !info.is_valid() {
            self.notifier.show_warning(
                "Week Not Available",
                format!(
                    "Week {} is not available for assessments. Use weeks 2-6 or 8-{} for weekly assessments, week 7 for summative tests, or week {} for exams.",
                    cell.week,
                    gates.total_weeks.saturating_sub(1),
                    gates.total_weeks
                ),
            );
            return false;
        }
        if !gates.is_current_or_past_week(cell.week) {
            self.notifier.show_warning(
                "Future Week",
                format!(
                    "Cannot record assessments for week {}. The current week is {}. You can only record assessments for current and past weeks.",
                    cell.week,
                    gates.current_week.unwrap_or_default()
                ),
            );
            return false;
        }
        if modality == InputModality::Pointer && activation == Activation::Single {
            return false;
        }

        self.slot = Some(EditingCell {
            cell,
            previous,
            entered: previous.map(|score| score.to_string()).unwrap_or_default(),
            info,
        });
        self.state = CellState::Editing;
        true
    }

    /// Replace the entered text. Returns whether the input was accepted.
    ///
    /// Empty input is allowed (clearing the box); non-numeric input is
    /// rejected silently; a numeric value above the week's ceiling is
    /// rejected with a warning and the entered text stays as it was.
    pub fn input(&mut self, text: &str) -> bool {
        if self.state != CellState::Editing {
            return false;
        }
        let Some(slot) = self.slot.as_mut() else {
            return false;
        };

        if text.is_empty() {
            slot.entered.clear();
            return true;
        }
        if !is_numeric_input(text) {
            return false;
        }

        let Ok(value) = text.parse::<u32>() else {
            return false;
        };
        if value > slot.info.max_points {
            let week = slot.cell.week;
            let max_points = slot.info.max_points;
            let phrase = slot.info.kind.phrase();
            self.notifier.show_warning(
                "Invalid Score",
                format!(
                    "Maximum score for {phrase} in Week {week} is {max_points} points. You entered {value}."
                ),
            );
            return false;
        }

        slot.entered = text.to_string();
        true
    }

    /// Discard the pending edit. No network call is ever made for a
    /// cancelled edit.
    pub fn cancel(&mut self) {
        if self.state == CellState::Editing {
            self.slot = None;
            self.state = CellState::Idle;
        }
    }

    /// Close the edit and decide whether it needs a save.
    ///
    /// An unchanged or unparsable value closes the box with no further
    /// work; a changed numeric value moves the machine to `Saving` and
    /// hands the request to the coordinator.
    pub fn take_commit(&mut self) -> CommitDecision {
        if self.state != CellState::Editing {
            return CommitDecision::NoOp;
        }
        let Some(slot) = self.slot.clone() else {
            return CommitDecision::NoOp;
        };

        let parsed = slot.entered.parse::<u32>().ok();
        let Some(score) = parsed else {
            self.slot = None;
            self.state = CellState::Idle;
            return CommitDecision::NoOp;
        };
        if Some(score) == slot.previous {
            self.slot = None;
            self.state = CellState::Idle;
            return CommitDecision::NoOp;
        }

        self.state = CellState::Saving;
        CommitDecision::Save(SaveRequest {
            cell: slot.cell.clone(),
            previous: slot.previous,
            entered: slot.entered.clone(),
            score,
            info: slot.info,
        })
    }

    /// Release the slot before the network round trip. The edit box closes
    /// immediately; input is never blocked on network latency.
    pub fn finish_save(&mut self) {
        if self.state == CellState::Saving {
            self.slot = None;
            self.state = CellState::Idle;
        }
    }

    /// Reopen the edit after a failed reconciliation, restoring the exact
    /// prior edit context and the failed value so the user can retry.
    pub fn reopen(&mut self, request: &SaveRequest) {
        self.slot = Some(EditingCell {
            cell: request.cell.clone(),
            previous: request.previous,
            entered: request.entered.clone(),
            info: request.info,
        });
        self.state = CellState::Editing;
    }
}
