//! Which exam is expanded on a course page.
//!
//! The selection lives in the location fragment: it is read once when the
//! page loads and rewritten on every transition. At most one exam is
//! expanded at a time.

use crate::catalog::{Exam, ExamId, FileRow, NO_EXAM};

/// Current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    NoneSelected,
    Selected(ExamId),
}

impl SelectionState {
    pub fn selected_id(self) -> Option<ExamId> {
        match self {
            SelectionState::NoneSelected => None,
            SelectionState::Selected(id) => Some(id),
        }
    }
}

/// Who triggered a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The visitor activated the exam
    User,
    /// Load-time restoration from the fragment; never toggles off
    Restore,
}

/// What the renderer has to do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// Show `rows` under `exam`, after removing the rows of `replaced`
    Expanded {
        exam: ExamId,
        rows: Vec<FileRow>,
        replaced: Option<ExamId>,
    },
    /// Remove the rows of `exam`
    Collapsed { exam: ExamId },
}

/// Parse a fragment the way a page load does: leading digits only, `0` and
/// anything without digits meaning "no selection".
pub fn fragment_id(fragment: Option<&str>) -> Option<ExamId> {
    let digits: String = fragment?
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<ExamId>().ok().filter(|id| *id != NO_EXAM)
}

#[derive(Debug, Default)]
pub struct SelectionMachine {
    state: SelectionState,
    /// Exam whose rows are currently shown, if any
    expanded: Option<ExamId>,
}

impl SelectionMachine {
    /// Initial state recovered from the location fragment
    pub fn from_fragment(fragment: Option<&str>) -> Self {
        let state = match fragment_id(fragment) {
            Some(id) => SelectionState::Selected(id),
            None => SelectionState::NoneSelected,
        };
        Self {
            state,
            expanded: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Exam whose file rows are materialized
    pub fn expanded(&self) -> Option<ExamId> {
        self.expanded
    }

    /// Fragment encoding the current state
    pub fn fragment(&self) -> Option<String> {
        self.state.selected_id().map(|id| id.to_string())
    }

    /// Apply a click on `exam`.
    ///
    /// Returns `None` when nothing changes (a restore for an exam other than
    /// the recovered one).
    pub fn click(&mut self, exam: &Exam, origin: Origin) -> Option<SelectionChange> {
        let already_selected = self.state == SelectionState::Selected(exam.id);

        match origin {
            Origin::User if already_selected => {
                self.state = SelectionState::NoneSelected;
                self.expanded = None;
                Some(SelectionChange::Collapsed { exam: exam.id })
            }
            Origin::User => Some(self.expand(exam)),
            Origin::Restore if already_selected => Some(self.expand(exam)),
            Origin::Restore => None,
        }
    }

    fn expand(&mut self, exam: &Exam) -> SelectionChange {
        let replaced = self.expanded.filter(|id| *id != exam.id);
        self.state = SelectionState::Selected(exam.id);
        self.expanded = Some(exam.id);
        SelectionChange::Expanded {
            exam: exam.id,
            rows: exam.file_rows(),
            replaced,
        }
    }
}
