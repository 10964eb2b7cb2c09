//! Hunt session state: the currently displayed passage and its selection.
//!
//! Submissions are numbered in the order the user starts them. A finished
//! generation is applied only if it belongs to the newest submission, so a
//! slow stale request can never overwrite a newer passage (last-write-wins
//! by submission order, not completion order). A failed generation leaves
//! the previously displayed passage and its selection untouched.

use super::GenerationResult;
use super::selection::{SelectionState, Token, tokenize};

/// Handle for one generation submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubmissionId(u64);

/// The passage currently on display, with its tokens and selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePassage {
    pub result: GenerationResult,
    pub tokens: Vec<Token>,
    pub selection: SelectionState,
}

/// Per-user hunt state across generation submissions.
#[derive(Debug, Clone, Default)]
pub struct HuntSession {
    next_submission: u64,
    newest: Option<SubmissionId>,
    active: Option<ActivePassage>,
}

impl HuntSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new submission, making all earlier ones stale.
    pub fn begin_submission(&mut self) -> SubmissionId {
        self.next_submission += 1;
        let id = SubmissionId(self.next_submission);
        self.newest = Some(id);
        id
    }

    /// Applies a finished generation if it is still the newest submission.
    ///
    /// Returns true if applied. Applying replaces the displayed passage and
    /// resets the selection to empty. Stale results are discarded.
    pub fn apply_result(&mut self, id: SubmissionId, result: GenerationResult) -> bool {
        if self.newest != Some(id) {
            return false;
        }
        let tokens = tokenize(&result.passage);
        self.active = Some(ActivePassage {
            result,
            tokens,
            selection: SelectionState::new(),
        });
        true
    }

    /// The currently displayed passage, if any.
    pub fn active(&self) -> Option<&ActivePassage> {
        self.active.as_ref()
    }

    /// Mutable access for toggling selection on the displayed passage.
    pub fn active_mut(&mut self) -> Option<&mut ActivePassage> {
        self.active.as_mut()
    }

    /// Explicitly clears the displayed passage and selection.
    pub fn clear(&mut self) {
        self.active = None;
    }
}

impl ActivePassage {
    /// Toggles selection of a token on the displayed passage.
    pub fn toggle(&mut self, index: usize) {
        self.selection.toggle(&self.tokens, index);
    }
}
