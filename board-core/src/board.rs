//! # Board Store
//!
//! Ordered, append-only record of draw actions.
//!
//! The store holds only the effective board. A clear, whether appended or
//! embedded in a snapshot, drops everything before it:
//!
//! ```text
//! appended:  p1, p2, CLEAR, p3, p4
//! retained:  [p3, p4]
//! ```

use crate::DrawAction;

/// Holds the ordered sequence of actions that makes up the canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardStore {
    /// Actions after the most recent clear.
    actions: Vec<DrawAction>,
    /// Number of clears seen since creation.
    clears: u64,
}

impl BoardStore {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire board with a full snapshot.
    ///
    /// A clear inside the snapshot still hides everything before it.
    pub fn reset(&mut self, mut actions: Vec<DrawAction>) {
        if let Some(idx) = actions.iter().rposition(DrawAction::is_clear) {
            actions.drain(..=idx);
            self.clears += 1;
        }
        tracing::trace!(actions = actions.len(), "Board reset");
        self.actions = actions;
    }

    /// Append one action to the tail, or clear the board for a clear
    /// command.
    pub fn append(&mut self, action: DrawAction) {
        if action.is_clear() {
            tracing::debug!(dropped = self.actions.len(), "Board cleared");
            self.actions.clear();
            self.clears += 1;
        } else {
            self.actions.push(action);
        }
    }

    /// The effective board, in insertion order.
    #[must_use]
    pub fn snapshot_for_render(&self) -> &[DrawAction] {
        &self.actions
    }

    /// Number of actions on the effective board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the effective board is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of clears observed since creation.
    #[must_use]
    pub const fn clear_count(&self) -> u64 {
        self.clears
    }
}
