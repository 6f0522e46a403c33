//! Stroke store: the current page's stroke list plus a linear undo history.

use crate::stroke::{Stroke, StrokeId};
use serde::{Deserialize, Serialize};

/// Maximum number of undo snapshots to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Owns the live stroke list. Iteration order is insertion order, which is
/// also paint order (back to front). Undo restores full prior snapshots;
/// there is no redo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
    #[serde(skip)]
    undo_stack: Vec<Vec<Stroke>>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the current list onto the undo stack. Called before every
    /// structural mutation (captured-before-mutate semantics).
    pub fn push_undo(&mut self) {
        self.undo_stack.push(self.strokes.clone());
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Append a stroke, snapshotting the prior list first.
    /// Returns the stroke's id.
    pub fn add(&mut self, stroke: Stroke) -> StrokeId {
        self.push_undo();
        let id = stroke.id();
        self.strokes.push(stroke);
        id
    }

    /// In-place mutation without an undo entry. Movement and resizing are
    /// continuous; only structural operations are undo-tracked.
    pub fn update<F: FnOnce(&mut Stroke)>(&mut self, id: StrokeId, f: F) -> bool {
        match self.strokes.iter_mut().find(|s| s.id() == id) {
            Some(stroke) => {
                f(stroke);
                true
            }
            None => false,
        }
    }

    /// Remove a stroke by id, snapshotting first if it exists.
    pub fn remove(&mut self, id: StrokeId) -> Option<Stroke> {
        let pos = self.strokes.iter().position(|s| s.id() == id)?;
        self.push_undo();
        Some(self.strokes.remove(pos))
    }

    /// Restore the most recent snapshot. Returns false when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.strokes = previous;
                true
            }
            None => false,
        }
    }

    /// Snapshot the current list and empty it.
    pub fn clear(&mut self) {
        if self.strokes.is_empty() {
            return;
        }
        self.push_undo();
        self.strokes.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: StrokeId) -> Option<&mut Stroke> {
        self.strokes.iter_mut().find(|s| s.id() == id)
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Replace the live list wholesale (page switching). Drops the undo
    /// history, which is scoped to a page's live session.
    pub fn load(&mut self, strokes: Vec<Stroke>) {
        self.strokes = strokes;
        self.undo_stack.clear();
    }

    /// Clone the live list for snapshotting into a page record.
    pub fn snapshot(&self) -> Vec<Stroke> {
        self.strokes.clone()
    }
}
