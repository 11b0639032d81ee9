//! Undo/redo history over city-set snapshots.
//!
//! The controller calls [`EditorHistory::record`] with the pre-mutation set
//! right before every add or remove. Undo and redo swap whole snapshots with
//! the live set, so no inverse operations are needed.

use crate::model::CitySet;

// ────────────────────────────────────────────────────────────────────────────
// Editor History (undo / redo stack)
// ────────────────────────────────────────────────────────────────────────────

/// Undo/redo history for the editor.
///
/// # Example
///
/// ```rust,ignore
/// let mut history = EditorHistory::new(100);
/// history.record(cities.clone());
/// cities.push(City::new(1.0, 2.0));
/// history.undo(&mut cities); // cities is back to the recorded snapshot
/// history.redo(&mut cities); // and forward again
/// ```
#[derive(Debug, Clone)]
pub struct EditorHistory {
    undo_stack: Vec<CitySet>,
    redo_stack: Vec<CitySet>,
    max_size: usize,
}

impl Default for EditorHistory {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_HISTORY_DEPTH)
    }
}

impl EditorHistory {
    /// Create a new history with the given maximum undo depth.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Push a pre-mutation snapshot and clear the redo stack.
    pub fn record(&mut self, snapshot: CitySet) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Restore the last snapshot, returning true if an undo was performed.
    pub fn undo(&mut self, cities: &mut CitySet) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                self.redo_stack.push(std::mem::replace(cities, snapshot));
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone state, returning true if a redo was performed.
    pub fn redo(&mut self, cities: &mut CitySet) -> bool {
        match self.redo_stack.pop() {
            Some(snapshot) => {
                self.undo_stack.push(std::mem::replace(cities, snapshot));
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
