use std::collections::VecDeque;

use image::RgbaImage;

/// Undo/redo stacks of whole-overlay pixel snapshots.
///
/// Every snapshot is an owned deep copy, so later drawing never alters what
/// was stored.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    /// Snapshots that can be restored by undo, oldest first
    undo_stack: VecDeque<RgbaImage>,
    /// Snapshots that can be restored by redo
    redo_stack: VecDeque<RgbaImage>,
    limit: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(50)
    }
}

impl SnapshotHistory {
    /// Creates an empty history keeping at most `limit` undo snapshots
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record the state before a gesture. Clears the redo stack.
    pub fn push(&mut self, snapshot: RgbaImage) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        log::debug!("History push, {} undo snapshot(s)", self.undo_stack.len());
    }

    /// Step back. `current` is the overlay as it is now; it goes to the redo
    /// stack and the snapshot to restore is returned. With nothing to undo,
    /// `None` is returned and `current` is dropped.
    pub fn undo(&mut self, current: RgbaImage) -> Option<RgbaImage> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current);
        Some(previous)
    }

    /// Mirror of [`SnapshotHistory::undo`]
    pub fn redo(&mut self, current: RgbaImage) -> Option<RgbaImage> {
        let next = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    /// Returns true if there are snapshots that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are snapshots that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Drop every snapshot
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn marked(value: u8) -> RgbaImage {
        RgbaImage::from_pixel(2, 2, Rgba([value, 0, 0, 255]))
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut history = SnapshotHistory::default();
        assert!(history.undo(marked(1)).is_none());
        assert!(history.redo(marked(1)).is_none());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = SnapshotHistory::default();
        history.push(marked(0));

        assert_eq!(history.undo(marked(1)), Some(marked(0)));
        assert!(history.can_redo());
        assert_eq!(history.redo(marked(0)), Some(marked(1)));
        assert!(history.can_undo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = SnapshotHistory::default();
        history.push(marked(0));
        history.undo(marked(1));
        history.push(marked(0));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = SnapshotHistory::new(2);
        for value in 0..3 {
            history.push(marked(value));
        }
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.undo(marked(9)), Some(marked(2)));
        assert_eq!(history.undo(marked(2)), Some(marked(1)));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_long_session_keeps_newest() {
        let mut history = SnapshotHistory::new(3);
        for value in 0..200u8 {
            history.push(marked(value));
        }
        assert_eq!(history.undo_len(), 3);
        let restored: Vec<_> = (0..3).filter_map(|_| history.undo(marked(0))).collect();
        assert_eq!(restored, vec![marked(199), marked(198), marked(197)]);
    }
}
