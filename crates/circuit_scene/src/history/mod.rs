//! # History Recorder
//!
//! Bounded undo/redo log of simulation snapshots.
//!
//! The recorder keeps two stacks: `history`, whose newest entry is the
//! current state, and `future`, holding snapshots that were undone and can
//! be redone. Recording a new snapshot discards the future. When `history`
//! grows past its capacity the oldest snapshots are evicted first.
//!
//! Snapshots are immutable once captured and handed out as
//! `Arc<Snapshot<S>>`, so readers never observe a snapshot changing.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use crate::config::HistoryConfig;

/// Immutable capture of the circuit's logic state at one step
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<S> {
    components: HashMap<String, S>,
    wires: HashMap<String, S>,
    step: u64,
    captured_at: Instant,
}

impl<S> Snapshot<S> {
    /// Per-component states
    pub fn components(&self) -> &HashMap<String, S> {
        &self.components
    }

    /// Per-wire states
    pub fn wires(&self) -> &HashMap<String, S> {
        &self.wires
    }

    /// Step number, unique and increasing over the recorder's lifetime
    pub fn step(&self) -> u64 {
        self.step
    }

    /// When the snapshot was captured
    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }
}

/// Undo/redo log of [`Snapshot`]s
#[derive(Debug)]
pub struct HistoryRecorder<S> {
    /// Oldest at the front, current state at the back
    history: VecDeque<Arc<Snapshot<S>>>,
    /// Next redo at the back
    future: VecDeque<Arc<Snapshot<S>>>,
    capacity: usize,
    next_step: u64,
    recording: bool,
}

impl<S: Clone> Default for HistoryRecorder<S> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<S: Clone> HistoryRecorder<S> {
    /// Create an empty recorder; a capacity of zero is raised to one
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            history: VecDeque::new(),
            future: VecDeque::new(),
            capacity: config.capacity.max(1),
            next_step: 0,
            recording: config.recording,
        }
    }

    /// Capture a snapshot of the given states.
    ///
    /// Returns the new step number, or `None` while recording is disabled.
    pub fn record(&mut self, components: &HashMap<String, S>, wires: &HashMap<String, S>) -> Option<u64> {
        if !self.recording {
            return None;
        }

        let step = self.next_step;
        self.next_step += 1;

        self.history.push_back(Arc::new(Snapshot {
            components: components.clone(),
            wires: wires.clone(),
            step,
            captured_at: Instant::now(),
        }));
        self.future.clear();

        while self.history.len() > self.capacity {
            self.history.pop_front();
        }

        log::trace!("Recorded history step {step} ({} retained)", self.history.len());
        Some(step)
    }

    /// Step back to the previous snapshot.
    ///
    /// Fails when there is no earlier snapshot to return to.
    pub fn undo(&mut self) -> bool {
        if self.history.len() <= 1 {
            return false;
        }
        let Some(current) = self.history.pop_back() else {
            return false;
        };
        self.future.push_back(current);
        log::debug!("Undo to step {:?}", self.current_step());
        true
    }

    /// Re-apply the most recently undone snapshot
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_back() else {
            return false;
        };
        self.history.push_back(next);
        log::debug!("Redo to step {:?}", self.current_step());
        true
    }

    /// Move back to the retained snapshot at `index` (0 is the oldest).
    ///
    /// Undoes one step at a time, so the skipped snapshots become redoable.
    /// Indices outside the retained history are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.history.len() {
            return false;
        }

        while self.history.len() > index + 1 {
            if !self.undo() {
                return false;
            }
        }
        true
    }

    /// The current snapshot
    pub fn current_state(&self) -> Option<Arc<Snapshot<S>>> {
        self.history.back().cloned()
    }

    /// Step number of the current snapshot
    pub fn current_step(&self) -> Option<u64> {
        self.history.back().map(|snapshot| snapshot.step)
    }

    /// Number of retained snapshots, current state included
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Number of redoable snapshots
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Maximum number of retained snapshots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Enable or disable recording
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    /// Whether `record` currently captures snapshots
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Drop all snapshots; step numbers keep increasing
    pub fn clear(&mut self) {
        self.history.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(pairs: &[(&str, i32)]) -> HashMap<String, i32> {
        pairs.iter().map(|(id, v)| ((*id).to_string(), *v)).collect()
    }

    fn recorder(capacity: usize) -> HistoryRecorder<i32> {
        HistoryRecorder::new(HistoryConfig { capacity, recording: true })
    }

    #[test]
    fn test_record_after_undo_discards_branch() {
        let mut history = recorder(16);
        let a = states(&[("g1", 0)]);
        let b = states(&[("g1", 1)]);
        let c = states(&[("g1", 2)]);
        let none = HashMap::new();

        history.record(&a, &none);
        history.record(&b, &none);
        assert!(history.undo());
        assert_eq!(history.current_state().unwrap().components(), &a);

        history.record(&c, &none);
        assert_eq!(history.future_len(), 0);
        assert!(!history.redo());
        assert_eq!(history.current_state().unwrap().components(), &c);
    }

    #[test]
    fn test_undo_then_redo_restores_same_snapshot() {
        let mut history = recorder(16);
        let none = HashMap::new();
        for v in 0..5 {
            history.record(&states(&[("w", v)]), &states(&[("wire", -v)]));
        }
        let before = history.current_state().unwrap();

        assert!(history.undo());
        assert!(history.redo());

        let after = history.current_state().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.step(), 4);
        assert_eq!(after.wires(), &states(&[("wire", -4)]));

        history.record(&none, &none);
        assert_eq!(history.future_len(), 0);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = recorder(3);
        let none = HashMap::new();
        for v in 0..10 {
            history.record(&states(&[("g", v)]), &none);
            assert!(history.len() <= 3);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.current_step(), Some(9));
        assert!(history.undo());
        assert!(history.undo());
        assert!(!history.undo());
        assert_eq!(history.current_step(), Some(7));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut history = recorder(4);
        let mut live = states(&[("g1", 1)]);
        history.record(&live, &HashMap::new());

        live.insert("g1".to_string(), 99);
        assert_eq!(history.current_state().unwrap().components()["g1"], 1);
    }

    #[test]
    fn test_nothing_to_undo_or_redo() {
        let mut history = recorder(4);
        assert!(!history.undo());
        assert!(!history.redo());
        assert!(history.current_state().is_none());

        history.record(&HashMap::new(), &HashMap::new());
        assert!(!history.undo());
    }

    #[test]
    fn test_jump_to_only_moves_back() {
        let mut history = recorder(8);
        let none = HashMap::new();
        for v in 0..5 {
            history.record(&states(&[("g", v)]), &none);
        }

        assert!(history.jump_to(1));
        assert_eq!(history.current_step(), Some(1));
        assert_eq!(history.len(), 2);
        assert_eq!(history.future_len(), 3);

        // Snapshots past the current one are only reachable through redo
        assert!(!history.jump_to(3));
        assert_eq!(history.current_step(), Some(1));
        assert_eq!(history.future_len(), 3);

        assert!(history.jump_to(1));
        assert_eq!(history.len(), 2);

        assert!(history.jump_to(0));
        assert_eq!(history.current_step(), Some(0));
        assert_eq!(history.future_len(), 4);
        assert!(!history.jump_to(5));
    }

    #[test]
    fn test_step_numbers_stay_monotonic() {
        let mut history = recorder(2);
        let none = HashMap::new();
        history.record(&none, &none);
        history.record(&none, &none);
        history.undo();
        assert_eq!(history.record(&none, &none), Some(2));

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.record(&none, &none), Some(3));
    }

    #[test]
    fn test_recording_toggle() {
        let mut history = recorder(4);
        history.set_recording(false);
        assert!(!history.is_recording());
        assert_eq!(history.record(&HashMap::new(), &HashMap::new()), None);
        assert!(history.is_empty());

        history.set_recording(true);
        assert_eq!(history.record(&HashMap::new(), &HashMap::new()), Some(0));
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(recorder(0).capacity(), 1);
    }
}
