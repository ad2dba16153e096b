#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bounded per-round snapshot buffer backing step-by-step rewind.

use std::collections::VecDeque;

use mouse_forage_core::Snapshot;

/// FIFO ring of round snapshots, one per tick.
///
/// Once `capacity` snapshots are stored, every push evicts the oldest one.
#[derive(Clone, Debug)]
pub struct History {
    capacity: usize,
    snapshots: VecDeque<Snapshot>,
}

impl History {
    /// Creates an empty history holding at most `capacity` snapshots.
    ///
    /// A zero capacity is raised to one so the current tick always fits.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            snapshots: VecDeque::with_capacity(capacity),
        }
    }

    /// Maximum number of snapshots retained.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of snapshots currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no snapshot is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Appends a snapshot, evicting the oldest one when full.
    pub fn push(&mut self, snapshot: Snapshot) {
        while self.snapshots.len() >= self.capacity {
            let _ = self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Discards the `steps` most recent snapshots and returns the new latest one.
    ///
    /// With one snapshot or fewer nothing happens and `None` is returned.
    /// `steps` is clamped so the oldest snapshot always survives. Rewinding by
    /// zero returns the latest snapshot unchanged.
    pub fn rewind(&mut self, steps: usize) -> Option<&Snapshot> {
        if self.snapshots.len() <= 1 {
            return None;
        }

        let steps = steps.min(self.snapshots.len() - 1);
        self.snapshots.truncate(self.snapshots.len() - steps);
        self.snapshots.back()
    }

    /// Most recently pushed snapshot.
    #[must_use]
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    /// Oldest snapshot still retained.
    #[must_use]
    pub fn oldest(&self) -> Option<&Snapshot> {
        self.snapshots.front()
    }

    /// Iterator over the stored snapshots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    /// Drops every snapshot; called at the start of each round.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

#[cfg(test)]
mod tests {
    use mouse_forage_core::Position;

    use super::*;

    fn snapshot(tick: u32) -> Snapshot {
        Snapshot {
            agent: Position::new(tick % 10, tick / 10),
            energy: 100 - i64::from(tick),
            food_eaten: tick / 5,
            score: u64::from(tick) * 3,
            alive: true,
            food: vec![Position::new(9, tick % 10)],
        }
    }

    #[test]
    fn rewind_restores_first_pushed_snapshot() {
        let mut history = History::new(8);
        for tick in 0..6 {
            history.push(snapshot(tick));
        }

        let restored = history.rewind(5).cloned();

        assert_eq!(restored, Some(snapshot(0)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn rewind_clamps_to_keep_the_oldest_snapshot() {
        let mut history = History::new(8);
        for tick in 0..3 {
            history.push(snapshot(tick));
        }

        assert_eq!(history.rewind(50).cloned(), Some(snapshot(0)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn rewind_zero_leaves_history_unchanged() {
        let mut history = History::new(8);
        for tick in 0..3 {
            history.push(snapshot(tick));
        }

        assert_eq!(history.rewind(0).cloned(), Some(snapshot(2)));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn rewind_with_single_snapshot_is_a_no_op() {
        let mut history = History::new(8);
        assert_eq!(history.rewind(1), None);

        history.push(snapshot(0));
        assert_eq!(history.rewind(1), None);
        assert_eq!(history.latest(), Some(&snapshot(0)));
    }

    #[test]
    fn pushing_past_capacity_evicts_oldest() {
        let mut history = History::new(4);
        for tick in 0..5 {
            history.push(snapshot(tick));
        }

        assert_eq!(history.len(), 4);
        assert_eq!(history.oldest(), Some(&snapshot(1)));
        assert_eq!(history.latest(), Some(&snapshot(4)));
        let ticks: Vec<i64> = history.iter().map(|entry| 100 - entry.energy).collect();
        assert_eq!(ticks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut history = History::new(2);
        history.push(snapshot(0));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 2);
    }
}
