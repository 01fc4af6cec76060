//! Planner counters.
//!
//! Lock-free `AtomicU64` counters bumped on every planner operation and read
//! as a [`CounterSnapshot`] for export.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Atomic counters for planner events.
#[derive(Debug)]
pub struct PlannerCounters {
    /// Moves that changed the placement.
    pub moves_applied: AtomicU64,
    /// Moves rejected (disallowed or out of range).
    pub moves_rejected: AtomicU64,
    /// NPCs unplaced.
    pub removals: AtomicU64,
    /// Resets that emptied a non-empty placement.
    pub resets: AtomicU64,
    /// Snapshots written.
    pub saves_completed: AtomicU64,
    /// Stored snapshots discarded as unusable at startup.
    pub snapshot_recoveries: AtomicU64,
}

impl PlannerCounters {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            moves_applied: AtomicU64::new(0),
            moves_rejected: AtomicU64::new(0),
            removals: AtomicU64::new(0),
            resets: AtomicU64::new(0),
            saves_completed: AtomicU64::new(0),
            snapshot_recoveries: AtomicU64::new(0),
        }
    }

    /// Increment `counter` by one.
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters for export.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            moves_applied: self.moves_applied.load(Ordering::Relaxed),
            moves_rejected: self.moves_rejected.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
            saves_completed: self.saves_completed.load(Ordering::Relaxed),
            snapshot_recoveries: self.snapshot_recoveries.load(Ordering::Relaxed),
        }
    }
}

impl Default for PlannerCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter values at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    /// Moves that changed the placement.
    pub moves_applied: u64,
    /// Rejected moves.
    pub moves_rejected: u64,
    /// NPCs unplaced.
    pub removals: u64,
    /// Effective resets.
    pub resets: u64,
    /// Snapshots written.
    pub saves_completed: u64,
    /// Snapshots discarded at startup.
    pub snapshot_recoveries: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        assert_eq!(PlannerCounters::new().snapshot(), CounterSnapshot::default());
    }

    #[test]
    fn bump_increments() {
        let counters = PlannerCounters::new();
        PlannerCounters::bump(&counters.moves_applied);
        PlannerCounters::bump(&counters.moves_applied);
        PlannerCounters::bump(&counters.saves_completed);

        let snap = counters.snapshot();
        assert_eq!(snap.moves_applied, 2);
        assert_eq!(snap.saves_completed, 1);
        assert_eq!(snap.removals, 0);
    }
}
