//! Per-Declaration Progress Tracking
//!
//! Append-only log of processing outcomes, one entry per observed state
//! transition. Entries are never removed or rewritten; "current state" is
//! a projection taking the latest entry per declaration. The log gives
//! reporting and tests a natural assertion surface ("exactly one Failed
//! entry").

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::types::{DeclId, DeclKind};

// =============================================================================
// Declaration State
// =============================================================================

/// Processing state of one declaration within one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclState {
    Pending,
    Processed,
    Failed,
}

impl DeclState {
    /// Terminal states admit no further transitions within a pass.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Processed | Self::Failed)
    }
}

impl fmt::Display for DeclState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processed => write!(f, "processed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One appended log entry.
#[derive(Debug, Clone)]
pub struct TrackedEntry {
    pub scope: String,
    pub declaration: DeclId,
    pub kind: DeclKind,
    pub state: DeclState,
    pub recorded_at: DateTime<Utc>,
}

// =============================================================================
// Progress Tracker
// =============================================================================

/// Thread-safe append-only progress log.
///
/// Scopes are file paths; one tracker may be shared across the files of a
/// run, with access strictly sequential per the driver's file loop.
pub struct ProgressTracker {
    entries: Mutex<Vec<TrackedEntry>>,
}

/// Shared tracker handle passed between the walk and the driver.
pub type SharedTracker = Arc<ProgressTracker>;

pub fn create_shared_tracker() -> SharedTracker {
    Arc::new(ProgressTracker::new())
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Append one state transition.
    ///
    /// States are monotonic per declaration within a scope: once a
    /// terminal state is recorded, later transitions for the same
    /// declaration are dropped with a warning.
    pub fn track(&self, scope: &str, declaration: DeclId, kind: DeclKind, state: DeclState) {
        let mut entries = self.lock_entries();

        let current = entries
            .iter()
            .rev()
            .find(|e| e.scope == scope && e.declaration == declaration)
            .map(|e| e.state);
        if let Some(current) = current
            && current.is_terminal()
        {
            warn!(
                "Ignoring {} -> {} for {} in {}: state is terminal",
                current, state, declaration, scope
            );
            return;
        }

        entries.push(TrackedEntry {
            scope: scope.to_string(),
            declaration,
            kind,
            state,
            recorded_at: Utc::now(),
        });
    }

    /// Latest state per declaration within `scope`.
    pub fn snapshot(&self, scope: &str) -> HashMap<DeclId, DeclState> {
        let entries = self.lock_entries();
        let mut latest = HashMap::new();
        for entry in entries.iter().filter(|e| e.scope == scope) {
            latest.insert(entry.declaration.clone(), entry.state);
        }
        latest
    }

    /// All entries recorded for `scope`, in append order.
    pub fn entries(&self, scope: &str) -> Vec<TrackedEntry> {
        self.lock_entries()
            .iter()
            .filter(|e| e.scope == scope)
            .cloned()
            .collect()
    }

    /// Number of declarations whose latest state in `scope` is `state`.
    pub fn count_in_state(&self, scope: &str, state: DeclState) -> usize {
        self.snapshot(scope)
            .values()
            .filter(|s| **s == state)
            .count()
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    fn lock_entries(&self) -> MutexGuard<'_, Vec<TrackedEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Progress log mutex poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> DeclId {
        DeclId::new(DeclKind::Function, name, 1)
    }

    #[test]
    fn test_snapshot_takes_latest_entry_per_declaration() {
        let tracker = ProgressTracker::new();
        tracker.track("a.py", id("f"), DeclKind::Function, DeclState::Pending);
        tracker.track("a.py", id("f"), DeclKind::Function, DeclState::Processed);

        let snapshot = tracker.snapshot("a.py");
        assert_eq!(snapshot.get(&id("f")), Some(&DeclState::Processed));
        assert_eq!(tracker.entries("a.py").len(), 2);
    }

    #[test]
    fn test_terminal_state_blocks_further_transitions() {
        let tracker = ProgressTracker::new();
        tracker.track("a.py", id("f"), DeclKind::Function, DeclState::Pending);
        tracker.track("a.py", id("f"), DeclKind::Function, DeclState::Failed);
        tracker.track("a.py", id("f"), DeclKind::Function, DeclState::Processed);

        let snapshot = tracker.snapshot("a.py");
        assert_eq!(snapshot.get(&id("f")), Some(&DeclState::Failed));
        assert_eq!(tracker.entries("a.py").len(), 2);
    }

    #[test]
    fn test_count_in_state() {
        let tracker = ProgressTracker::new();
        for name in ["a", "b", "c"] {
            tracker.track("m.py", id(name), DeclKind::Function, DeclState::Pending);
        }
        tracker.track("m.py", id("a"), DeclKind::Function, DeclState::Processed);
        tracker.track("m.py", id("b"), DeclKind::Function, DeclState::Failed);
        tracker.track("m.py", id("c"), DeclKind::Function, DeclState::Processed);

        assert_eq!(tracker.count_in_state("m.py", DeclState::Processed), 2);
        assert_eq!(tracker.count_in_state("m.py", DeclState::Failed), 1);
        assert_eq!(tracker.count_in_state("m.py", DeclState::Pending), 0);
    }

    #[test]
    fn test_scopes_are_independent() {
        let tracker = ProgressTracker::new();
        tracker.track("a.py", id("f"), DeclKind::Function, DeclState::Processed);
        tracker.track("b.py", id("f"), DeclKind::Function, DeclState::Failed);

        assert_eq!(
            tracker.snapshot("a.py").get(&id("f")),
            Some(&DeclState::Processed)
        );
        assert_eq!(
            tracker.snapshot("b.py").get(&id("f")),
            Some(&DeclState::Failed)
        );
    }

    #[test]
    fn test_entries_preserve_append_order() {
        let tracker = ProgressTracker::new();
        tracker.track("a.py", id("f"), DeclKind::Function, DeclState::Pending);
        tracker.track("a.py", id("g"), DeclKind::Function, DeclState::Pending);
        tracker.track("a.py", id("f"), DeclKind::Function, DeclState::Processed);

        let states: Vec<DeclState> = tracker.entries("a.py").iter().map(|e| e.state).collect();
        assert_eq!(
            states,
            vec![DeclState::Pending, DeclState::Pending, DeclState::Processed]
        );
    }

    #[test]
    fn test_empty_tracker() {
        let tracker = ProgressTracker::new();
        assert!(tracker.is_empty());
        assert!(tracker.snapshot("a.py").is_empty());
    }
}
