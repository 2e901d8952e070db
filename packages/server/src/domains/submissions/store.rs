//! In-memory submission store.
//!
//! The store is the source of truth for "still pending": an entry exists only
//! while its submission awaits a decision. Submitter identity lives inside the
//! same entry, so it is always removed together with the content.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use super::models::{Submission, SubmitterIdentity};
use crate::common::SubmissionId;

/// Thread-safe, cloneable handle to the pending submissions table.
///
/// Grows by one entry per intake and shrinks only when a decision takes the
/// entry out. Nothing expires on its own.
#[derive(Clone, Default)]
pub struct SubmissionStore {
    entries: Arc<DashMap<SubmissionId, Submission>>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new pending submission under a fresh random handle.
    pub fn put(&self, content: String, submitter: SubmitterIdentity) -> SubmissionId {
        loop {
            let id = SubmissionId::new();
            // A v4 collision is practically impossible, but a handle must never
            // point at two live submissions
            if let Entry::Vacant(slot) = self.entries.entry(id) {
                slot.insert(Submission::new(id, content, submitter));
                debug!(handle = %id, "Submission stored");
                return id;
            }
        }
    }

    pub fn get(&self, id: &SubmissionId) -> Option<Submission> {
        self.entries.get(id).map(|entry| entry.value().clone())
    }

    /// Atomically remove the entry and hand it back.
    ///
    /// Of several concurrent callers on the same handle at most one gets `Some`.
    pub fn take(&self, id: &SubmissionId) -> Option<Submission> {
        self.entries.remove(id).map(|(_, submission)| submission)
    }

    /// Delete the entry if present. Returns whether anything was removed.
    pub fn remove(&self, id: &SubmissionId) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn contains(&self, id: &SubmissionId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of every pending submission, oldest first
    pub fn snapshot(&self) -> Vec<Submission> {
        let mut pending: Vec<Submission> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        pending.sort_by_key(|submission| submission.submitted_at);
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::submissions::models::SubmissionStatus;

    fn submitter() -> SubmitterIdentity {
        SubmitterIdentity::new("Alice", None, Some("alice".to_string()))
    }

    #[test]
    fn test_put_then_get_returns_pending_submission() {
        let store = SubmissionStore::new();
        let id = store.put("hello".to_string(), submitter());

        let submission = store.get(&id).unwrap();
        assert_eq!(submission.id, id);
        assert_eq!(submission.content, "hello");
        assert_eq!(submission.submitter, submitter());
        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_unknown_handle() {
        let store = SubmissionStore::new();
        assert!(store.get(&SubmissionId::new()).is_none());
    }

    #[test]
    fn test_take_removes_exactly_once() {
        let store = SubmissionStore::new();
        let id = store.put("hello".to_string(), submitter());

        assert!(store.take(&id).is_some());
        assert!(store.take(&id).is_none());
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_is_unconditional() {
        let store = SubmissionStore::new();
        let id = store.put("hello".to_string(), submitter());

        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(!store.contains(&id));
    }

    #[test]
    fn test_same_submitter_gets_independent_handles() {
        let store = SubmissionStore::new();
        let first = store.put("one".to_string(), submitter());
        let second = store.put("two".to_string(), submitter());

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);

        store.take(&first);
        assert_eq!(store.get(&second).unwrap().content, "two");
    }

    #[test]
    fn test_snapshot_lists_pending_only() {
        let store = SubmissionStore::new();
        let first = store.put("one".to_string(), submitter());
        let second = store.put("two".to_string(), submitter());
        store.take(&first);

        let pending = store.snapshot();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second);
    }

    #[test]
    fn test_concurrent_take_has_single_winner() {
        let store = SubmissionStore::new();
        let id = store.put("contested".to_string(), submitter());

        let winners: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| store.take(&id).is_some() as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(winners, 1);
        assert!(store.is_empty());
    }
}
