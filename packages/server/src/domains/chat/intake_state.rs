//! Per-user conversation state for the intake flow.
//!
//! After `/submit` the user's next message is treated as the submission. The
//! flag stays set across invalid attempts and clears on a successful intake.

use std::sync::Arc;

use dashmap::DashSet;

/// A user within a specific chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntakeKey {
    pub chat_id: i64,
    pub user_id: i64,
}

#[derive(Clone, Default)]
pub struct IntakeSessions {
    awaiting: Arc<DashSet<IntakeKey>>,
}

impl IntakeSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the user as about to send a submission. A repeated `/submit` is a no-op.
    pub fn begin(&self, key: IntakeKey) {
        self.awaiting.insert(key);
    }

    pub fn is_awaiting(&self, key: &IntakeKey) -> bool {
        self.awaiting.contains(key)
    }

    /// Clear the session. Returns whether one existed.
    pub fn finish(&self, key: &IntakeKey) -> bool {
        self.awaiting.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.awaiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.awaiting.is_empty()
    }
}
