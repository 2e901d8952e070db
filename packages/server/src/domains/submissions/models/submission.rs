use chrono::{DateTime, Utc};

use crate::common::SubmissionId;

/// Shown in place of a missing Telegram username
pub const UNKNOWN_USERNAME: &str = "未知用户";

/// Lifecycle of a submission. `Pending` → `Decided`, exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Pending,
    Decided,
}

/// Who sent a submission, captured at intake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitterIdentity {
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl SubmitterIdentity {
    pub fn new(
        first_name: impl Into<String>,
        last_name: Option<String>,
        username: Option<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name,
            username,
        }
    }

    /// `"{first} {last}(@{username})"`, the form shown to moderators and readers
    pub fn label(&self) -> String {
        format!(
            "{} {}(@{})",
            self.first_name,
            self.last_name.as_deref().unwrap_or(""),
            self.username.as_deref().unwrap_or(UNKNOWN_USERNAME)
        )
    }
}

/// A moderation item held in memory until a reviewer decides on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub content: String,
    pub submitter: SubmitterIdentity,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(id: SubmissionId, content: String, submitter: SubmitterIdentity) -> Self {
        Self {
            id,
            content,
            submitter,
            status: SubmissionStatus::Pending,
            submitted_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }

    /// Terminal transition. Consumes the pending value taken out of the store.
    pub fn into_decided(mut self) -> Self {
        self.status = SubmissionStatus::Decided;
        self
    }
}
