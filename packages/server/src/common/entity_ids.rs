//! Typed ID definitions for domain entities.

pub use super::id::Id;

/// Marker type for Submission entities (pending moderation items).
pub struct Submission;

/// Handle issued at intake; the only key reviewers act on.
pub type SubmissionId = Id<Submission>;
