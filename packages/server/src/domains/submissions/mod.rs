//! Submissions domain: template validation, the pending store, and the
//! review coordinator that turns one reviewer decision into publish or discard.

pub mod actions;
pub mod data;
pub mod errors;
pub mod models;
pub mod store;
pub mod template;

// Re-export data types
pub use data::{DecisionAction, DecisionEvent, DecisionPayload, PublishLink, ReviewerIdentity};

// Re-export errors
pub use errors::SubmissionError;

// Re-export models (domain models)
pub use models::{Submission, SubmissionStatus, SubmitterIdentity};

pub use store::SubmissionStore;
pub use template::{is_valid_submission, validate_submission, FIELD_LABELS, SUBMISSION_TEMPLATE};
