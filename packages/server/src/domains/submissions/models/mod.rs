pub mod submission;

pub use submission::{Submission, SubmissionStatus, SubmitterIdentity, UNKNOWN_USERNAME};
