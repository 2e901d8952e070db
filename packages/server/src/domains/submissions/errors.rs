use thiserror::Error;

/// Failures of the submission lifecycle. None of these are fatal to the process.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Submission does not match the required template")]
    Validation,

    #[error("Submission {handle} is unknown or already decided")]
    AlreadyDecidedOrUnknown { handle: String },

    #[error("Malformed decision payload: {payload:?}")]
    MalformedPayload { payload: String },

    #[error("Gateway delivery failed: {0}")]
    Gateway(#[from] anyhow::Error),
}

impl SubmissionError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SubmissionError::AlreadyDecidedOrUnknown { .. })
    }
}
