use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};

use crate::common::SubmissionId;
use crate::domains::submissions::errors::SubmissionError;

/// Separates action from handle in a decision payload: `approve|<handle>`
pub const PAYLOAD_DELIMITER: char = '|';

/// Format used for decision timestamps shown to reviewers
pub const DECISION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionAction {
    Approve,
    Reject,
}

impl DecisionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionAction::Approve => "approve",
            DecisionAction::Reject => "reject",
        }
    }

    /// Button label on the review prompt
    pub fn button_label(&self) -> &'static str {
        match self {
            DecisionAction::Approve => "通过",
            DecisionAction::Reject => "不通过",
        }
    }
}

impl fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(DecisionAction::Approve),
            "reject" => Ok(DecisionAction::Reject),
            _ => Err(()),
        }
    }
}

/// Parsed `<action>|<handle>` button payload.
///
/// The handle stays opaque here; an unparseable handle is simply unknown to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionPayload {
    pub action: DecisionAction,
    pub handle: String,
}

impl DecisionPayload {
    pub fn new(action: DecisionAction, id: SubmissionId) -> Self {
        Self {
            action,
            handle: id.to_string(),
        }
    }

    /// Split on the first delimiter. A missing delimiter, unknown action or
    /// empty handle is malformed.
    pub fn parse(raw: &str) -> Result<Self, SubmissionError> {
        let malformed = || SubmissionError::MalformedPayload {
            payload: raw.to_string(),
        };

        let (action, handle) = raw.split_once(PAYLOAD_DELIMITER).ok_or_else(malformed)?;
        let action = action.parse::<DecisionAction>().map_err(|_| malformed())?;
        if handle.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            action,
            handle: handle.to_string(),
        })
    }

    pub fn encode(&self) -> String {
        format!("{}{}{}", self.action, PAYLOAD_DELIMITER, self.handle)
    }
}

impl FromStr for DecisionPayload {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Moderator who pressed a decision button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerIdentity {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl ReviewerIdentity {
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

/// One reviewer action against one handle
#[derive(Debug, Clone)]
pub struct DecisionEvent {
    pub handle: String,
    pub action: DecisionAction,
    pub reviewer: ReviewerIdentity,
    pub decided_at: DateTime<Local>,
}

impl DecisionEvent {
    pub fn from_payload(
        payload: DecisionPayload,
        reviewer: ReviewerIdentity,
        decided_at: DateTime<Local>,
    ) -> Self {
        Self {
            handle: payload.handle,
            action: payload.action,
            reviewer,
            decided_at,
        }
    }
}
