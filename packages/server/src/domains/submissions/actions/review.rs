//! Review coordinator: applies exactly one decision per submission.
//!
//! The check-and-remove is a single atomic `take` on the store. Whoever wins
//! it owns the submission; everyone else sees `AlreadyDecidedOrUnknown`.
//! Publishing happens only after the removal, using the value taken out, so a
//! slow or failing publish can never cause a second route.

use chrono::{DateTime, Local};
use tracing::{error, info};

use crate::common::SubmissionId;
use crate::domains::submissions::data::{
    DecisionAction, DecisionEvent, ReviewerIdentity, DECISION_TIME_FORMAT,
};
use crate::domains::submissions::errors::SubmissionError;
use crate::domains::submissions::models::Submission;
use crate::kernel::ServerDeps;

/// What happened downstream of a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Published { message_id: i64 },
    Discarded,
    /// Approved, but the publish call failed. The decision still stands.
    PublishFailed { reason: String },
}

#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    /// The submission as it left the store, now `Decided`
    pub submission: Submission,
    pub action: DecisionAction,
    /// Status text for the reviewer-facing surface
    pub annotation: String,
    pub delivery: Delivery,
}

pub fn decision_annotation(
    action: DecisionAction,
    reviewer: &ReviewerIdentity,
    decided_at: DateTime<Local>,
) -> String {
    let headline = match action {
        DecisionAction::Approve => "✅ **投稿已通过**",
        DecisionAction::Reject => "❌ **投稿未通过**",
    };

    format!(
        "{}\n\n审核人: {}\n审核时间: {}",
        headline,
        reviewer.display_name(),
        decided_at.format(DECISION_TIME_FORMAT)
    )
}

/// Text posted to the publish channel for an approved submission
pub fn published_text(submission: &Submission) -> String {
    format!(
        "来自{}的投稿:\n\n{}",
        submission.submitter.label(),
        submission.content
    )
}

/// Apply a reviewer decision.
///
/// Returns `AlreadyDecidedOrUnknown` when the handle is not pending, whether it
/// never existed, was malformed, or lost a race against another reviewer.
pub async fn decide(
    event: DecisionEvent,
    deps: &ServerDeps,
) -> Result<DecisionOutcome, SubmissionError> {
    let not_found = || SubmissionError::AlreadyDecidedOrUnknown {
        handle: event.handle.clone(),
    };

    let id = SubmissionId::parse(&event.handle).map_err(|_| not_found())?;
    let submission = deps.store.take(&id).ok_or_else(not_found)?.into_decided();

    info!(
        handle = %id,
        action = %event.action,
        reviewer = event.reviewer.user_id,
        "Submission decided"
    );

    let annotation = decision_annotation(event.action, &event.reviewer, event.decided_at);

    let delivery = match event.action {
        DecisionAction::Approve => {
            match deps
                .gateway
                .send_published(
                    &deps.destinations.publish,
                    &published_text(&submission),
                    &deps.publish_buttons(),
                )
                .await
            {
                Ok(sent) => Delivery::Published {
                    message_id: sent.message_id,
                },
                Err(e) => {
                    error!(handle = %id, error = %e, "Failed to publish approved submission");
                    Delivery::PublishFailed {
                        reason: e.to_string(),
                    }
                }
            }
        }
        DecisionAction::Reject => {
            info!(handle = %id, "Submission rejected, discarding");
            Delivery::Discarded
        }
    };

    Ok(DecisionOutcome {
        submission,
        action: event.action,
        annotation,
        delivery,
    })
}
