//! Intake: validate a submission, queue it, and put it in front of moderators.

use tracing::{error, info};

use crate::common::SubmissionId;
use crate::domains::submissions::data::{DecisionAction, DecisionPayload};
use crate::domains::submissions::errors::SubmissionError;
use crate::domains::submissions::models::SubmitterIdentity;
use crate::domains::submissions::template::validate_submission;
use crate::kernel::{Button, ServerDeps};

/// Text of the decision prompt posted to the review group
pub fn review_prompt(submitter: &SubmitterIdentity, content: &str) -> String {
    format!("新投稿来自 {}:\n\n{}", submitter.label(), content)
}

/// Approve / reject buttons bound to one handle
pub fn decision_buttons(id: SubmissionId) -> Vec<Button> {
    [DecisionAction::Approve, DecisionAction::Reject]
        .into_iter()
        .map(|action| Button::Action {
            label: action.button_label().to_string(),
            payload: DecisionPayload::new(action, id).encode(),
        })
        .collect()
}

/// Accept a submission from a user.
///
/// Returns the new handle once the decision prompt is in the review group.
/// If the prompt cannot be delivered the entry is dropped again, since no
/// moderator could ever act on it.
pub async fn submit(
    content: &str,
    submitter: SubmitterIdentity,
    deps: &ServerDeps,
) -> Result<SubmissionId, SubmissionError> {
    validate_submission(content)?;

    let prompt = review_prompt(&submitter, content);
    let id = deps.store.put(content.to_string(), submitter);

    if let Err(e) = deps
        .gateway
        .send_text(&deps.destinations.review, &prompt, None, &decision_buttons(id))
        .await
    {
        error!(handle = %id, error = %e, "Failed to post submission for review");
        deps.store.remove(&id);
        return Err(SubmissionError::Gateway(e));
    }

    info!(handle = %id, pending = deps.store.len(), "Submission queued for review");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::submissions::models::SubmissionStatus;
    use crate::kernel::{MockGateway, TestDependencies};

    const SAMPLE: &str = "昵称：A\n性别：B\n年龄：C\n身高：D\n体重：E\n性格：F\n爱好：G\n性癖：H\n雷区：I\n在线时间：J\n想找的人：K\n联系方式：L";

    fn submitter() -> SubmitterIdentity {
        SubmitterIdentity::new("Alice", None, Some("alice".to_string()))
    }

    #[tokio::test]
    async fn test_valid_submission_is_queued_and_prompted() {
        let test = TestDependencies::new();
        let deps = test.server_deps();

        let id = submit(SAMPLE, submitter(), &deps).await.unwrap();

        let stored = deps.store.get(&id).unwrap();
        assert_eq!(stored.status, SubmissionStatus::Pending);
        assert_eq!(stored.content, SAMPLE);

        let review = TestDependencies::review_destination();
        let prompts = test.gateway.texts_to(&review);
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].starts_with("新投稿来自 Alice (@alice):\n\n昵称：A"));

        let buttons = test.gateway.buttons_to(&review);
        assert_eq!(buttons[0], decision_buttons(id));
        assert_eq!(buttons[0].len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_submission_touches_nothing() {
        let test = TestDependencies::new();
        let deps = test.server_deps();

        let err = submit("hello", submitter(), &deps).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Validation));
        assert!(deps.store.is_empty());
        assert!(test.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_undeliverable_prompt_drops_entry() {
        let test = TestDependencies::new().with_gateway(MockGateway::new().failing_sends());
        let deps = test.server_deps();

        let err = submit(SAMPLE, submitter(), &deps).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Gateway(_)));
        assert!(deps.store.is_empty());
    }

    #[test]
    fn test_decision_buttons_payloads() {
        let id = SubmissionId::new();
        let buttons = decision_buttons(id);

        assert_eq!(
            buttons,
            vec![
                Button::Action {
                    label: "通过".to_string(),
                    payload: format!("approve|{}", id),
                },
                Button::Action {
                    label: "不通过".to_string(),
                    payload: format!("reject|{}", id),
                },
            ]
        );
    }
}
