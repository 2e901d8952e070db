//! Telegram update routing.
//!
//! Turns raw updates into intake attempts and reviewer decisions, and renders
//! the results back into the chat. Every failure here is logged and reported
//! to the user involved; nothing propagates out of `handle_update`.

use chrono::Local;
use telegram::models::{CallbackQuery, Message, Update, User};
use tracing::{debug, info, warn};

use super::intake_state::IntakeKey;
use super::messages::{
    invalid_format_text, DECISION_FAILED, DECISION_NOT_FOUND, SUBMISSION_FAILED,
    SUBMISSION_PROMPT, SUBMISSION_RECEIVED, WELCOME_TEXT,
};
use crate::domains::submissions::actions::{decide, submit, Delivery};
use crate::domains::submissions::{
    DecisionEvent, DecisionPayload, ReviewerIdentity, SubmissionError, SubmitterIdentity,
    SUBMISSION_TEMPLATE,
};
use crate::kernel::{Destination, ServerDeps};

/// Appended to the review message when an approved post could not be published
pub const PUBLISH_FAILED_NOTE: &str = "⚠️ 频道发布失败，请手动转发";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Submit,
    Template,
}

/// Recognise `/submit` and `/template`, including the `/cmd@botname` form
pub fn parse_command(text: &str) -> Option<Command> {
    let word = text.trim_start().strip_prefix('/')?.split_whitespace().next()?;
    match word.split('@').next()? {
        "submit" => Some(Command::Submit),
        "template" => Some(Command::Template),
        _ => None,
    }
}

/// Where an inbound message came from
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub chat_id: i64,
    pub message_id: i64,
    pub user: User,
}

impl ChatContext {
    fn intake_key(&self) -> IntakeKey {
        IntakeKey {
            chat_id: self.chat_id,
            user_id: self.user.id,
        }
    }

    fn destination(&self) -> Destination {
        Destination::Chat(self.chat_id)
    }
}

fn submitter_of(user: &User) -> SubmitterIdentity {
    SubmitterIdentity::new(
        user.first_name.clone(),
        user.last_name.clone(),
        user.username.clone(),
    )
}

fn reviewer_of(user: &User) -> ReviewerIdentity {
    ReviewerIdentity {
        user_id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

pub async fn handle_update(update: Update, deps: &ServerDeps) {
    let update_id = update.update_id;

    if let Some(query) = update.callback_query {
        on_decision_event(&query, deps).await;
    } else if let Some(message) = update.message {
        on_message(message, deps).await;
    } else {
        debug!(update_id, "Ignoring update without message or callback");
    }
}

async fn on_message(message: Message, deps: &ServerDeps) {
    let Some(user) = message.from else {
        debug!(chat_id = message.chat.id, "Ignoring message without sender");
        return;
    };

    let ctx = ChatContext {
        chat_id: message.chat.id,
        message_id: message.message_id,
        user,
    };

    match message.text {
        Some(text) => on_text(&ctx, &text, deps).await,
        // Photos and stickers only count while a submission is expected
        None if deps.intake.is_awaiting(&ctx.intake_key()) => on_text(&ctx, "", deps).await,
        None => {}
    }
}

/// Route one text message from a user
pub async fn on_text(ctx: &ChatContext, text: &str, deps: &ServerDeps) {
    if deps.intake.is_awaiting(&ctx.intake_key()) {
        receive_submission(ctx, text, deps).await;
        return;
    }

    match parse_command(text) {
        Some(Command::Submit) => {
            deps.intake.begin(ctx.intake_key());
            reply(ctx, SUBMISSION_PROMPT, deps).await;
        }
        Some(Command::Template) => {
            send(ctx, &SUBMISSION_TEMPLATE, deps).await;
        }
        None => {
            reply(ctx, WELCOME_TEXT, deps).await;
        }
    }
}

async fn receive_submission(ctx: &ChatContext, text: &str, deps: &ServerDeps) {
    match submit(text, submitter_of(&ctx.user), deps).await {
        Ok(id) => {
            deps.intake.finish(&ctx.intake_key());
            info!(handle = %id, user_id = ctx.user.id, "Submission received");
            reply(ctx, SUBMISSION_RECEIVED, deps).await;
        }
        Err(SubmissionError::Validation) => {
            debug!(user_id = ctx.user.id, "Submission did not match template");
            reply(ctx, &invalid_format_text(&SUBMISSION_TEMPLATE), deps).await;
        }
        Err(e) => {
            warn!(user_id = ctx.user.id, error = %e, "Submission intake failed");
            reply(ctx, SUBMISSION_FAILED, deps).await;
        }
    }
}

/// Handle a decision button press from a reviewer
pub async fn on_decision_event(query: &CallbackQuery, deps: &ServerDeps) {
    let raw = query.data.as_deref().unwrap_or_default();

    let payload = match DecisionPayload::parse(raw) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(callback_id = %query.id, error = %e, "Error processing callback data");
            answer(&query.id, DECISION_FAILED, deps).await;
            return;
        }
    };

    let event = DecisionEvent::from_payload(payload, reviewer_of(&query.from), Local::now());

    match decide(event, deps).await {
        Ok(outcome) => {
            answer(&query.id, &outcome.annotation, deps).await;

            // Replace the prompt with its outcome; editing drops the buttons
            if let Some(message) = &query.message {
                let mut text = format!(
                    "{}\n\n{}",
                    message.text.as_deref().unwrap_or_default(),
                    outcome.annotation
                );
                if matches!(outcome.delivery, Delivery::PublishFailed { .. }) {
                    text.push_str("\n\n");
                    text.push_str(PUBLISH_FAILED_NOTE);
                }

                if let Err(e) = deps
                    .gateway
                    .edit_message(&Destination::Chat(message.chat.id), message.message_id, &text)
                    .await
                {
                    warn!(message_id = message.message_id, error = %e, "Failed to update review message");
                }
            }
        }
        Err(e) if e.is_not_found() => {
            info!(callback_id = %query.id, error = %e, "Decision on non-pending submission");
            answer(&query.id, DECISION_NOT_FOUND, deps).await;
        }
        Err(e) => {
            warn!(callback_id = %query.id, error = %e, "Decision failed");
            answer(&query.id, DECISION_FAILED, deps).await;
        }
    }
}

async fn reply(ctx: &ChatContext, text: &str, deps: &ServerDeps) {
    if let Err(e) = deps
        .gateway
        .send_text(&ctx.destination(), text, Some(ctx.message_id), &[])
        .await
    {
        warn!(chat_id = ctx.chat_id, error = %e, "Failed to reply");
    }
}

async fn send(ctx: &ChatContext, text: &str, deps: &ServerDeps) {
    if let Err(e) = deps
        .gateway
        .send_text(&ctx.destination(), text, None, &[])
        .await
    {
        warn!(chat_id = ctx.chat_id, error = %e, "Failed to send message");
    }
}

async fn answer(event_id: &str, text: &str, deps: &ServerDeps) {
    if let Err(e) = deps.gateway.answer_decision(event_id, text).await {
        warn!(callback_id = %event_id, error = %e, "Failed to answer callback");
    }
}
