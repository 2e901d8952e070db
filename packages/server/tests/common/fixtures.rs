//! Test fixtures for building Telegram updates.
//!
//! Updates are built from JSON the same way the webhook receives them.

use serde_json::{json, Value};
use telegram::models::Update;

/// A submission that satisfies the template
pub const VALID_SUBMISSION: &str = "昵称：小明\n性别：男\n年龄：25\n身高：175\n体重：65\n性格：开朗\n爱好：读书\n性癖：无\n雷区：无\n在线时间：晚上\n想找的人：朋友\n联系方式：@xiaoming";

pub const SUBMITTER_ID: i64 = 7;
pub const SUBMITTER_CHAT: i64 = 7;
pub const REVIEWER_ID: i64 = 99;

pub fn submitter_json() -> Value {
    json!({
        "id": SUBMITTER_ID,
        "is_bot": false,
        "first_name": "Ann",
        "last_name": "Lee",
        "username": "ann"
    })
}

pub fn reviewer_json() -> Value {
    json!({
        "id": REVIEWER_ID,
        "is_bot": false,
        "first_name": "Mod",
        "last_name": "Erator"
    })
}

/// Private text message from the submitter
pub fn text_update_json(update_id: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "from": submitter_json(),
            "chat": {"id": SUBMITTER_CHAT, "type": "private"},
            "date": 1700000000,
            "text": text
        }
    })
}

pub fn text_update(update_id: i64, text: &str) -> Update {
    serde_json::from_value(text_update_json(update_id, text)).expect("valid text update")
}

/// Button press on a review prompt in the review group
pub fn decision_update(
    update_id: i64,
    callback_id: &str,
    data: &str,
    review_chat: i64,
    review_message_id: i64,
    prompt_text: &str,
) -> Update {
    serde_json::from_value(json!({
        "update_id": update_id,
        "callback_query": {
            "id": callback_id,
            "from": reviewer_json(),
            "message": {
                "message_id": review_message_id,
                "chat": {"id": review_chat, "type": "supergroup"},
                "date": 1700000000,
                "text": prompt_text
            },
            "data": data
        }
    }))
    .expect("valid callback update")
}
