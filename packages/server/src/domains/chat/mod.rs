//! Chat adapter: conversation state and update routing between Telegram and
//! the submissions domain.

pub mod handlers;
pub mod intake_state;
pub mod messages;

pub use handlers::{handle_update, on_decision_event, on_text, parse_command, ChatContext, Command};
pub use intake_state::{IntakeKey, IntakeSessions};
