//! Submissions domain actions - entry-point business logic
//!
//! Called from the chat handlers once an update has been parsed.

pub mod intake;
pub mod review;

pub use intake::{decision_buttons, review_prompt, submit};
pub use review::{decide, decision_annotation, published_text, DecisionOutcome, Delivery};
