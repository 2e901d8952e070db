pub mod decision;
pub mod types;

pub use decision::{
    DecisionAction, DecisionEvent, DecisionPayload, ReviewerIdentity, DECISION_TIME_FORMAT,
    PAYLOAD_DELIMITER,
};
pub use types::PublishLink;
