// Submission Bot - Core
//
// Collects templated submissions over Telegram, queues them for moderator
// review, and publishes approved ones to a channel. All state is in-memory.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
