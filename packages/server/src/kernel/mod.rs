//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{Destinations, ServerDeps, TelegramAdapter};
pub use test_dependencies::{GatewayCall, MockGateway, TestDependencies};
pub use traits::*;
