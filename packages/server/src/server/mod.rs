// HTTP server setup (Axum) and the long-polling alternative
pub mod app;
pub mod polling;
pub mod routes;

pub use app::*;
pub use polling::{ctrl_c, shutdown_on, UpdatePoller};
