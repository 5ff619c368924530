//! fiscal-core: shared infrastructure for the fiscal gateway services.
pub mod config;
pub mod error;
pub mod furs;
pub mod middleware;

pub use axum;
pub use serde;
pub use serde_json;
pub use tracing;
pub use validator;
