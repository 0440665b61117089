pub mod service;
pub mod telemetry;

pub use service::{AppState, DEFAULT_MAX_UPLOAD_BYTES, create_app};
pub use telemetry::init_tracing;
