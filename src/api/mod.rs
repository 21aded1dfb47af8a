//! API Module
//!
//! HTTP handlers and routing for the study cache REST API: read-through
//! entity reads, invalidating writes, metrics exposition, and health.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
