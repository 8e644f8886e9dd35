//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (add request ID)
//!     → middleware/origin_scrutiny.rs (exclude, scrutinize)
//!         → forward to the downstream handler
//!         → or response.rs (bare 403 Forbidden)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{scrutiny_middleware, ScrutinyState};
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
