//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! scrutiny middleware produces:
//!     → logging.rs (structured log events, rejection reasons at debug)
//!     → metrics.rs (outcome and rejection-reason counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows into every scrutiny log event
//! - Rejection reasons are observable here and nowhere else

pub mod logging;
pub mod metrics;
