//! Origin scrutiny subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, headers)
//!     → matcher.rs (excluded path? forward untouched)
//!     → engine.rs (Origin/Referer vs effective host)
//!     → Verdict: Forward | Reject(Violation)
//!
//! Startup:
//!     path-exclusion-pattern string
//!     → config::exclusions (split, normalize)
//!     → PathExclusionMatcher (decode, freeze)
//! ```
//!
//! # Design Decisions
//! - Built once, immutable at runtime, shared without locks
//! - Verdicts are values, not errors; the middleware maps every
//!   rejection to the same 403
//! - Fail closed: an undecodable path is scrutinized, not excluded

pub mod engine;
pub mod headers;
pub mod matcher;

pub use engine::{ScrutinyEngine, Verdict, Violation};
pub use matcher::{DecodeError, PathExclusionMatcher};
