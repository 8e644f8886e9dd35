//! Request middleware.

pub mod origin_scrutiny;

pub use origin_scrutiny::{scrutiny_middleware, Outcome, ScrutinyState};
