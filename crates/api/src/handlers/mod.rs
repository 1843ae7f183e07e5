//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `cocosurvey_db` and to the pure
//! logic in `cocosurvey_core`, mapping errors via [`crate::error::AppError`].

pub mod analyze;
pub mod auth;
pub mod forms;
pub mod responses;
pub mod stats;
pub mod survey;
