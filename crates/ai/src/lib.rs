//! Client for the external text-classification service.
//!
//! Wraps the text-generation HTTP endpoint the platform uses to classify
//! free-text survey answers. This crate only performs the call and extracts
//! the model's raw text output; parsing and normalization into the fixed
//! analysis schema live in `cocosurvey_core::analysis` so the API handler
//! and the submission pipeline share one code path.

pub mod client;

pub use client::{AnalysisApiError, AnalysisClient, AnalysisSettings};
