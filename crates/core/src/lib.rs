//! Domain logic for the CoCoSurvey platform.
//!
//! Pure types and functions shared by the persistence and HTTP layers:
//! survey field definitions, the conditional visibility resolver, the field
//! validation engine, analysis-result normalization, and response
//! aggregation. No database or network access.

pub mod analysis;
pub mod answer;
pub mod coerce;
pub mod error;
pub mod field;
pub mod stats;
pub mod types;
pub mod validation;
pub mod visibility;
