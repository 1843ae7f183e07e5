//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` row struct matching the database row (JSONB columns raw)
//! - A decoded entity struct for API output where the row carries documents
//! - `Deserialize` create/update DTOs

pub mod form;
pub mod organization;
pub mod response;
pub mod session;
pub mod user;
