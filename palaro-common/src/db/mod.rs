//! Results store models and schema

pub mod models;
pub mod schema;

pub use models::*;
pub use schema::{create_schema, missing_tables, EXPECTED_TABLES};
