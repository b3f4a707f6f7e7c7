//! # Palaro Common Library
//!
//! Shared code for the Palaro results services including:
//! - Store row models for the events, performance-events and roster tables
//! - Store schema definition and expected-table checks
//! - Configuration resolution
//! - Common error types

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
