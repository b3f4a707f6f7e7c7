//! HTTP API handlers for palaro-rt

pub mod buildinfo;
pub mod health;
pub mod medals;
pub mod params;
pub mod tabulation;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use medals::{get_level_medal_tables, get_medal_table};
pub use tabulation::get_tabulation;
