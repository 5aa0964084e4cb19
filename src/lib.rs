//! # Scrim Stats
//!
//! Analytics over a competitive team's scrim sheets.
//!
//! ## Architecture
//!
//! - **models**: Typed input rows, roles, benchmarks and output tables
//! - **storage**: CSV loader producing tables plus diagnostics
//! - **filter**: Date, map, player, agent and role filters
//! - **calculate**: Aggregations and derived metrics
//! - **views**: Request parsing and one function per dashboard view
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod filter;
pub mod models;
pub mod storage;
pub mod views;

pub use models::*;
