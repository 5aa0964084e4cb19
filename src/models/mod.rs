//! Core data models: typed input rows, roles and benchmarks, aggregated
//! output tables.

mod outcome;
mod records;
mod report;
mod role;
mod stats;

pub use outcome::*;
pub use records::*;
pub use report::*;
pub use role::*;
pub use stats::*;
