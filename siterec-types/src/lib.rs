//! Siterec Shared Types
//!
//! Types shared between the siterec core library and the CLI: platform and
//! browser identification, capture geometry, and engine run results.

pub mod logging;
pub mod types;

pub use types::*;
