//! CLI command implementations.

pub mod filter;
pub mod logs;
pub mod status;
