//! # activity-core
//!
//! Pure logic for the campus activity sync layer (no I/O, instant tests).
//!
//! This crate implements the decisions the client makes about activity data
//! without touching the backend or disk, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects:
//! - [`filter`] - Local catalog filter (keyword, modules, department, organizer, dates)
//! - [`series`] - Assembly of detail records, children attached for series
//! - [`entry`] - Audit log line formatting and export naming
//! - [`preview`] - Bounded payload previews for audit lines
//!
//! The actual I/O (backend calls, persisted documents) is performed by
//! `activity-client`, which feeds results through these functions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod filter;
pub mod preview;
pub mod series;

pub use entry::{export_contents, export_file_name, LogEntry, ENTRY_TIME_FORMAT};
pub use filter::ActivityFilter;
pub use preview::{preview, truncate};
pub use series::DetailPlan;
