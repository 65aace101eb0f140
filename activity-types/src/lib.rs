//! # activity-types
//!
//! Data model for the campus activity sync layer.
//!
//! This crate provides the types shared by every other crate in the workspace:
//! - [`Activity`], [`ActivityDisplay`] - Activity records as reported by the backend
//! - [`Status`], [`ModuleTag`] - Fixed code tables
//! - [`UserInfo`], [`LoginState`] - Session view
//! - [`ApplyOutcome`] - Result of a registration attempt
//! - [`TypesError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod activity;
mod de;
mod error;
mod outcome;
mod time;
mod user;

pub use activity::{Activity, ActivityDisplay, ModuleTag, Status, SERIES_CATEGORY};
pub use error::TypesError;
pub use outcome::ApplyOutcome;
pub use time::{parse_bound, parse_timestamp, TIMESTAMP_FORMAT};
pub use user::{LoginState, UserInfo};
