//! # Climo Common
//!
//! Shared types, error taxonomy, and logging bootstrap for Climo Bot.
//!
//! This crate provides the foundational types used across all other crates
//! in the workspace: calendar buckets, observation series, unit systems, and
//! the single error enum every stage reports through.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::*;
pub use logging::*;
pub use types::*;
pub use utils::*;
