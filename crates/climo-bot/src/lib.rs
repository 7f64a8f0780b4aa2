//! # Climo Bot
//!
//! One-shot daily briefing: today's high against its multi-year baseline,
//! with an optional trend chart, posted to Discord.
//!
//! This is the main binary crate that wires configuration, the analysis
//! stages, and the publisher into a single sequential run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod error;
pub mod pipeline;
pub mod publisher;

pub use app::*;
pub use error::*;
pub use pipeline::*;
pub use publisher::*;
