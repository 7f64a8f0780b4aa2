//! # Climo Graphs
//!
//! The analysis core of Climo Bot: fetching daily observations, the
//! day-of-year baseline, today's comparison against it, the spline trend for
//! today's calendar day, the trend chart, and the composed briefing text.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod aggregator;
pub mod comparison;
pub mod data_fetcher;
pub mod renderer;
pub mod summary;
pub mod traits;
pub mod trend;
pub mod utils;

pub use aggregator::*;
pub use comparison::*;
pub use data_fetcher::*;
pub use renderer::*;
pub use summary::*;
pub use traits::*;
pub use trend::*;
