//! # Climo I18n
//!
//! Localized wording for the daily briefing and chart labels, using the
//! Fluent localization system with resources embedded at compile time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod messages;

pub use fluent_bundle::{FluentArgs, FluentValue};
pub use loader::*;
pub use messages::*;
