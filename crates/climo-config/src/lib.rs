//! # Climo Config
//!
//! Type-safe configuration management for Climo Bot.
//!
//! One explicit [`Config`] is built at startup from an optional YAML file and
//! environment overrides, validated, and then passed by reference to the
//! fetcher, pipeline, and publisher. Nothing here is global.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
