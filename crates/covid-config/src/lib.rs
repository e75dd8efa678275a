//! # Covid Config
//!
//! Type-safe site configuration for covid-report.
//!
//! This crate provides the configuration schema, defaults, YAML loading with
//! environment overrides, and validation. The loaded `SiteConfig` is passed
//! explicitly to every component that needs paths or settings.

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
