//! # Covid Report
//!
//! Command line front end: renders report pages from their configs,
//! generates the figures, and serves the site.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;

pub use app::*;
pub use cli::*;
