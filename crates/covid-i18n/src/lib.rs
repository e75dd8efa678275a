//! # Covid I18n
//!
//! Localized labels for the covid-report figures, backed by the Fluent
//! localization system.
//!
//! The Italian and English resources are embedded at compile time, so a
//! [`Labels`] catalogue can be built for any [`covid_common::Language`]
//! without touching the filesystem.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bundle;
pub mod labels;

pub use bundle::*;
pub use labels::*;

pub use fluent_bundle::{FluentArgs, FluentValue};
