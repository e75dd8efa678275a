//! # Covid Data
//!
//! Dataset retrieval and derived time-series transforms for the Italian
//! COVID-19 reports.
//!
//! Datasets are fetched by name through a [`DatasetSource`], parsed into a
//! columnar [`Frame`], then reshaped by the transforms in [`transform`] and
//! [`derive`]: decumulation, epidemic-age alignment, anchored ratios and
//! ratio KPIs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod columns;
pub mod derive;
pub mod frame;
pub mod loader;
pub mod parse;
pub mod prep;
pub mod record;
pub mod source;
pub mod transform;

pub use derive::*;
pub use frame::*;
pub use loader::*;
pub use parse::*;
pub use prep::*;
pub use record::*;
pub use source::*;
pub use transform::*;
