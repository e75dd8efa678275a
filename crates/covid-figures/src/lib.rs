//! # Covid Figures
//!
//! Interactive figures on the Italian COVID-19 datasets, assembled with
//! plotly and exported as standalone HTML files.
//!
//! Every figure implements [`Figure`]: it names the datasets it needs and
//! builds a [`plotly::Plot`] from a prepared [`FigureContext`]. The
//! [`FigureManager`] loads the required datasets once, builds the selected
//! figures and writes them below the configured output directory.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod catalogue;
pub mod context;
pub mod export;
pub mod manager;
pub mod menus;
pub mod series;
pub mod style;
pub mod traits;

// Figure implementations
pub mod anchored;
pub mod composition;
pub mod growth;
pub mod kpi;
pub mod national;
pub mod saturation;
pub mod testing;

pub use catalogue::*;
pub use context::*;
pub use export::*;
pub use manager::*;
pub use traits::*;
