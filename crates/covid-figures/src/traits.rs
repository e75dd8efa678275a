//! Figure trait definitions for polymorphic figure types.

use crate::context::FigureContext;
use covid_common::Result;
use covid_data::DatasetKey;
use plotly::Plot;

/// A figure that can be built from the prepared datasets.
pub trait Figure: Send + Sync {
    /// Stable identifier, also used to enable or select the figure.
    fn name(&self) -> &'static str;

    /// One-line description, for listings and logs.
    fn description(&self) -> &'static str;

    /// Output file, relative to the figures directory.
    fn output_path(&self) -> &'static str;

    /// Datasets the figure reads.
    fn requires(&self) -> &'static [DatasetKey];

    /// Assemble the chart.
    fn build(&self, ctx: &FigureContext) -> Result<Plot>;
}
