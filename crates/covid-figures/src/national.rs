//! National daily trend: stacked daily counts with the tests performed.

use crate::context::FigureContext;
use crate::series;
use crate::style::{self, Canvas, REFERENCE_COLOR};
use crate::traits::Figure;
use covid_common::Result;
use covid_data::columns::{BEING_TESTED, NEW_DECEASED, NEW_DISCHARGED, NUOVI_POSITIVI};
use covid_data::{DatasetKey, TIME};
use plotly::common::{Anchor, Line, Marker, Mode, Orientation, Title};
use plotly::layout::{Axis, BarMode, Legend};
use plotly::{Bar, Plot, Scatter};

/// Stacked daily columns and their colours.
pub const DAILY_BARS: [(&str, &str); 3] = [
    (NUOVI_POSITIVI, "#FF8A5B"),
    (NEW_DECEASED, "#EA526F"),
    (NEW_DISCHARGED, "#25CED1"),
];

/// Tests are drawn scaled down by this factor to share the case axis.
pub const TESTS_SCALE: f64 = 100.0;

const REQUIRES: [DatasetKey; 1] = [DatasetKey::DpcRegions];

/// New cases, deaths and discharges per day over Italy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NationalTrend;

impl Figure for NationalTrend {
    fn name(&self) -> &'static str {
        "fig_010002"
    }

    fn description(&self) -> &'static str {
        "National daily new cases, deaths and discharges with tests performed"
    }

    fn output_path(&self) -> &'static str {
        "fig_010002.html"
    }

    fn requires(&self) -> &'static [DatasetKey] {
        &REQUIRES
    }

    fn build(&self, ctx: &FigureContext) -> Result<Plot> {
        let labels = ctx.labels();
        let italy = ctx.italy()?;
        let mut plot = Plot::new();

        for (column, color) in DAILY_BARS {
            let bars = series::whole(italy, column, &labels.column(column))?;
            plot.add_trace(
                Bar::new(bars.x, bars.y)
                    .name(&bars.name)
                    .marker(Marker::new().color(color))
                    .opacity(0.75),
            );
        }

        let tests = series::whole(italy, BEING_TESTED, &labels.column(BEING_TESTED))?
            .map_values(|tests| tests / TESTS_SCALE);
        plot.add_trace(
            Scatter::new(tests.x, tests.y)
                .name(&tests.name)
                .mode(Mode::Lines)
                .line(Line::new().color(REFERENCE_COLOR).width(1.5)),
        );

        let canvas = Canvas::new(750, 500).margins(60, 30, 100, 100);
        let layout = canvas
            .layout(&style::bold(&labels.text("national-title")?))
            .bar_mode(BarMode::Stack)
            .x_axis(Axis::new().title(Title::with_text(&labels.column(TIME))))
            .y_axis(Axis::new().title(Title::with_text(&labels.text("national-y-axis")?)))
            .legend(
                Legend::new()
                    .orientation(Orientation::Horizontal)
                    .x(0.5)
                    .x_anchor(Anchor::Center)
                    .y(-0.2),
            )
            .annotations(style::decorations(
                &labels.text("source-dpc")?,
                -0.35,
                &ctx.settings().branding,
                &canvas,
            ));
        plot.set_layout(layout);
        Ok(plot)
    }
}
