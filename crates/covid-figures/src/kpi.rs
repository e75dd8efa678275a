//! Per-capita indicators of the focus regions against the national mean.

use crate::anchored::end_label;
use crate::context::FigureContext;
use crate::series::{self, date_after, date_label};
use crate::style::{self, Canvas, REFERENCE_COLOR, T10};
use crate::traits::Figure;
use covid_common::{ReportError, Result};
use covid_data::columns::{POS_PTHAB, REGION, TEST_PTHAB};
use covid_data::{DatasetKey, TIME};
use plotly::common::{Anchor, DashType, Line, Mode, Orientation, Title};
use plotly::layout::{Axis, Legend};
use plotly::{Plot, Scatter};

/// Days of empty axis left after the last date.
pub const KPI_PADDING_DAYS: i64 = 10;

const REQUIRES: [DatasetKey; 2] = [DatasetKey::DpcRegions, DatasetKey::IstatPopulationRegions];

/// One KPI column over time for the focus regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionalKpi {
    column: &'static str,
    name: &'static str,
    output_path: &'static str,
}

impl RegionalKpi {
    /// Tests per 1000 inhabitants.
    pub const fn tests_per_thousand() -> Self {
        Self {
            column: TEST_PTHAB,
            name: "fig_c001",
            output_path: "tortuga/II/fig_c001.html",
        }
    }

    /// Active cases per 1000 inhabitants.
    pub const fn positives_per_thousand() -> Self {
        Self {
            column: POS_PTHAB,
            name: "fig_c004",
            output_path: "tortuga/II/fig_c004.html",
        }
    }
}

impl Figure for RegionalKpi {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        if self.column == TEST_PTHAB {
            "Tests per 1000 inhabitants in the focus regions and on average"
        } else {
            "Active cases per 1000 inhabitants in the focus regions and on average"
        }
    }

    fn output_path(&self) -> &'static str {
        self.output_path
    }

    fn requires(&self) -> &'static [DatasetKey] {
        &REQUIRES
    }

    fn build(&self, ctx: &FigureContext) -> Result<Plot> {
        let labels = ctx.labels();
        let settings = ctx.settings();
        let regions = ctx.regions()?;
        let (Some(first), Some(last)) = (regions.time().iter().min(), regions.last_date()) else {
            return Err(ReportError::figure("no regional rows to plot"));
        };

        let mut plot = Plot::new();
        let mut lines = series::per_group(regions, REGION, &settings.focus_regions, self.column)?;
        lines.push(series::mean_by_date(regions, self.column, &labels.text("italy-mean")?)?);
        let mean_index = lines.len() - 1;

        for (index, line) in lines.iter().enumerate() {
            let color = if index == mean_index {
                REFERENCE_COLOR
            } else {
                style::cycle(&T10, index)
            };
            let mut stroke = Line::new().color(color).width(1.0);
            if index == mean_index {
                stroke = stroke.dash(DashType::Dot);
            }
            plot.add_trace(
                Scatter::new(line.x.clone(), line.y.clone())
                    .name(&line.name)
                    .mode(Mode::Lines)
                    .line(stroke),
            );
            if let Some(label) = end_label(line, color) {
                plot.add_trace(label);
            }
        }

        let region_list = labels.list(&settings.focus_regions)?;
        let label = labels.column(self.column);
        let title = labels.fill(
            "kpi-title",
            &[("label", label.as_str()), ("regions", region_list.as_str())],
        )?;

        let canvas = Canvas::new(600, 450).margins(60, 30, 100, 100);
        let layout = canvas
            .layout(&style::bold(&title))
            .x_axis(
                Axis::new()
                    .title(Title::with_text(&labels.column(TIME)))
                    .range(vec![date_label(*first), date_after(last, KPI_PADDING_DAYS)]),
            )
            .y_axis(Axis::new().title(Title::with_text(&label)))
            .legend(
                Legend::new()
                    .orientation(Orientation::Horizontal)
                    .x(0.5)
                    .x_anchor(Anchor::Center)
                    .y(-0.15),
            )
            .annotations(style::decorations(
                &labels.text("source-istat-dpc")?,
                -0.3,
                &settings.branding,
                &canvas,
            ));
        plot.set_layout(layout);
        Ok(plot)
    }
}
