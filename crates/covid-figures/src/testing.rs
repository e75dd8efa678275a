//! Testing effort of the focus regions.

use crate::anchored::end_label;
use crate::composition::{axis_id, facet_regions, with_facet_axes};
use crate::context::FigureContext;
use crate::series;
use crate::style::{self, Canvas, FOCUS_COLORS, FOCUS_TEXT_COLORS, T10};
use crate::traits::Figure;
use covid_common::Result;
use covid_data::columns::{
    BEING_TESTED, NEW_DECEASED, NEW_DISCHARGED, NUOVI_POSITIVI, N_HOSPITALIZED, N_INTENSIVE_CARE,
    REGION, TESTS_PER_MANAGED_CASE,
};
use covid_data::{DatasetKey, TIME};
use covid_i18n::FluentArgs;
use plotly::common::{
    Anchor, AxisSide, DashType, HoverInfo, Line, LineShape, Marker, Mode, Orientation, Title,
};
use plotly::layout::{Axis, GridPattern, LayoutGrid, Legend};
use plotly::{Bar, Plot, Scatter};
use tracing::warn;

/// Upper bound of the tests per managed case axis.
pub const TESTS_PER_CASE_AXIS_MAX: f64 = 80.0;

const REQUIRES: [DatasetKey; 1] = [DatasetKey::DpcRegions];

/// Hospital load stacked per focus region, under the daily tests.
pub const HOSPITAL_LOAD: [&str; 4] = [N_HOSPITALIZED, N_INTENSIVE_CARE, NEW_DECEASED, NEW_DISCHARGED];

/// Colour of the daily tests bars.
pub const TESTS_BAR_COLOR: &str = "steelblue";

/// Daily tests against the hospital load, one facet per focus region.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestsVsHospitals;

impl Figure for TestsVsHospitals {
    fn name(&self) -> &'static str {
        "fig_e001"
    }

    fn description(&self) -> &'static str {
        "Daily tests against the hospital load in the focus regions"
    }

    fn output_path(&self) -> &'static str {
        "tortuga/IV/fig_e001.html"
    }

    fn requires(&self) -> &'static [DatasetKey] {
        &REQUIRES
    }

    fn build(&self, ctx: &FigureContext) -> Result<Plot> {
        let labels = ctx.labels();
        let settings = ctx.settings();
        let regions = ctx.regions()?;
        let tests_label = labels.column(BEING_TESTED);

        let mut plot = Plot::new();
        let mut drawn: Vec<String> = Vec::new();
        for region in facet_regions(&settings.focus_regions, self.name()) {
            let Some(rows) = series::group_rows(regions, REGION, &region)? else {
                warn!(region = %region, "Focus region not found, facet skipped");
                continue;
            };
            let facet = drawn.len();
            let (x_axis, y_axis) = (axis_id("x", facet), axis_id("y", facet));

            for (index, column) in HOSPITAL_LOAD.iter().enumerate() {
                let area = series::dated(regions, &rows, column, &labels.column(column))?;
                plot.add_trace(
                    Scatter::new(area.x, area.y)
                        .name(&area.name)
                        .legend_group(column)
                        .show_legend(facet == 0)
                        .mode(Mode::Lines)
                        .stack_group(&format!("facet{facet}"))
                        .line(Line::new().color(style::cycle(&T10, index)).width(0.5))
                        .x_axis(&x_axis)
                        .y_axis(&y_axis),
                );
            }

            let tests = series::dated(regions, &rows, BEING_TESTED, &tests_label)?;
            plot.add_trace(
                Bar::new(tests.x, tests.y)
                    .name(&tests.name)
                    .legend_group(BEING_TESTED)
                    .show_legend(facet == 0)
                    .opacity(0.5)
                    .hover_info(HoverInfo::Skip)
                    .marker(Marker::new().color(TESTS_BAR_COLOR))
                    .x_axis(&x_axis)
                    .y_axis(&y_axis),
            );
            drawn.push(region);
        }

        let title = style::titled(
            &labels.text("tests-vs-hospitals-title")?,
            &labels.fill(
                "tests-vs-hospitals-subtitle",
                &[("regions", labels.list(&drawn)?.as_str())],
            )?,
            12,
        );

        let canvas = Canvas::new(820, 450).margins(60, 30, 100, 100);
        let mut layout = canvas
            .layout(&title)
            .grid(
                LayoutGrid::new()
                    .rows(1)
                    .columns(drawn.len().max(1))
                    .pattern(GridPattern::Independent),
            )
            .legend(
                Legend::new()
                    .orientation(Orientation::Horizontal)
                    .x(0.5)
                    .x_anchor(Anchor::Center)
                    .y(-0.13),
            )
            .annotations(style::decorations(
                &labels.text("source-dpc")?,
                -0.28,
                &settings.branding,
                &canvas,
            ));
        for (facet, region) in drawn.iter().enumerate() {
            layout = with_facet_axes(
                layout,
                facet,
                Axis::new().title(Title::with_text(region)),
                Axis::new().tick_format("d"),
            );
        }
        plot.set_layout(layout);
        Ok(plot)
    }
}

/// Daily tests against daily new positives, on two axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestsVsCases;

impl Figure for TestsVsCases {
    fn name(&self) -> &'static str {
        "fig_e002"
    }

    fn description(&self) -> &'static str {
        "Daily tests against daily new positives in the focus regions"
    }

    fn output_path(&self) -> &'static str {
        "tortuga/IV/fig_e002.html"
    }

    fn requires(&self) -> &'static [DatasetKey] {
        &REQUIRES
    }

    fn build(&self, ctx: &FigureContext) -> Result<Plot> {
        let labels = ctx.labels();
        let settings = ctx.settings();
        let regions = ctx.regions()?;
        let tests_label = labels.text("axis-tests")?;
        let positives_label = labels.text("axis-new-positives")?;

        let mut plot = Plot::new();
        let tests = series::per_group(regions, REGION, &settings.focus_regions, BEING_TESTED)?;
        let positives =
            series::per_group(regions, REGION, &settings.focus_regions, NUOVI_POSITIVI)?;
        for (index, (tested, positive)) in tests.iter().zip(&positives).enumerate() {
            plot.add_trace(
                Scatter::new(tested.x.clone(), tested.y.clone())
                    .name(&format!("{} - {tests_label}", tested.name))
                    .legend_group(&tested.name)
                    .mode(Mode::Lines)
                    .line(
                        Line::new()
                            .color(style::cycle(&FOCUS_COLORS, index))
                            .width(1.5)
                            .shape(LineShape::Spline),
                    ),
            );
            plot.add_trace(
                Scatter::new(positive.x.clone(), positive.y.clone())
                    .name(&format!("{} - {positives_label}", positive.name))
                    .legend_group(&positive.name)
                    .mode(Mode::Lines)
                    .opacity(0.75)
                    .y_axis("y2")
                    .line(
                        Line::new()
                            .color(style::cycle(&FOCUS_TEXT_COLORS, index))
                            .width(1.0)
                            .dash(DashType::Dot)
                            .shape(LineShape::Spline),
                    ),
            );
            if let Some(label) = end_label(tested, style::cycle(&FOCUS_COLORS, index)) {
                plot.add_trace(label);
            }
        }

        let region_list = labels.list(&settings.focus_regions)?;
        let title = style::titled(
            &labels.text("tests-vs-cases-title")?,
            &labels.fill("tests-vs-cases-subtitle", &[("regions", region_list.as_str())])?,
            11,
        );

        let canvas = Canvas::new(600, 450).margins(60, 60, 100, 100);
        let layout = canvas
            .layout(&title)
            .x_axis(Axis::new().title(Title::with_text(&labels.column(TIME))))
            .y_axis(Axis::new().title(Title::with_text(&tests_label)))
            .y_axis2(
                Axis::new()
                    .title(Title::with_text(&positives_label))
                    .overlaying("y")
                    .side(AxisSide::Right),
            )
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
                &settings.branding,
                &canvas,
            ));
        plot.set_layout(layout);
        Ok(plot)
    }
}

/// Tests per managed case over the epidemic age of the focus regions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestsPerCase;

impl Figure for TestsPerCase {
    fn name(&self) -> &'static str {
        "fig_e003"
    }

    fn description(&self) -> &'static str {
        "Tests per managed case since the start of the epidemic in the focus regions"
    }

    fn output_path(&self) -> &'static str {
        "tortuga/IV/fig_e003.html"
    }

    fn requires(&self) -> &'static [DatasetKey] {
        &REQUIRES
    }

    fn build(&self, ctx: &FigureContext) -> Result<Plot> {
        let labels = ctx.labels();
        let settings = ctx.settings();
        let regions = ctx.regions()?;

        let mut plot = Plot::new();
        let mut index = 0;
        for region in &settings.focus_regions {
            let Some(rows) = series::group_rows(regions, REGION, region)? else {
                warn!(region = %region, "Focus region not found, trace skipped");
                continue;
            };
            let line = series::by_age(regions, &rows, TESTS_PER_MANAGED_CASE, region, |age, _| {
                age >= 0.0
            })?;
            if line.x.is_empty() {
                warn!(region = %region, "Region never reached the epidemic threshold, trace skipped");
                continue;
            }
            let color = style::cycle(&FOCUS_COLORS, index);
            plot.add_trace(
                Scatter::new(line.x.clone(), line.y.clone())
                    .name(&line.name)
                    .mode(Mode::Lines)
                    .line(Line::new().color(color).width(1.5).shape(LineShape::Spline)),
            );
            if let Some((last, value)) = line.last_point() {
                plot.add_trace(
                    Scatter::new(vec![line.x[last]], vec![value])
                        .mode(Mode::Markers)
                        .show_legend(false)
                        .marker(Marker::new().color(color).size(6)),
                );
            }
            index += 1;
        }

        let mut args = FluentArgs::new();
        args.set("threshold", settings.epidemic_threshold);
        let canvas = Canvas::new(800, 450).margins(60, 30, 100, 100);
        let layout = canvas
            .layout(&style::titled(
                &labels.text("tests-per-case-title")?,
                &labels.text("tests-per-case-subtitle")?,
                11,
            ))
            .x_axis(
                Axis::new()
                    .title(Title::with_text(&labels.message("axis-epidemic-age", Some(&args))?)),
            )
            .y_axis(
                Axis::new()
                    .title(Title::with_text(&labels.column(TESTS_PER_MANAGED_CASE)))
                    .range(vec![0.0, TESTS_PER_CASE_AXIS_MAX]),
            )
            .annotations(style::decorations(
                &labels.text("source-dpc")?,
                -0.25,
                &settings.branding,
                &canvas,
            ));
        plot.set_layout(layout);
        Ok(plot)
    }
}
