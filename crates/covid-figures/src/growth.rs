//! Case growth per province: cumulative cases against epidemic age on a log
//! scale with doubling-time references, or against calendar time.

use crate::context::FigureContext;
use crate::menus::{dropdown, visibility_button, visibility_mask, y_scale_menu};
use crate::series::{self, Series};
use crate::style::{self, Canvas, T10};
use crate::traits::Figure;
use covid_common::Result;
use covid_data::columns::{PROVINCE, REGION, TOT_N_CASES};
use covid_data::{DatasetKey, Frame, EPIDEMIC_AGE, TIME};
use covid_i18n::FluentArgs;
use plotly::common::{DashType, Line, Marker, Mode, Title};
use plotly::layout::{Axis, AxisType, RangeSlider};
use plotly::{Plot, Scatter};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Doubling periods in days, with their message ids and colours.
pub const DOUBLING_PERIODS: [(u32, &str, &str); 3] = [
    (1, "doubling-daily", "#3C1518"),
    (3, "doubling-3days", "#A44200"),
    (7, "doubling-weekly", "#D58936"),
];

const REQUIRES: [DatasetKey; 1] = [DatasetKey::DpcProvinces];

/// Growth of cumulative cases of every province.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseGrowth {
    by_age: bool,
}

impl CaseGrowth {
    /// Cases against days since each province crossed the threshold.
    pub const fn by_epidemic_age() -> Self {
        Self { by_age: true }
    }

    /// Cases against calendar time.
    pub const fn by_date() -> Self {
        Self { by_age: false }
    }
}

/// Cases of a series doubling every `days` days from `base`, one point per
/// day from day 0 to `max_age`, cut where it reaches `ceiling`.
pub fn doubling_line(base: f64, days: u32, max_age: i32, ceiling: f64) -> (Vec<f64>, Vec<f64>) {
    let daily_factor = 2_f64.powf(1.0 / f64::from(days));
    (0..=max_age)
        .map(|day| (f64::from(day), (base * daily_factor.powi(day)).floor()))
        .filter(|&(_, cases)| cases < ceiling)
        .unzip()
}

fn dash(nth: usize) -> DashType {
    match nth % 6 {
        0 => DashType::Solid,
        1 => DashType::Dot,
        2 => DashType::Dash,
        3 => DashType::LongDash,
        4 => DashType::DashDot,
        _ => DashType::LongDashDot,
    }
}

fn province_trace<X>(
    series: Series<X>,
    region: &str,
    color: &'static str,
    nth: usize,
) -> Box<Scatter<X, Option<f64>>>
where
    X: Serialize + Clone + 'static,
{
    Scatter::new(series.x, series.y)
        .name(&series.name)
        .legend_group(region)
        .mode(Mode::Lines)
        .line(Line::new().color(color).width(1.0).dash(dash(nth)))
}

fn column_max(frame: &Frame, column: &str) -> Result<Option<f64>> {
    Ok(frame.values(column)?.iter().flatten().copied().reduce(f64::max))
}

impl Figure for CaseGrowth {
    fn name(&self) -> &'static str {
        if self.by_age {
            "fig_010001"
        } else {
            "fig_010000"
        }
    }

    fn description(&self) -> &'static str {
        if self.by_age {
            "Cumulative cases per province since the epidemic start, log scale"
        } else {
            "Cumulative cases per province over time"
        }
    }

    fn output_path(&self) -> &'static str {
        if self.by_age {
            "fig_010001.html"
        } else {
            "fig_010000.html"
        }
    }

    fn requires(&self) -> &'static [DatasetKey] {
        &REQUIRES
    }

    #[allow(clippy::cast_possible_truncation)]
    fn build(&self, ctx: &FigureContext) -> Result<Plot> {
        let labels = ctx.labels();
        let settings = ctx.settings();

        let mut data = ctx.provinces()?.filter_values(TOT_N_CASES, |cases| cases > 0.0)?;
        if self.by_age {
            data = data.filter_values(EPIDEMIC_AGE, |age| age >= 0.0)?;
        }
        let regions = data.unique_labels(REGION)?;
        let region_of_row = data.labels(REGION)?;

        let mut plot = Plot::new();
        // Region index of every trace; reference lines belong to none
        let mut trace_regions: Vec<Option<usize>> = Vec::new();
        let mut per_region: BTreeMap<usize, usize> = BTreeMap::new();

        for group in data.groups(PROVINCE)? {
            let region = group
                .rows
                .first()
                .map_or("", |&row| region_of_row[row].as_str());
            let region_index = regions.iter().position(|r| r == region).unwrap_or(0);
            let nth = per_region.entry(region_index).or_insert(0);
            let color = style::cycle(&T10, region_index);

            if self.by_age {
                let line =
                    series::by_age(&data, &group.rows, TOT_N_CASES, &group.key, |_, _| true)?;
                plot.add_trace(province_trace(line, region, color, *nth));
            } else {
                let line = series::dated(&data, &group.rows, TOT_N_CASES, &group.key)?;
                plot.add_trace(province_trace(line, region, color, *nth));
            }
            *nth += 1;
            trace_regions.push(Some(region_index));
        }

        if self.by_age {
            let ceiling = column_max(&data, TOT_N_CASES)?.unwrap_or(0.0);
            let max_age = column_max(&data, EPIDEMIC_AGE)?.unwrap_or(0.0) as i32;
            for (days, id, color) in DOUBLING_PERIODS {
                let (x, y) = doubling_line(settings.epidemic_threshold, days, max_age, ceiling);
                plot.add_trace(
                    Scatter::new(x, y)
                        .name(&labels.text(id)?)
                        .mode(Mode::LinesMarkers)
                        .line(Line::new().color(color).width(0.5).dash(DashType::Dot))
                        .marker(Marker::new().color(color).size(3)),
                );
                trace_regions.push(None);
            }
        }
        debug!(
            traces = trace_regions.len(),
            regions = regions.len(),
            by_age = self.by_age,
            "Case growth traces assembled"
        );

        let all_regions = labels.text("growth-all-regions")?;
        let all_title = labels.fill("growth-title", &[("region", all_regions.as_str())])?;
        let total = trace_regions.len();
        let mut buttons = vec![visibility_button(&all_regions, &vec![true; total], &all_title)];
        for (index, region) in regions.iter().enumerate() {
            let mask = visibility_mask(total, |t| trace_regions[t].map_or(true, |r| r == index));
            let title = labels.fill("growth-title", &[("region", region.as_str())])?;
            buttons.push(visibility_button(region, &mask, &title));
        }

        let mut menus = vec![dropdown(buttons, 0.3, 1.12)];
        let (x_axis, y_axis) = if self.by_age {
            menus.push(y_scale_menu(
                &labels.text("scale-log")?,
                &labels.text("axis-cases-log")?,
                &labels.text("scale-linear")?,
                &labels.text("axis-cases")?,
            ));
            let mut args = FluentArgs::new();
            args.set("threshold", settings.epidemic_threshold);
            let age_title = labels.message("axis-epidemic-age", Some(&args))?;
            (
                Axis::new().title(Title::with_text(&age_title)),
                Axis::new()
                    .type_(AxisType::Log)
                    .title(Title::with_text(&labels.text("axis-cases-log")?)),
            )
        } else {
            (
                Axis::new().title(Title::with_text(&labels.column(TIME))),
                Axis::new().title(Title::with_text(&labels.text("axis-cases")?)),
            )
        };

        let canvas = Canvas::new(900, 680).margins(0, 0, 100, 120);
        let layout = canvas
            .layout(&all_title)
            .show_legend(false)
            .x_axis(x_axis.range_slider(RangeSlider::new().visible(true)))
            .y_axis(y_axis)
            .update_menus(menus)
            .annotations(style::decorations(
                &labels.text("source-dpc")?,
                -0.32,
                &settings.branding,
                &canvas,
            ));
        plot.set_layout(layout);
        Ok(plot)
    }
}
