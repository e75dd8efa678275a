//! Intensive care saturation by region on the latest date.

use crate::context::FigureContext;
use crate::series::date_label;
use crate::style::{self, Canvas, FOCUS_COLORS};
use crate::traits::Figure;
use covid_common::{ReportError, Result};
use covid_data::columns::{ICU_SATURATION, REGION};
use covid_data::DatasetKey;
use plotly::common::{Marker, Title};
use plotly::layout::Axis;
use plotly::{Bar, Plot};
use std::cmp::Ordering;

/// Upper bound of the saturation axis.
pub const SATURATION_AXIS_MAX: f64 = 1.4;

const REQUIRES: [DatasetKey; 2] = [DatasetKey::DpcRegions, DatasetKey::SalutegovIcuBeds];

/// Share of intensive care beds taken by COVID-19 patients per region.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcuSaturation;

impl Figure for IcuSaturation {
    fn name(&self) -> &'static str {
        "fig_010004"
    }

    fn description(&self) -> &'static str {
        "Intensive care saturation by region on the latest date"
    }

    fn output_path(&self) -> &'static str {
        "fig_010004.html"
    }

    fn requires(&self) -> &'static [DatasetKey] {
        &REQUIRES
    }

    fn build(&self, ctx: &FigureContext) -> Result<Plot> {
        let labels = ctx.labels();
        let regions = ctx.regions()?;
        let latest = regions
            .last_date()
            .ok_or_else(|| ReportError::figure("no regional rows to take a snapshot of"))?;

        let snapshot = regions.filter(|row| regions.time()[row] == latest);
        let mut bars: Vec<(String, Option<f64>)> = snapshot
            .labels(REGION)?
            .iter()
            .cloned()
            .zip(snapshot.values(ICU_SATURATION)?.iter().copied())
            .collect();
        // Highest saturation first, regions without capacity last
        bars.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        let colors: Vec<&'static str> = bars
            .iter()
            .map(|(_, share)| {
                if share.is_some_and(|s| s >= 1.0) {
                    FOCUS_COLORS[0]
                } else {
                    FOCUS_COLORS[1]
                }
            })
            .collect();
        let (names, shares): (Vec<String>, Vec<Option<f64>>) = bars.into_iter().unzip();

        let mut plot = Plot::new();
        plot.add_trace(
            Bar::new(names, shares)
                .name(&labels.column(ICU_SATURATION))
                .marker(Marker::new().color_array(colors)),
        );

        let date = date_label(latest);
        let canvas = Canvas::new(800, 500).margins(60, 30, 100, 120);
        let layout = canvas
            .layout(&style::bold(&labels.fill("saturation-title", &[("date", date.as_str())])?))
            .show_legend(false)
            .y_axis(
                Axis::new()
                    .title(Title::with_text(&labels.column(ICU_SATURATION)))
                    .tick_format("%")
                    .range(vec![0.0, SATURATION_AXIS_MAX]),
            )
            .annotations(style::decorations(
                &labels.text("source-salute-dpc")?,
                -0.4,
                &ctx.settings().branding,
                &canvas,
            ));
        plot.set_layout(layout);
        Ok(plot)
    }
}
