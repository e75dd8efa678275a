//! Anchored ratios of the focus regions: each series divided by its value
//! on the anchor date.

use crate::context::FigureContext;
use crate::series::{self, date_after, date_label, Series};
use crate::style::{self, Canvas, FOCUS_COLORS};
use crate::traits::Figure;
use covid_common::{ReportError, Result};
use covid_data::columns::{N_INTENSIVE_CARE, N_TESTED, REGION, TOT_N_HOSPITALIZED};
use covid_data::{anchored_name, DatasetKey, TIME};
use plotly::common::{HoverInfo, Line, LineShape, Marker, Mode, Position, Title};
use plotly::layout::Axis;
use plotly::{Plot, Scatter};

/// Days of empty axis left after the last date for the end labels.
pub const END_LABEL_DAYS: i64 = 7;

const REQUIRES: [DatasetKey; 1] = [DatasetKey::DpcRegions];

/// Anchored ratio of one column for the focus regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchoredRatio {
    column: &'static str,
    name: &'static str,
}

impl AnchoredRatio {
    /// Hospitalized patients.
    pub const fn hospitalized() -> Self {
        Self {
            column: TOT_N_HOSPITALIZED,
            name: "fig_b001",
        }
    }

    /// Intensive care patients.
    pub const fn intensive_care() -> Self {
        Self {
            column: N_INTENSIVE_CARE,
            name: "fig_b002",
        }
    }

    /// Tests.
    pub const fn tested() -> Self {
        Self {
            column: N_TESTED,
            name: "fig_b003",
        }
    }

    /// Source column.
    pub const fn column(&self) -> &'static str {
        self.column
    }
}

/// Label of the last defined point of `series`, drawn right of it.
pub fn end_label(series: &Series, color: &'static str) -> Option<Box<Scatter<String, f64>>> {
    let (index, value) = series.last_point()?;
    Some(
        Scatter::new(vec![series.x[index].clone()], vec![value])
            .mode(Mode::MarkersText)
            .text_array(vec![series.name.clone()])
            .text_position(Position::MiddleRight)
            .marker(Marker::new().color(color).size(6))
            .hover_info(HoverInfo::Skip)
            .show_legend(false),
    )
}

impl Figure for AnchoredRatio {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        match self.name {
            "fig_b001" => "Hospitalized patients relative to the anchor date",
            "fig_b002" => "Intensive care patients relative to the anchor date",
            _ => "Tests relative to the anchor date",
        }
    }

    fn output_path(&self) -> &'static str {
        match self.name {
            "fig_b001" => "tortuga/II/fig_b001.html",
            "fig_b002" => "tortuga/II/fig_b002.html",
            _ => "tortuga/II/fig_b003.html",
        }
    }

    fn requires(&self) -> &'static [DatasetKey] {
        &REQUIRES
    }

    fn build(&self, ctx: &FigureContext) -> Result<Plot> {
        let labels = ctx.labels();
        let settings = ctx.settings();
        let regions = ctx.regions()?;
        let anchored = anchored_name(self.column);
        if !regions.has_values(&anchored) {
            return Err(ReportError::figure(format!(
                "no region could be anchored for '{}' on {}",
                self.column, settings.anchor_date
            )));
        }

        let mut plot = Plot::new();
        let lines = series::per_group(regions, REGION, &settings.focus_regions, &anchored)?;
        for (index, line) in lines.iter().enumerate() {
            let color = style::cycle(&FOCUS_COLORS, index);
            plot.add_trace(
                Scatter::new(line.x.clone(), line.y.clone())
                    .name(&line.name)
                    .mode(Mode::Lines)
                    .line(Line::new().color(color).width(1.0).shape(LineShape::Spline)),
            );
            if let Some(label) = end_label(line, color) {
                plot.add_trace(label);
            }
        }

        let anchor = settings.anchor_date.format("%-d %b").to_string();
        let region_list = labels.list(&settings.focus_regions)?;
        let title = style::titled(
            &labels.text(&format!("anchored-title-{}", self.column))?,
            &labels.fill(
                "anchored-subtitle",
                &[("regions", region_list.as_str()), ("anchor", anchor.as_str())],
            )?,
            11,
        );
        let y_title = labels.fill(
            "anchored-axis",
            &[("label", labels.column(self.column).as_str()), ("anchor", anchor.as_str())],
        )?;

        let last = regions.last_date().unwrap_or(settings.anchor_date);
        let canvas = Canvas::new(600, 400).margins(40, 20, 80, 40);
        let layout = canvas
            .layout(&title)
            .show_legend(false)
            .x_axis(
                Axis::new()
                    .title(Title::with_text(&labels.column(TIME)))
                    .range(vec![
                        date_label(settings.anchor_date),
                        date_after(last, END_LABEL_DAYS),
                    ]),
            )
            .y_axis(Axis::new().title(Title::with_text(&y_title)))
            .annotations(style::decorations(
                &labels.text("source-dpc")?,
                -0.14,
                &settings.branding,
                &canvas,
            ));
        plot.set_layout(layout);
        Ok(plot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_label_uses_last_defined_point() {
        let series = Series {
            name: "Veneto".to_string(),
            x: vec!["2020-02-25".to_string(), "2020-02-26".to_string(), "2020-02-27".to_string()],
            y: vec![Some(1.0), Some(1.5), None],
        };
        let label = end_label(&series, "steelblue").unwrap();
        let json = serde_json::to_value(&label).unwrap();

        assert_eq!(json["x"], serde_json::json!(["2020-02-26"]));
        assert_eq!(json["y"], serde_json::json!([1.5]));
        assert_eq!(json["text"], serde_json::json!(["Veneto"]));
        assert_eq!(json["hoverinfo"], "skip");
    }

    #[test]
    fn test_no_label_for_empty_series() {
        let series = Series {
            name: "Molise".to_string(),
            x: vec!["2020-02-25".to_string()],
            y: vec![None],
        };
        assert!(end_label(&series, "steelblue").is_none());
    }
}
