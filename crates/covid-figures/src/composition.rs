//! Composition of active cases per focus region, as stacked areas.

use crate::context::FigureContext;
use crate::series::{self, Series};
use crate::style::{self, Canvas};
use crate::traits::Figure;
use covid_common::Result;
use covid_data::columns::{N_HOME_QUARANTINE, N_HOSPITALIZED, N_INTENSIVE_CARE, REGION};
use covid_data::DatasetKey;
use plotly::common::{Anchor, Line, Mode, Orientation, Title};
use plotly::layout::{Axis, GridPattern, Layout, LayoutGrid, Legend};
use plotly::{Plot, Scatter};
use tracing::warn;

/// Stacked components of the active cases and their colours.
pub const COMPONENTS: [(&str, &str); 3] = [
    (N_HOME_QUARANTINE, "#EF553B"),
    (N_HOSPITALIZED, "#FF7F0E"),
    (N_INTENSIVE_CARE, "#54A24B"),
];

/// Facets a figure can hold.
pub const MAX_FACETS: usize = 4;

const REQUIRES: [DatasetKey; 1] = [DatasetKey::DpcRegions];

/// Active cases split into home isolation, hospital and intensive care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveComposition {
    normalized: bool,
}

impl ActiveComposition {
    /// Absolute counts.
    pub const fn counts() -> Self {
        Self { normalized: false }
    }

    /// Shares of the total.
    pub const fn shares() -> Self {
        Self { normalized: true }
    }
}

/// Each component divided by the row total. Rows with an undefined
/// component or a zero total are undefined.
pub fn row_shares(components: &[Vec<Option<f64>>]) -> Vec<Vec<Option<f64>>> {
    let rows = components.first().map_or(0, Vec::len);
    let totals: Vec<Option<f64>> = (0..rows)
        .map(|row| {
            components
                .iter()
                .map(|column| column.get(row).copied().flatten())
                .sum::<Option<f64>>()
                .filter(|&total| total != 0.0)
        })
        .collect();

    components
        .iter()
        .map(|column| {
            column
                .iter()
                .zip(&totals)
                .map(|(value, total)| value.zip(*total).map(|(v, t)| v / t))
                .collect()
        })
        .collect()
}

/// Focus regions that get a facet, at most [`MAX_FACETS`].
pub(crate) fn facet_regions(focus: &[String], figure: &str) -> Vec<String> {
    let mut facets = focus.to_vec();
    if facets.len() > MAX_FACETS {
        warn!(
            figure,
            regions = facets.len(),
            max = MAX_FACETS,
            "Too many focus regions for a faceted figure, extra facets dropped"
        );
        facets.truncate(MAX_FACETS);
    }
    facets
}

pub(crate) fn with_facet_axes(layout: Layout, facet: usize, x: Axis, y: Axis) -> Layout {
    match facet {
        0 => layout.x_axis(x).y_axis(y),
        1 => layout.x_axis2(x).y_axis2(y),
        2 => layout.x_axis3(x).y_axis3(y),
        _ => layout.x_axis4(x).y_axis4(y),
    }
}

pub(crate) fn axis_id(prefix: &str, facet: usize) -> String {
    if facet == 0 {
        prefix.to_string()
    } else {
        format!("{prefix}{}", facet + 1)
    }
}

impl Figure for ActiveComposition {
    fn name(&self) -> &'static str {
        if self.normalized {
            "fig_c002_norm"
        } else {
            "fig_c002"
        }
    }

    fn description(&self) -> &'static str {
        if self.normalized {
            "Composition of active cases in the focus regions, as shares"
        } else {
            "Composition of active cases in the focus regions"
        }
    }

    fn output_path(&self) -> &'static str {
        if self.normalized {
            "tortuga/II/fig_c002_norm.html"
        } else {
            "tortuga/II/fig_c002.html"
        }
    }

    fn requires(&self) -> &'static [DatasetKey] {
        &REQUIRES
    }

    fn build(&self, ctx: &FigureContext) -> Result<Plot> {
        let labels = ctx.labels();
        let settings = ctx.settings();
        let regions = ctx.regions()?;

        let facets = facet_regions(&settings.focus_regions, self.name());

        let mut plot = Plot::new();
        let mut drawn: Vec<String> = Vec::new();
        for region in &facets {
            let Some(rows) = series::group_rows(regions, REGION, region)? else {
                warn!(region = %region, "Focus region not found, facet skipped");
                continue;
            };
            let facet = drawn.len();
            let parts: Vec<Series> = COMPONENTS
                .iter()
                .map(|(column, _)| series::dated(regions, &rows, column, &labels.column(column)))
                .collect::<Result<_>>()?;
            let values: Vec<Vec<Option<f64>>> = if self.normalized {
                row_shares(&parts.iter().map(|p| p.y.clone()).collect::<Vec<_>>())
            } else {
                parts.iter().map(|p| p.y.clone()).collect()
            };

            for ((part, y), (column, color)) in parts.iter().zip(values).zip(COMPONENTS) {
                plot.add_trace(
                    Scatter::new(part.x.clone(), y)
                        .name(&part.name)
                        .legend_group(column)
                        .show_legend(facet == 0)
                        .mode(Mode::Lines)
                        .stack_group(&format!("facet{facet}"))
                        .line(Line::new().color(color).width(0.5))
                        .x_axis(&axis_id("x", facet))
                        .y_axis(&axis_id("y", facet)),
                );
            }
            drawn.push(region.clone());
        }

        let value_name = if self.normalized {
            labels.text("composition-value-share")?
        } else {
            labels.text("composition-value")?
        };
        let title = style::titled(
            &labels.fill("composition-title", &[("regions", labels.list(&drawn)?.as_str())])?,
            &labels.fill("composition-subtitle", &[("value", value_name.as_str())])?,
            11,
        );

        let canvas = Canvas::new(650, 450).margins(60, 30, 130, 100);
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
                    .y(-0.2),
            )
            .annotations(style::decorations(
                &labels.text("source-dpc")?,
                -0.35,
                &settings.branding,
                &canvas,
            ));
        for (facet, region) in drawn.iter().enumerate() {
            let mut y = Axis::new();
            if facet == 0 {
                y = y.title(Title::with_text(&value_name));
            }
            if self.normalized {
                y = y.tick_format(".1%");
            }
            layout = with_facet_axes(
                layout,
                facet,
                Axis::new().title(Title::with_text(region)),
                y,
            );
        }
        plot.set_layout(layout);
        Ok(plot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_shares() {
        let shares = row_shares(&[
            vec![Some(1.0), Some(0.0), Some(2.0)],
            vec![Some(3.0), Some(0.0), None],
        ]);
        assert_eq!(shares[0], vec![Some(0.25), None, None]);
        assert_eq!(shares[1], vec![Some(0.75), None, None]);
    }

    #[test]
    fn test_axis_ids() {
        assert_eq!(axis_id("x", 0), "x");
        assert_eq!(axis_id("y", 1), "y2");
    }
}
