//! Shared look of the figures: palettes, canvas, watermark and notes.

use covid_config::BrandingConfig;
use plotly::common::{Anchor, Font, Title};
use plotly::layout::{Annotation, Margin};
use plotly::Layout;

/// Tableau 10 palette.
pub const T10: [&str; 10] = [
    "#4C78A8", "#F58518", "#E45756", "#72B7B2", "#54A24B", "#EECA3B", "#B279A2", "#FF9DA6",
    "#9D755D", "#BAB0AC",
];

/// Colours of the focus regions, in order.
pub const FOCUS_COLORS: [&str; 2] = ["firebrick", "steelblue"];

/// Text colours matching [`FOCUS_COLORS`].
pub const FOCUS_TEXT_COLORS: [&str; 2] = ["#843433", "#144458"];

/// Colour of the national reference line.
pub const REFERENCE_COLOR: &str = "firebrick";

/// Colour of source notes.
pub const NOTE_COLOR: &str = "grey";

/// `palette[index]`, cycling past the end.
pub fn cycle(palette: &[&'static str], index: usize) -> &'static str {
    palette[index % palette.len()]
}

/// Bold title with a smaller subtitle underneath.
pub fn titled(title: &str, subtitle: &str, subtitle_px: u32) -> String {
    format!("<br><b>{title}</b></br><span style=\"font-size: {subtitle_px}px;\">{subtitle}</span>")
}

/// Bold title.
pub fn bold(title: &str) -> String {
    format!("<b>{title}</b>")
}

/// Fixed size and margins of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Left margin.
    pub left: usize,
    /// Right margin.
    pub right: usize,
    /// Top margin.
    pub top: usize,
    /// Bottom margin.
    pub bottom: usize,
}

impl Canvas {
    /// Canvas with 80px side and bottom margins and a 100px top margin.
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            left: 80,
            right: 80,
            top: 100,
            bottom: 80,
        }
    }

    /// Same canvas with the given margins.
    #[must_use]
    pub const fn margins(mut self, left: usize, right: usize, top: usize, bottom: usize) -> Self {
        self.left = left;
        self.right = right;
        self.top = top;
        self.bottom = bottom;
        self
    }

    /// Plot area height, never below one pixel.
    pub const fn plot_height(&self) -> usize {
        let used = self.top + self.bottom;
        if self.height > used {
            self.height - used
        } else {
            1
        }
    }

    /// Layout with the white template, a centred title, and this canvas.
    pub fn layout(&self, title: &str) -> Layout {
        Layout::new()
            .template(plotly::layout::themes::BuiltinTheme::PlotlyWhite.build())
            .title(Title::with_text(title).x(0.5))
            .width(self.width)
            .height(self.height)
            .margin(
                Margin::new()
                    .left(self.left)
                    .right(self.right)
                    .top(self.top)
                    .bottom(self.bottom),
            )
    }
}

/// Branding link anchored above the top-right corner of the plot area.
#[allow(clippy::cast_precision_loss)]
pub fn watermark(branding: &BrandingConfig, canvas: &Canvas) -> Annotation {
    let x = 1.0 + 4.0 / canvas.width.max(1) as f64;
    let y = 1.0 + 22.0 / canvas.plot_height() as f64;
    Annotation::new()
        .text(&format!(
            "<span style=\"font-size: 7px\"><a href=\"{}\">{}</a></span>",
            branding.url, branding.text
        ))
        .show_arrow(false)
        .x_ref("paper")
        .y_ref("paper")
        .x(x)
        .y(y)
        .x_anchor(Anchor::Right)
        .y_anchor(Anchor::Bottom)
}

/// Grey source note centred below the plot area at paper height `y`.
pub fn source_note(text: &str, y: f64) -> Annotation {
    Annotation::new()
        .text(text)
        .font(Font::new().size(9).color(NOTE_COLOR))
        .show_arrow(false)
        .x_ref("paper")
        .y_ref("paper")
        .x(0.5)
        .y(y)
}

/// The source note and the watermark, in drawing order.
pub fn decorations(
    source: &str,
    source_y: f64,
    branding: &BrandingConfig,
    canvas: &Canvas,
) -> Vec<Annotation> {
    vec![source_note(source, source_y), watermark(branding, canvas)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titled_markup() {
        assert_eq!(
            titled("Casi", "Veneto", 11),
            "<br><b>Casi</b></br><span style=\"font-size: 11px;\">Veneto</span>"
        );
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(cycle(&T10, 0), "#4C78A8");
        assert_eq!(cycle(&T10, 10), "#4C78A8");
        assert_eq!(cycle(&FOCUS_COLORS, 3), "steelblue");
    }

    #[test]
    fn test_plot_height_never_zero() {
        assert_eq!(Canvas::new(600, 400).margins(40, 20, 80, 40).plot_height(), 280);
        assert_eq!(Canvas::new(600, 100).margins(0, 0, 80, 40).plot_height(), 1);
    }

    #[test]
    fn test_watermark_links_branding() {
        let branding = BrandingConfig {
            text: "by BuildNN".to_string(),
            url: "https://www.buildnn.com".to_string(),
        };
        let annotation = watermark(&branding, &Canvas::new(600, 400));
        let json = serde_json::to_value(&annotation).unwrap();
        assert!(json["text"]
            .as_str()
            .unwrap()
            .contains("<a href=\"https://www.buildnn.com\">by BuildNN</a>"));
        assert_eq!(json["xref"], "paper");
        assert_eq!(json["showarrow"], false);
    }
}
