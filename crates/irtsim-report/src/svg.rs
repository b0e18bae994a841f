//! SVG line-chart renderer.
//!
//! Produces a self-contained SVG document with axes, tick labels, one
//! polyline per series, dashed reference lines and a legend.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use irtsim_core::traits::{LinePlot, PlotSink};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 200.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TARGET_TICKS: f64 = 6.0;

const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
];
const REFERENCE_COLOR: &str = "#d62728";

/// Escape a string for safe insertion into XML text or attributes.
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Round a raw step up to 1, 2, 5 or 10 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick positions covering `[min, max]` at a nice step.
fn ticks(min: f64, max: f64) -> (Vec<f64>, f64) {
    let step = nice_step((max - min) / TARGET_TICKS);
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    let values = (first..=last).map(|k| k as f64 * step).collect();
    (values, step)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = (-step.log10().floor()).max(0.0) as usize;
    // Snap tiny values so ticks never read "-0.0".
    let value = if value.abs() < step * 1e-9 { 0.0 } else { value };
    format!("{value:.decimals$}")
}

/// Widen degenerate ranges and pad the y axis slightly.
fn padded_bounds(plot: &LinePlot) -> ((f64, f64), (f64, f64)) {
    let ((mut x0, mut x1), (mut y0, mut y1)) = plot.bounds().unwrap_or(((0.0, 1.0), (0.0, 1.0)));
    if !(x0.is_finite() && x1.is_finite()) {
        (x0, x1) = (0.0, 1.0);
    }
    if !(y0.is_finite() && y1.is_finite()) {
        (y0, y1) = (0.0, 1.0);
    }
    if x1 - x0 <= f64::EPSILON {
        x0 -= 0.5;
        x1 += 0.5;
    }
    if y1 - y0 <= f64::EPSILON {
        y0 -= 0.5;
        y1 += 0.5;
    }
    let pad = (y1 - y0) * 0.05;
    ((x0, x1), (y0 - pad, y1 + pad))
}

struct Frame {
    x: (f64, f64),
    y: (f64, f64),
}

impl Frame {
    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn sx(&self, x: f64) -> f64 {
        MARGIN_LEFT + (x - self.x.0) / (self.x.1 - self.x.0) * Self::plot_width()
    }

    fn sy(&self, y: f64) -> f64 {
        MARGIN_TOP + Self::plot_height() - (y - self.y.0) / (self.y.1 - self.y.0) * Self::plot_height()
    }
}

/// Render a plot as a standalone SVG document.
pub fn generate_svg(plot: &LinePlot) -> String {
    let (x, y) = padded_bounds(plot);
    let frame = Frame { x, y };
    let left = MARGIN_LEFT;
    let right = MARGIN_LEFT + Frame::plot_width();
    let top = MARGIN_TOP;
    let bottom = MARGIN_TOP + Frame::plot_height();

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\">"
    );
    let _ = writeln!(svg, "<title>{}</title>", xml_escape(&plot.title));
    let _ = writeln!(svg, "<rect width=\"100%\" height=\"100%\" fill=\"white\"/>");

    // Title and axis labels
    let _ = writeln!(
        svg,
        "<text class=\"title\" x=\"{:.1}\" y=\"28\" font-size=\"18\" text-anchor=\"middle\">{}</text>",
        (left + right) / 2.0,
        xml_escape(&plot.title)
    );
    let _ = writeln!(
        svg,
        "<text class=\"x-label\" x=\"{:.1}\" y=\"{:.1}\" font-size=\"14\" text-anchor=\"middle\">{}</text>",
        (left + right) / 2.0,
        HEIGHT - 15.0,
        xml_escape(&plot.x_label)
    );
    let _ = writeln!(
        svg,
        "<text class=\"y-label\" x=\"20\" y=\"{:.1}\" font-size=\"14\" text-anchor=\"middle\" transform=\"rotate(-90 20 {:.1})\">{}</text>",
        (top + bottom) / 2.0,
        (top + bottom) / 2.0,
        xml_escape(&plot.y_label)
    );

    // Grid and ticks
    let (x_ticks, x_step) = ticks(frame.x.0, frame.x.1);
    for t in x_ticks {
        let px = frame.sx(t);
        let _ = writeln!(
            svg,
            "<line class=\"grid\" x1=\"{px:.2}\" y1=\"{top:.2}\" x2=\"{px:.2}\" y2=\"{bottom:.2}\" stroke=\"#e5e7eb\"/>"
        );
        let _ = writeln!(
            svg,
            "<text class=\"tick\" x=\"{px:.2}\" y=\"{:.2}\" font-size=\"12\" text-anchor=\"middle\">{}</text>",
            bottom + 18.0,
            format_tick(t, x_step)
        );
    }
    let (y_ticks, y_step) = ticks(frame.y.0, frame.y.1);
    for t in y_ticks {
        let py = frame.sy(t);
        let _ = writeln!(
            svg,
            "<line class=\"grid\" x1=\"{left:.2}\" y1=\"{py:.2}\" x2=\"{right:.2}\" y2=\"{py:.2}\" stroke=\"#e5e7eb\"/>"
        );
        let _ = writeln!(
            svg,
            "<text class=\"tick\" x=\"{:.2}\" y=\"{py:.2}\" font-size=\"12\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>",
            left - 8.0,
            format_tick(t, y_step)
        );
    }

    // Axes
    let _ = writeln!(
        svg,
        "<line class=\"axis\" x1=\"{left:.2}\" y1=\"{bottom:.2}\" x2=\"{right:.2}\" y2=\"{bottom:.2}\" stroke=\"black\"/>"
    );
    let _ = writeln!(
        svg,
        "<line class=\"axis\" x1=\"{left:.2}\" y1=\"{top:.2}\" x2=\"{left:.2}\" y2=\"{bottom:.2}\" stroke=\"black\"/>"
    );

    // Reference lines
    for line in &plot.reference_lines {
        if !line.y.is_finite() {
            continue;
        }
        let py = frame.sy(line.y);
        let _ = writeln!(
            svg,
            "<line class=\"reference\" x1=\"{left:.2}\" y1=\"{py:.2}\" x2=\"{right:.2}\" y2=\"{py:.2}\" stroke=\"{REFERENCE_COLOR}\" stroke-width=\"1.5\" stroke-dasharray=\"6,4\"/>"
        );
    }

    // Series
    for (i, series) in plot.series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| (frame.sx(x), frame.sy(y)))
            .collect();
        let path = points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            svg,
            "<polyline class=\"series\" points=\"{path}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"2\"/>"
        );
        if series.markers {
            for (x, y) in &points {
                let _ = writeln!(
                    svg,
                    "<circle class=\"marker\" cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"4\" fill=\"{color}\"/>"
                );
            }
        }
    }

    // Legend
    let legend_x = right + 20.0;
    let mut legend_y = top + 10.0;
    for (i, series) in plot.series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let _ = writeln!(
            svg,
            "<line x1=\"{legend_x:.2}\" y1=\"{legend_y:.2}\" x2=\"{:.2}\" y2=\"{legend_y:.2}\" stroke=\"{color}\" stroke-width=\"2\"/>",
            legend_x + 24.0
        );
        let _ = writeln!(
            svg,
            "<text class=\"legend\" x=\"{:.2}\" y=\"{legend_y:.2}\" font-size=\"12\" dominant-baseline=\"middle\">{}</text>",
            legend_x + 30.0,
            xml_escape(&series.label)
        );
        legend_y += 20.0;
    }
    for line in &plot.reference_lines {
        let _ = writeln!(
            svg,
            "<line x1=\"{legend_x:.2}\" y1=\"{legend_y:.2}\" x2=\"{:.2}\" y2=\"{legend_y:.2}\" stroke=\"{REFERENCE_COLOR}\" stroke-width=\"1.5\" stroke-dasharray=\"6,4\"/>",
            legend_x + 24.0
        );
        let _ = writeln!(
            svg,
            "<text class=\"legend\" x=\"{:.2}\" y=\"{legend_y:.2}\" font-size=\"12\" dominant-baseline=\"middle\">{}</text>",
            legend_x + 30.0,
            xml_escape(&line.label)
        );
        legend_y += 20.0;
    }

    svg.push_str("</svg>\n");
    svg
}

/// Write a plot to `path`, creating parent directories.
pub fn write_svg_plot(plot: &LinePlot, path: &Path) -> Result<()> {
    let svg = generate_svg(plot);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Writes each plot to `<dir>/<name>.svg`.
#[derive(Debug, Clone)]
pub struct SvgDirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl SvgDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.svg"))
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PlotSink for SvgDirectorySink {
    fn render(&mut self, plot: &LinePlot) -> Result<()> {
        let path = self.path_for(&plot.name);
        write_svg_plot(plot, &path)?;
        tracing::info!(path = %path.display(), series = plot.series.len(), "rendered plot");
        self.written.push(path);
        Ok(())
    }
}
