//! Output sink traits and the records they accept.
//!
//! The core never touches the filesystem. Generated tables and plots are
//! handed to a [`TableSink`] or [`PlotSink`]; `irtsim-report` provides the
//! CSV and SVG implementations.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tabular records
// ---------------------------------------------------------------------------

/// A named table of string cells, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Sink-facing name (e.g. "irt_responses"); file sinks derive the file
    /// name from it.
    pub name: String,
    /// Column names.
    pub header: Vec<String>,
    /// Rows in generation order; each has `header.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, header: Vec<String>) -> Self {
        Self {
            name: name.into(),
            header,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.header.len())
    }
}

/// Accepts finished tables.
pub trait TableSink {
    fn write_table(&mut self, table: &Table) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Line plots
// ---------------------------------------------------------------------------

/// One polyline of a plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    /// Draw a marker at every point.
    #[serde(default)]
    pub markers: bool,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
            markers: false,
        }
    }

    pub fn with_markers(mut self) -> Self {
        self.markers = true;
        self
    }
}

/// A dashed horizontal guide line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub label: String,
    pub y: f64,
}

/// A 2-D line chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePlot {
    /// Sink-facing name (e.g. "adaptive_testing_convergence").
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    #[serde(default)]
    pub reference_lines: Vec<ReferenceLine>,
}

impl LinePlot {
    /// Bounding box over every series point and reference line, as
    /// `((x_min, x_max), (y_min, y_max))`. `None` when there is nothing to
    /// draw.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut points = self.series.iter().flat_map(|s| s.points.iter().copied());
        let (x0, y0) = points.next()?;
        let (mut x_min, mut x_max, mut y_min, mut y_max) = (x0, x0, y0, y0);
        for (x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        for line in &self.reference_lines {
            y_min = y_min.min(line.y);
            y_max = y_max.max(line.y);
        }
        Some(((x_min, x_max), (y_min, y_max)))
    }
}

/// Accepts finished plots.
pub trait PlotSink {
    fn render(&mut self, plot: &LinePlot) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// In-memory sink
// ---------------------------------------------------------------------------

/// Collects everything it is given. Useful for tests and for callers that
/// post-process output themselves.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub tables: Vec<Table>,
    pub plots: Vec<LinePlot>,
}

impl MemorySink {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn plot(&self, name: &str) -> Option<&LinePlot> {
        self.plots.iter().find(|p| p.name == name)
    }
}

impl TableSink for MemorySink {
    fn write_table(&mut self, table: &Table) -> anyhow::Result<()> {
        self.tables.push(table.clone());
        Ok(())
    }
}

impl PlotSink for MemorySink {
    fn render(&mut self, plot: &LinePlot) -> anyhow::Result<()> {
        self.plots.push(plot.clone());
        Ok(())
    }
}
