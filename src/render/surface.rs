//! Rendering Surfaces
//!
//! The dashboard draws onto external collaborators: two chart surfaces and
//! one log surface. `DashboardSurface` is the seam; `TerminalSurface` is the
//! implementation shipped with the `tiltwatch` binary.

use std::io::Write;

use super::chart::ChartState;
use super::log_panel::{LogPanel, LOG_SURFACE_ID};

/// Receiver of redraw requests
pub trait DashboardSurface: Send + Sync {
    /// Draw a chart whose state was just replaced
    fn redraw_chart(&mut self, chart: &ChartState);

    /// Show the log panel content
    fn show_logs(&mut self, panel: &LogPanel);

    /// Show the last calibration time, if known
    fn show_status(&mut self, _last_calibration: Option<&str>) {}
}

/// Surface that draws nothing
#[derive(Debug, Default)]
pub struct NullSurface;

impl DashboardSurface for NullSurface {
    fn redraw_chart(&mut self, _chart: &ChartState) {}

    fn show_logs(&mut self, _panel: &LogPanel) {}
}

/// Writes a compact text rendition of each redraw
///
/// Charts become one summary line each; the log panel is printed in full.
pub struct TerminalSurface<W> {
    out: W,
}

impl TerminalSurface<std::io::Stdout> {
    /// Surface writing to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the surface and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn chart_line(chart: &ChartState) -> String {
        let [primary, calibration, buzzer] = chart.id.datasets();
        let latest = match chart.latest() {
            Some((label, value)) => format!("{:.1} @ {}", value, label),
            None => "-".to_string(),
        };

        format!(
            "{:<11} {:<15} {:>4} pts  latest={}  {}={} {}={}",
            chart.id.surface_id(),
            primary.label,
            chart.len(),
            latest,
            calibration.label.to_lowercase(),
            chart.series.calibration_count(),
            buzzer.label.to_lowercase(),
            chart.series.buzzer_count(),
        )
    }

    fn write_or_warn(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::warn!("Terminal surface write failed: {}", e);
        }
    }
}

impl<W: Write + Send + Sync> DashboardSurface for TerminalSurface<W> {
    fn redraw_chart(&mut self, chart: &ChartState) {
        let line = Self::chart_line(chart);
        self.write_or_warn(&line);
    }

    fn show_logs(&mut self, panel: &LogPanel) {
        let lines = panel.lines();

        let mut text = format!("{} ({} lines)", LOG_SURFACE_ID, lines.len());
        for line in lines {
            text.push_str("\n  ");
            text.push_str(line);
        }
        self.write_or_warn(&text);
    }

    fn show_status(&mut self, last_calibration: Option<&str>) {
        let text = format!("last calibration: {}", last_calibration.unwrap_or("never"));
        self.write_or_warn(&text);
    }
}

impl<W> std::fmt::Debug for TerminalSurface<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSurface").finish_non_exhaustive()
    }
}
