//! Chart State
//!
//! Owned state for one line chart: a label axis plus three index-aligned
//! series (primary values, calibration markers, buzzer markers).

use serde::Serialize;

use crate::telemetry::Sample;

/// The two charts on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartId {
    /// Tilt angle in degrees
    Angle,
    /// Light sensor level
    Light,
}

impl ChartId {
    /// Get both charts for iteration
    pub fn all() -> &'static [ChartId] {
        &[ChartId::Angle, ChartId::Light]
    }

    /// Identifier of the rendering surface this chart draws on
    pub fn surface_id(&self) -> &'static str {
        match self {
            ChartId::Angle => "angleChart",
            ChartId::Light => "lightChart",
        }
    }

    /// The charted quantity for a sample, if the sample carries it
    pub fn value_of(&self, sample: &Sample) -> Option<f64> {
        match self {
            ChartId::Angle => sample.tilt_angle,
            ChartId::Light => sample.light,
        }
    }

    /// Dataset styles, in series order: primary, calibration, buzzer
    pub fn datasets(&self) -> [DatasetStyle; 3] {
        let primary = match self {
            ChartId::Angle => DatasetStyle::line("Tilt Angle (°)", "blue"),
            ChartId::Light => DatasetStyle::line("Light Level", "orange"),
        };
        [
            primary,
            DatasetStyle::markers("Calibration", "green"),
            DatasetStyle::markers("Buzzer", "red"),
        ]
    }
}

impl std::fmt::Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.surface_id())
    }
}

/// Presentation of one dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatasetStyle {
    pub label: &'static str,
    pub color: &'static str,
    /// Marker datasets are drawn as discrete points only
    pub show_line: bool,
    pub point_radius: f64,
}

impl DatasetStyle {
    const MARKER_RADIUS: f64 = 6.0;
    const LINE_POINT_RADIUS: f64 = 3.0;

    fn line(label: &'static str, color: &'static str) -> Self {
        Self {
            label,
            color,
            show_line: true,
            point_radius: Self::LINE_POINT_RADIUS,
        }
    }

    fn markers(label: &'static str, color: &'static str) -> Self {
        Self {
            label,
            color,
            show_line: false,
            point_radius: Self::MARKER_RADIUS,
        }
    }
}

/// Three aligned series for one chart, derived from a sample slice
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Charted value per sample, 0 when the sample lacks it
    pub values: Vec<f64>,
    /// Value at calibration samples, `None` elsewhere
    pub calibration: Vec<Option<f64>>,
    /// Value at buzzer samples, `None` elsewhere
    pub buzzer: Vec<Option<f64>>,
}

impl ChartSeries {
    /// Map samples to the chart's series
    pub fn from_samples(chart: ChartId, samples: &[Sample]) -> Self {
        let mut series = Self {
            values: Vec::with_capacity(samples.len()),
            calibration: Vec::with_capacity(samples.len()),
            buzzer: Vec::with_capacity(samples.len()),
        };

        for sample in samples {
            let value = chart.value_of(sample).unwrap_or(0.0);
            series.values.push(value);
            series
                .calibration
                .push(sample.is_calibration().then_some(value));
            series.buzzer.push(sample.is_buzzer().then_some(value));
        }

        series
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of samples carrying a calibration marker
    pub fn calibration_count(&self) -> usize {
        self.calibration.iter().flatten().count()
    }

    /// Number of samples carrying a buzzer marker
    pub fn buzzer_count(&self) -> usize {
        self.buzzer.iter().flatten().count()
    }
}

/// Current state of one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartState {
    pub id: ChartId,
    /// Shared x-axis for all three series
    pub labels: Vec<String>,
    pub series: ChartSeries,
    /// Incremented on every replacement; a bump is a redraw request
    pub revision: u64,
}

impl ChartState {
    /// Create an empty chart
    pub fn new(id: ChartId) -> Self {
        Self {
            id,
            labels: Vec::new(),
            series: ChartSeries::default(),
            revision: 0,
        }
    }

    /// Replace the label axis and every series, then request a redraw
    pub fn replace(&mut self, labels: Vec<String>, series: ChartSeries) {
        debug_assert_eq!(labels.len(), series.len());
        self.labels = labels;
        self.series = series;
        self.revision += 1;
    }

    /// All series have the label axis length
    pub fn is_aligned(&self) -> bool {
        let n = self.labels.len();
        self.series.values.len() == n
            && self.series.calibration.len() == n
            && self.series.buzzer.len() == n
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Most recent label and value, if any
    pub fn latest(&self) -> Option<(&str, f64)> {
        let label = self.labels.last()?;
        let value = self.series.values.last()?;
        Some((label.as_str(), *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new(1.0).tilt_angle(5.0).light(10.0),
            Sample::new(2.0).tilt_angle(7.0).calibrated(),
            Sample::new(3.0).light(42.0).buzzed(),
            Sample::new(4.0).tilt_angle(-3.5).light(8.0).calibrated().buzzed(),
        ]
    }

    #[test]
    fn test_primary_values_default_to_zero() {
        let angle = ChartSeries::from_samples(ChartId::Angle, &samples());
        assert_eq!(angle.values, vec![5.0, 7.0, 0.0, -3.5]);

        let light = ChartSeries::from_samples(ChartId::Light, &samples());
        assert_eq!(light.values, vec![10.0, 0.0, 42.0, 8.0]);
    }

    #[test]
    fn test_markers_follow_flags() {
        let angle = ChartSeries::from_samples(ChartId::Angle, &samples());
        assert_eq!(angle.calibration, vec![None, Some(7.0), None, Some(-3.5)]);
        assert_eq!(angle.buzzer, vec![None, None, Some(0.0), Some(-3.5)]);

        let light = ChartSeries::from_samples(ChartId::Light, &samples());
        assert_eq!(light.calibration, vec![None, Some(0.0), None, Some(8.0)]);
        assert_eq!(light.buzzer, vec![None, None, Some(42.0), Some(8.0)]);
        assert_eq!(light.calibration_count(), 2);
        assert_eq!(light.buzzer_count(), 2);
    }

    #[test]
    fn test_marker_equals_primary_when_present() {
        for chart in ChartId::all() {
            let series = ChartSeries::from_samples(*chart, &samples());
            for (i, value) in series.values.iter().enumerate() {
                if let Some(marker) = series.calibration[i] {
                    assert_eq!(marker, *value);
                }
                if let Some(marker) = series.buzzer[i] {
                    assert_eq!(marker, *value);
                }
            }
        }
    }

    #[test]
    fn test_replace_bumps_revision() {
        let mut chart = ChartState::new(ChartId::Angle);
        assert!(chart.is_empty());
        assert!(chart.latest().is_none());

        let data = samples();
        let labels: Vec<String> = data.iter().map(|s| format!("{:?}", s.timestamp)).collect();
        chart.replace(labels, ChartSeries::from_samples(ChartId::Angle, &data));

        assert_eq!(chart.revision, 1);
        assert_eq!(chart.len(), 4);
        assert!(chart.is_aligned());
        assert_eq!(chart.latest().map(|(_, v)| v), Some(-3.5));
    }

    #[test]
    fn test_dataset_styles() {
        let [primary, calibration, buzzer] = ChartId::Angle.datasets();
        assert_eq!(primary.label, "Tilt Angle (°)");
        assert!(primary.show_line);
        assert!(!calibration.show_line);
        assert!(!buzzer.show_line);
        assert_eq!(ChartId::Light.datasets()[0].label, "Light Level");
        assert_eq!(ChartId::Light.surface_id(), "lightChart");
    }
}
