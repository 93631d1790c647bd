//! Dashboard rendering
//!
//! `render` maps one payload onto an owned `DashboardView`. `Dashboard`
//! couples a view with the surface it draws on.

use serde::Serialize;

use super::chart::{ChartId, ChartSeries, ChartState};
use super::labels::LabelClock;
use super::log_panel::LogPanel;
use super::surface::{DashboardSurface, NullSurface};
use crate::telemetry::Payload;

/// Everything the dashboard displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub angle: ChartState,
    pub light: ChartState,
    pub logs: LogPanel,
    /// Display label for the most recent calibration
    pub last_calibration: Option<String>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self {
            angle: ChartState::new(ChartId::Angle),
            light: ChartState::new(ChartId::Light),
            logs: LogPanel::new(),
            last_calibration: None,
        }
    }

    pub fn chart(&self, id: ChartId) -> &ChartState {
        match id {
            ChartId::Angle => &self.angle,
            ChartId::Light => &self.light,
        }
    }

    fn chart_mut(&mut self, id: ChartId) -> &mut ChartState {
        match id {
            ChartId::Angle => &mut self.angle,
            ChartId::Light => &mut self.light,
        }
    }
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

/// What a render pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Payload had no samples; the view is untouched
    Skipped,
    /// Charts and log panel were replaced
    Updated { points: usize },
}

/// Map a payload onto the view
///
/// An empty or absent `data` array leaves the whole view, log panel
/// included, exactly as it was. Otherwise both charts get a fresh label axis
/// and three fresh series, and the log panel gets the payload's lines.
pub fn render(payload: &Payload, view: &mut DashboardView, clock: &LabelClock) -> RenderOutcome {
    let samples = payload.samples();
    if samples.is_empty() {
        return RenderOutcome::Skipped;
    }

    let labels: Vec<String> = samples.iter().map(|s| clock.label(s.timestamp)).collect();

    for id in ChartId::all() {
        let series = ChartSeries::from_samples(*id, samples);
        view.chart_mut(*id).replace(labels.clone(), series);
    }

    view.logs.replace(payload.logs.clone());
    view.last_calibration = payload.last_calibration.map(|ts| clock.label(Some(ts)));

    RenderOutcome::Updated {
        points: samples.len(),
    }
}

/// A view plus the surface it is drawn on
pub struct Dashboard {
    view: DashboardView,
    clock: LabelClock,
    surface: Box<dyn DashboardSurface>,
}

impl Dashboard {
    /// Create a dashboard drawing on the given surface
    pub fn new(clock: LabelClock, surface: Box<dyn DashboardSurface>) -> Self {
        Self {
            view: DashboardView::new(),
            clock,
            surface,
        }
    }

    /// Create a dashboard with no surface attached
    pub fn headless(clock: LabelClock) -> Self {
        Self::new(clock, Box::new(NullSurface))
    }

    /// Render a payload and, if anything changed, redraw the surface
    pub fn apply(&mut self, payload: &Payload) -> RenderOutcome {
        let outcome = render(payload, &mut self.view, &self.clock);

        if let RenderOutcome::Updated { points } = outcome {
            tracing::debug!(points, "Dashboard updated");
            for id in ChartId::all() {
                self.surface.redraw_chart(self.view.chart(*id));
            }
            self.surface.show_logs(&self.view.logs);
            self.surface
                .show_status(self.view.last_calibration.as_deref());
        }

        outcome
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn clock(&self) -> &LabelClock {
        &self.clock
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("view", &self.view)
            .field("clock", &self.clock)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::log_panel::LogPanel;
    use crate::telemetry::Sample;
    use std::sync::{Arc, Mutex};

    fn scenario_payload() -> Payload {
        serde_json::from_str(
            r#"{
                "data": [{"timestamp": 1000, "tilt_angle": 5, "light": 10, "calibration": 0, "buzzer": 0}],
                "logs": ["ok"],
                "last_calibration": 900
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_single_sample_scenario() {
        let mut view = DashboardView::new();
        let outcome = render(&scenario_payload(), &mut view, &LabelClock::utc());

        assert_eq!(outcome, RenderOutcome::Updated { points: 1 });
        assert_eq!(view.angle.labels, vec!["00:16:40"]);
        assert_eq!(view.angle.series.values, vec![5.0]);
        assert_eq!(view.angle.series.calibration, vec![None]);
        assert_eq!(view.angle.series.buzzer, vec![None]);
        assert_eq!(view.light.series.values, vec![10.0]);
        assert_eq!(view.logs.lines(), &["ok"]);
        assert_eq!(view.last_calibration.as_deref(), Some("00:15:00"));
    }

    #[test]
    fn test_calibration_marker_scenario() {
        let payload = Payload::new(vec![Sample::new(1.0).tilt_angle(7.0).calibrated()], vec![]);
        let mut view = DashboardView::new();
        render(&payload, &mut view, &LabelClock::utc());

        assert_eq!(view.angle.series.calibration, vec![Some(7.0)]);
        assert_eq!(view.angle.series.buzzer, vec![None]);
    }

    #[test]
    fn test_empty_or_absent_data_preserves_view() {
        let clock = LabelClock::utc();
        let mut view = DashboardView::new();
        render(&scenario_payload(), &mut view, &clock);
        let before = view.clone();

        let empty = Payload::new(Vec::new(), vec!["ignored".to_string()]);
        assert_eq!(render(&empty, &mut view, &clock), RenderOutcome::Skipped);
        assert_eq!(view, before);

        let absent: Payload = serde_json::from_str(r#"{"logs": ["ignored"]}"#).unwrap();
        assert_eq!(render(&absent, &mut view, &clock), RenderOutcome::Skipped);
        assert_eq!(view, before);
    }

    #[test]
    fn test_payload_replaces_rather_than_appends() {
        let clock = LabelClock::utc();
        let mut view = DashboardView::new();

        let first = Payload::new(
            (0..5).map(|i| Sample::new(i as f64).tilt_angle(1.0)).collect(),
            vec!["a".to_string(), "b".to_string()],
        );
        render(&first, &mut view, &clock);
        assert_eq!(view.angle.len(), 5);

        let second = Payload::new(vec![Sample::new(10.0).light(3.0)], vec!["c".to_string()]);
        render(&second, &mut view, &clock);

        assert_eq!(view.angle.series.values, vec![0.0]);
        assert_eq!(view.light.series.values, vec![3.0]);
        assert_eq!(view.logs.lines(), &["c"]);
        assert_eq!(view.last_calibration, None);
        assert_eq!(view.angle.revision, 2);
    }

    #[test]
    fn test_series_alignment_after_every_update() {
        let clock = LabelClock::utc();
        let mut view = DashboardView::new();

        for n in [1usize, 7, 3, 300] {
            let data: Vec<Sample> = (0..n)
                .map(|i| {
                    let mut s = Sample::new(i as f64);
                    if i % 2 == 0 {
                        s = s.tilt_angle(i as f64);
                    }
                    if i % 3 == 0 {
                        s = s.calibrated();
                    }
                    if i % 5 == 0 {
                        s = s.buzzed();
                    }
                    s
                })
                .collect();
            render(&Payload::new(data, Vec::new()), &mut view, &clock);

            for id in ChartId::all() {
                let chart = view.chart(*id);
                assert_eq!(chart.len(), n);
                assert!(chart.is_aligned());
            }
        }
    }

    #[test]
    fn test_logs_rendered_verbatim_in_order() {
        let logs = vec![
            "[POSTURE] Good (angle=3.0°)".to_string(),
            "<div>not escaped</div>".to_string(),
            String::new(),
        ];
        let mut view = DashboardView::new();
        render(
            &Payload::new(vec![Sample::new(1.0)], logs.clone()),
            &mut view,
            &LabelClock::utc(),
        );
        assert_eq!(view.logs.lines(), logs.as_slice());
    }

    #[derive(Default)]
    struct Recorded {
        charts: Vec<(ChartId, u64)>,
        logs: Vec<Vec<String>>,
        status: Vec<Option<String>>,
    }

    struct RecordingSurface(Arc<Mutex<Recorded>>);

    impl DashboardSurface for RecordingSurface {
        fn redraw_chart(&mut self, chart: &ChartState) {
            self.0.lock().unwrap().charts.push((chart.id, chart.revision));
        }

        fn show_logs(&mut self, panel: &LogPanel) {
            self.0.lock().unwrap().logs.push(panel.lines().to_vec());
        }

        fn show_status(&mut self, last_calibration: Option<&str>) {
            self.0
                .lock()
                .unwrap()
                .status
                .push(last_calibration.map(str::to_string));
        }
    }

    #[test]
    fn test_dashboard_redraws_only_on_update() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let mut dashboard = Dashboard::new(
            LabelClock::utc(),
            Box::new(RecordingSurface(Arc::clone(&recorded))),
        );

        assert_eq!(dashboard.apply(&Payload::default()), RenderOutcome::Skipped);
        assert!(recorded.lock().unwrap().charts.is_empty());

        dashboard.apply(&scenario_payload());
        let rec = recorded.lock().unwrap();
        assert_eq!(rec.charts, vec![(ChartId::Angle, 1), (ChartId::Light, 1)]);
        assert_eq!(rec.logs, vec![vec!["ok".to_string()]]);
        assert_eq!(rec.status, vec![Some("00:15:00".to_string())]);
        assert_eq!(dashboard.view().angle.series.values, vec![5.0]);
    }
}
