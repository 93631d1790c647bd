//! Dashboard Renderer
//!
//! Turns a telemetry payload into chart and log panel state:
//!
//! - **chart**: Per-chart label axis plus primary/calibration/buzzer series
//! - **labels**: Time-of-day x-axis labels
//! - **log_panel**: Verbatim log lines
//! - **dashboard**: The `render` mapping and the `Dashboard` wrapper
//! - **surface**: Seam to the external drawing surfaces
//!
//! # Example
//!
//! ```rust
//! use tiltwatch::render::{render, DashboardView, LabelClock};
//! use tiltwatch::telemetry::{Payload, Sample};
//!
//! let payload = Payload::new(
//!     vec![Sample::new(1000.0).tilt_angle(7.0).calibrated()],
//!     vec!["[CALIBRATION] Button pressed".to_string()],
//! );
//!
//! let mut view = DashboardView::new();
//! render(&payload, &mut view, &LabelClock::utc());
//!
//! assert_eq!(view.angle.series.values, vec![7.0]);
//! assert_eq!(view.angle.series.calibration, vec![Some(7.0)]);
//! ```

pub mod chart;
pub mod dashboard;
pub mod error;
pub mod labels;
pub mod log_panel;
pub mod surface;

pub use chart::{ChartId, ChartSeries, ChartState, DatasetStyle};
pub use dashboard::{render, Dashboard, DashboardView, RenderOutcome};
pub use error::{RenderError, RenderResult};
pub use labels::{LabelClock, LabelZone, DEFAULT_LABEL_FORMAT, INVALID_LABEL};
pub use log_panel::{LogPanel, LOG_SURFACE_ID};
pub use surface::{DashboardSurface, NullSurface, TerminalSurface};
