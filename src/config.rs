//! Editor configuration.
//!
//! Everything has a sensible default; binaries override individual fields from
//! command-line arguments through the `with_*` builders.

use crate::render::SceneStyle;
use crate::solver::SolverParams;
use crate::viewport::ScaleBounds;

/// Default movement (screen pixels) that turns a press into a pan.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 5.0;
/// Default clickable radius around a city, in screen pixels.
pub const DEFAULT_HIT_TOLERANCE: f64 = 15.0;
pub const DEFAULT_HISTORY_DEPTH: usize = 200;
pub const DEFAULT_WHEEL_SENSITIVITY: f64 = 0.001;

/// What to do with a tour that arrives after the city set changed.
///
/// Replies carry no request id. They are matched to sent requests in order,
/// and requests lost to a dropped connection are forgotten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleTourPolicy {
    /// Ignore tours computed for an older city set.
    #[default]
    Discard,
    /// Show every tour the solver sends.
    Accept,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub scale_bounds: ScaleBounds,
    pub drag_threshold: f64,
    pub hit_tolerance: f64,
    pub history_depth: usize,
    pub wheel_sensitivity: f64,
    pub stale_tours: StaleTourPolicy,
    /// Attached to every solve request; `None` lets the solver pick.
    pub solver_params: Option<SolverParams>,
    pub style: SceneStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scale_bounds: ScaleBounds::default(),
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            history_depth: DEFAULT_HISTORY_DEPTH,
            wheel_sensitivity: DEFAULT_WHEEL_SENSITIVITY,
            stale_tours: StaleTourPolicy::Discard,
            solver_params: Some(SolverParams::default()),
            style: SceneStyle::default(),
        }
    }
}

impl EditorConfig {
    pub fn with_scale_bounds(mut self, bounds: ScaleBounds) -> Self {
        self.scale_bounds = bounds;
        self
    }

    pub fn with_drag_threshold(mut self, pixels: f64) -> Self {
        self.drag_threshold = pixels;
        self
    }

    pub fn with_hit_tolerance(mut self, pixels: f64) -> Self {
        self.hit_tolerance = pixels;
        self
    }

    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    pub fn with_stale_tours(mut self, policy: StaleTourPolicy) -> Self {
        self.stale_tours = policy;
        self
    }

    pub fn with_solver_params(mut self, params: Option<SolverParams>) -> Self {
        self.solver_params = params;
        self
    }

    pub fn with_style(mut self, style: SceneStyle) -> Self {
        self.style = style;
        self
    }

    /// Zoom factor for a wheel delta. Positive `delta_y` (scrolling down)
    /// zooms out; the factor never drops below 0.1.
    pub fn wheel_factor(&self, delta_y: f64) -> f64 {
        (1.0 - delta_y * self.wheel_sensitivity).max(0.1)
    }
}
