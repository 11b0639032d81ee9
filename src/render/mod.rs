//! Scene rendering.
//!
//! The scene is drawn onto any [`Canvas`]: a reference grid and the tour in
//! world space (inside the viewport transform), then the city markers in
//! screen space so their size does not change with zoom.
//!
//! Drawing is a pure function of the editor state; [`RenderLoop`] only adds
//! the "draw when something changed" policy on top.

pub mod recorder;

pub use recorder::{DrawCommand, Recorder};

use crate::editor::EditorState;
use crate::model::{CitySet, Point, Tour};
use crate::viewport::Viewport;

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Fixed look of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStyle {
    pub background: Rgba,
    /// Grid spacing in world units.
    pub grid_spacing: f64,
    pub grid_color: Rgba,
    pub grid_width: f64,
    pub tour_color: Rgba,
    /// Tour stroke width in screen pixels.
    pub tour_width: f64,
    /// Marker radius in screen pixels.
    pub marker_radius: f64,
    pub marker_color: Rgba,
    pub label_size: f64,
    pub label_color: Rgba,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(250, 250, 250),
            grid_spacing: 50.0,
            grid_color: Rgba::rgba(100, 100, 100, 40),
            grid_width: 1.0,
            tour_color: Rgba::rgb(33, 150, 243),
            tour_width: 2.0,
            marker_radius: 10.0,
            marker_color: Rgba::rgb(220, 53, 69),
            label_size: 12.0,
            label_color: Rgba::WHITE,
        }
    }
}

/// A 2D drawing surface.
///
/// Between [`Canvas::push_transform`] and [`Canvas::pop_transform`],
/// coordinates and line widths are in world units and are mapped through the
/// viewport. Outside, they are screen pixels.
pub trait Canvas {
    /// Surface size in screen pixels.
    fn size(&self) -> (f64, f64);
    fn clear(&mut self, color: Rgba);
    fn push_transform(&mut self, viewport: &Viewport);
    fn pop_transform(&mut self);
    fn line(&mut self, from: Point, to: Point, width: f64, color: Rgba);
    fn circle(&mut self, center: Point, radius: f64, color: Rgba);
    /// Text centred on `at`.
    fn text(&mut self, at: Point, text: &str, size: f64, color: Rgba);
}

/// What one frame drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub grid_lines: usize,
    pub tour_segments: usize,
    pub markers: usize,
}

/// Draw the whole scene for `state`.
pub fn render_scene(state: &EditorState, canvas: &mut dyn Canvas) -> FrameStats {
    let style = &state.config().style;
    let viewport = state.viewport();

    canvas.clear(style.background);
    canvas.push_transform(viewport);
    let grid_lines = draw_grid(canvas, viewport, style);
    let tour_segments = match state.tour() {
        Some(tour) => draw_tour(canvas, viewport, state.cities(), tour, style),
        None => 0,
    };
    canvas.pop_transform();
    let markers = draw_markers(canvas, viewport, state.cities(), style);

    FrameStats {
        grid_lines,
        tour_segments,
        markers,
    }
}

/// Upper bound on grid lines per axis; beyond it the grid is skipped.
const MAX_GRID_LINES: usize = 2_000;

/// Draw the reference grid covering the visible world area. Must be called
/// inside the viewport transform.
pub fn draw_grid(canvas: &mut dyn Canvas, viewport: &Viewport, style: &SceneStyle) -> usize {
    let spacing = style.grid_spacing;
    if !(spacing > 0.0 && spacing.is_finite()) {
        return 0;
    }
    let (width, height) = canvas.size();
    let top_left = viewport.to_world(Point::ZERO);
    let bottom_right = viewport.to_world(Point::new(width, height));

    let start_x = (top_left.x / spacing).floor() as i64;
    let end_x = (bottom_right.x / spacing).ceil() as i64;
    let start_y = (top_left.y / spacing).floor() as i64;
    let end_y = (bottom_right.y / spacing).ceil() as i64;
    let columns = (end_x - start_x).max(0) as usize + 1;
    let rows = (end_y - start_y).max(0) as usize + 1;
    if columns > MAX_GRID_LINES || rows > MAX_GRID_LINES {
        return 0;
    }

    let stroke = style.grid_width / viewport.scale();
    let (y0, y1) = (start_y as f64 * spacing, end_y as f64 * spacing);
    let (x0, x1) = (start_x as f64 * spacing, end_x as f64 * spacing);
    for i in start_x..=end_x {
        let x = i as f64 * spacing;
        canvas.line(Point::new(x, y0), Point::new(x, y1), stroke, style.grid_color);
    }
    for j in start_y..=end_y {
        let y = j as f64 * spacing;
        canvas.line(Point::new(x0, y), Point::new(x1, y), stroke, style.grid_color);
    }
    columns + rows
}

/// Draw the tour as segments between successive cities, inside the viewport
/// transform. Nothing is drawn for fewer than two cities.
pub fn draw_tour(
    canvas: &mut dyn Canvas,
    viewport: &Viewport,
    cities: &CitySet,
    tour: &Tour,
    style: &SceneStyle,
) -> usize {
    if cities.len() < 2 {
        return 0;
    }
    let width = style.tour_width / viewport.scale();
    let mut drawn = 0;
    for (from, to) in tour.segments(cities) {
        canvas.line(from, to, width, style.tour_color);
        drawn += 1;
    }
    drawn
}

/// Draw every city as a fixed-size disc with its 1-based index, in screen
/// space.
pub fn draw_markers(
    canvas: &mut dyn Canvas,
    viewport: &Viewport,
    cities: &CitySet,
    style: &SceneStyle,
) -> usize {
    for (i, city) in cities.iter().enumerate() {
        let at = viewport.to_screen(city.position());
        canvas.circle(at, style.marker_radius, style.marker_color);
        canvas.text(at, &(i + 1).to_string(), style.label_size, style.label_color);
    }
    cities.len()
}

// ────────────────────────────────────────────────────────────────────────────
// Render loop
// ────────────────────────────────────────────────────────────────────────────

/// Redraws only when the editor state asked for it.
///
/// For hosts that keep their surface between frames (headless recording,
/// retained canvases). Immediate-mode hosts such as the egui app paint every
/// frame and use the redraw flag only to schedule the next one.
#[derive(Debug, Clone, Default)]
pub struct RenderLoop {
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw a frame if one is pending.
    pub fn frame(&mut self, state: &mut EditorState, canvas: &mut dyn Canvas) -> Option<FrameStats> {
        if !state.take_redraw() {
            return None;
        }
        self.frames += 1;
        Some(render_scene(state, canvas))
    }
}
