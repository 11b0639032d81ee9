//! In-memory [`Canvas`] that records draw calls.
//!
//! Used for headless rendering and to inspect frames in tests.

use super::{Canvas, Rgba};
use crate::model::Point;
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    PushTransform { offset: Point, scale: f64 },
    PopTransform,
    Line { from: Point, to: Point, width: f64, color: Rgba },
    Circle { center: Point, radius: f64, color: Rgba },
    Text { at: Point, text: String, size: f64, color: Rgba },
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    width: f64,
    height: f64,
    depth: usize,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            depth: 0,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Open transforms; zero after a balanced frame.
    pub fn transform_depth(&self) -> usize {
        self.depth
    }

    pub fn reset(&mut self) {
        self.depth = 0;
        self.commands.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = (Point, Point, f64, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { from, to, width, color } => Some((*from, *to, *width, *color)),
            _ => None,
        })
    }

    pub fn lines_with_color(&self, color: Rgba) -> usize {
        self.lines().filter(|l| l.3 == color).count()
    }

    pub fn circles(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle { center, radius, .. } => Some((*center, *radius)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (Point, &str)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { at, text, .. } => Some((*at, text.as_str())),
            _ => None,
        })
    }
}

impl Canvas for Recorder {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn push_transform(&mut self, viewport: &Viewport) {
        self.depth += 1;
        self.commands.push(DrawCommand::PushTransform {
            offset: viewport.offset(),
            scale: viewport.scale(),
        });
    }

    fn pop_transform(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopTransform);
    }

    fn line(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Line { from, to, width, color });
    }

    fn circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn text(&mut self, at: Point, text: &str, size: f64, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            size,
            color,
        });
    }
}
