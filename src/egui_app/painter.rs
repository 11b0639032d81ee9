//! [`Canvas`] backed by an egui [`Painter`].

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

use crate::model::Point;
use crate::render::{Canvas, Rgba};
use crate::viewport::Viewport;

/// Paints into `rect`; scene screen coordinates are relative to its top-left.
pub struct EguiCanvas<'a> {
    painter: &'a Painter,
    rect: Rect,
    transforms: Vec<Viewport>,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self {
            painter,
            rect,
            transforms: Vec::new(),
        }
    }

    fn to_pos(&self, p: Point) -> Pos2 {
        let screen = match self.transforms.last() {
            Some(viewport) => viewport.to_screen(p),
            None => p,
        };
        Pos2::new(
            self.rect.min.x + screen.x as f32,
            self.rect.min.y + screen.y as f32,
        )
    }

    fn to_pixels(&self, length: f64) -> f32 {
        let scale = self.transforms.last().map_or(1.0, |v| v.scale());
        (length * scale) as f32
    }
}

fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

impl Canvas for EguiCanvas<'_> {
    fn size(&self) -> (f64, f64) {
        (self.rect.width() as f64, self.rect.height() as f64)
    }

    fn clear(&mut self, color: Rgba) {
        self.painter.rect_filled(self.rect, 0.0, color32(color));
    }

    fn push_transform(&mut self, viewport: &Viewport) {
        self.transforms.push(*viewport);
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }

    fn line(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        let stroke = Stroke::new(self.to_pixels(width), color32(color));
        self.painter
            .line_segment([self.to_pos(from), self.to_pos(to)], stroke);
    }

    fn circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.painter
            .circle_filled(self.to_pos(center), self.to_pixels(radius), color32(color));
    }

    fn text(&mut self, at: Point, text: &str, size: f64, color: Rgba) {
        self.painter.text(
            self.to_pos(at),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(self.to_pixels(size)),
            color32(color),
        );
    }
}
