//! The editor window.

use camino::Utf8PathBuf;
use egui::{CursorIcon, Pos2, Rect, Sense};
use log::{info, warn};

use super::painter::EguiCanvas;
use crate::editor::{Cursor, EditorSession, InputEvent, Key, Modifiers};
use crate::model::Point;
use crate::render::{FrameStats, render_scene};
use crate::solver::SolverLink;

/// Key bindings checked each frame, most specific first so that
/// Ctrl+Shift+Z is not swallowed by Ctrl+Z.
const BINDINGS: [(egui::Modifiers, egui::Key, Key, Modifiers); 7] = [
    (
        egui::Modifiers::COMMAND.plus(egui::Modifiers::SHIFT),
        egui::Key::Z,
        Key::Z,
        Modifiers::ctrl_shift(),
    ),
    (egui::Modifiers::COMMAND, egui::Key::Z, Key::Z, Modifiers::ctrl()),
    (egui::Modifiers::COMMAND, egui::Key::Y, Key::Y, Modifiers::ctrl()),
    (egui::Modifiers::NONE, egui::Key::Enter, Key::Enter, Modifiers::NONE),
    (egui::Modifiers::NONE, egui::Key::Escape, Key::Escape, Modifiers::NONE),
    (egui::Modifiers::NONE, egui::Key::Home, Key::Home, Modifiers::NONE),
    (egui::Modifiers::NONE, egui::Key::Num0, Key::Num0, Modifiers::NONE),
];

pub struct TourMapApp<L: SolverLink> {
    session: EditorSession<L>,
    /// City file opened at startup; "Save" writes back to it.
    file: Option<Utf8PathBuf>,
    last_frame: FrameStats,
    message: Option<String>,
}

impl<L: SolverLink> TourMapApp<L> {
    pub fn new(session: EditorSession<L>, file: Option<Utf8PathBuf>) -> Self {
        Self {
            session,
            file,
            last_frame: FrameStats::default(),
            message: None,
        }
    }

    pub fn session(&self) -> &EditorSession<L> {
        &self.session
    }

    /// Take the pending redraw. True when something changed after the panels
    /// were laid out, so the next frame has to show it.
    fn changed_during_frame(&mut self) -> bool {
        self.session.state_mut().take_redraw()
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        for (egui_mods, egui_key, key, modifiers) in BINDINGS {
            if ctx.input_mut(|i| i.consume_key(egui_mods, egui_key)) {
                self.session.handle(InputEvent::Key { key, modifiers });
            }
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let state = self.session.state();
            let (can_undo, can_redo, has_cities) =
                (state.can_undo(), state.can_redo(), !state.cities().is_empty());

            if ui.add_enabled(can_undo, egui::Button::new("↶ Undo")).clicked() {
                self.session.state_mut().undo();
            }
            if ui.add_enabled(can_redo, egui::Button::new("↷ Redo")).clicked() {
                self.session.state_mut().redo();
            }
            ui.separator();
            if ui.add_enabled(has_cities, egui::Button::new("Solve")).clicked() {
                self.session.request_solve();
            }
            if ui.button("Reset view").clicked() {
                self.session.state_mut().reset_view();
            }
            if let Some(path) = self.file.clone() {
                ui.separator();
                if ui.button("Save").clicked() {
                    self.message = Some(match self.session.state().cities().save_json(&path) {
                        Ok(()) => {
                            info!("saved cities to {path}");
                            format!("Saved {path}")
                        }
                        Err(e) => {
                            warn!("saving {path} failed: {e:#}");
                            format!("Save failed: {e}")
                        }
                    });
                }
            }
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        let state = self.session.state();
        ui.horizontal(|ui| {
            ui.label(format!("{} cities", state.cities().len()));
            ui.separator();
            ui.label(format!("solver {}", self.session.status().label()));
            ui.separator();
            ui.label(format!("zoom {:.0}%", state.viewport().scale() * 100.0));
            if let Some(tour) = state.tour() {
                ui.separator();
                ui.label(format!(
                    "tour: {} stops, {} legs drawn",
                    tour.len(),
                    self.last_frame.tour_segments
                ));
            }
            if let Some(message) = &self.message {
                ui.separator();
                ui.label(message);
            }
        });
    }

    /// Feed this frame's pointer and wheel input to the editor.
    fn handle_pointer(&mut self, ui: &egui::Ui, rect: Rect, hovered: bool) {
        let local = |pos: Pos2| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
        let events = ui.input(|i| i.events.clone());
        for event in events {
            let input = match event {
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if pressed && rect.contains(pos) {
                        Some(InputEvent::PointerDown { at: local(pos) })
                    } else if !pressed && !self.session.state().pointer().is_idle() {
                        Some(InputEvent::PointerUp { at: local(pos) })
                    } else {
                        None
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    let tracking = !self.session.state().pointer().is_idle();
                    (tracking || rect.contains(pos)).then(|| InputEvent::PointerMove { at: local(pos) })
                }
                egui::Event::PointerGone => Some(InputEvent::PointerLeave),
                _ => None,
            };
            if let Some(input) = input {
                self.session.handle(input);
            }
        }

        if hovered {
            let (scroll_y, hover) = ui.input(|i| (i.raw_scroll_delta.y, i.pointer.hover_pos()));
            if scroll_y.abs() > 0.0 {
                if let Some(pos) = hover {
                    // egui reports scrolling up as positive.
                    self.session.handle(InputEvent::Wheel {
                        at: local(pos),
                        delta_y: -scroll_y as f64,
                    });
                }
            }
            ui.ctx().set_cursor_icon(match self.session.state().cursor() {
                Cursor::Crosshair => CursorIcon::Crosshair,
                Cursor::Pointer => CursorIcon::PointingHand,
                Cursor::Grabbing => CursorIcon::Grabbing,
            });
        }
    }
}

impl<L: SolverLink> eframe::App for TourMapApp<L> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.tick();
        self.handle_keyboard_shortcuts(ctx);
        // This frame shows everything changed so far.
        self.changed_during_frame();

        egui::TopBottomPanel::top("tourmap_toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("tourmap_status").show(ctx, |ui| self.status_bar(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
                self.handle_pointer(ui, response.rect, response.hovered());

                let mut canvas = EguiCanvas::new(&painter, response.rect);
                self.last_frame = render_scene(self.session.state(), &mut canvas);
            });

        // Canvas input lands after the toolbar and status bar were drawn.
        if self.changed_during_frame() {
            ctx.request_repaint();
        }
    }
}
