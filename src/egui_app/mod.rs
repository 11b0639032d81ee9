//! Egui-based interactive city map editor (feature = "egui").
//!
//! [`TourMapApp`] translates egui input into editor events, ticks the solver
//! session once per frame and paints the scene through [`EguiCanvas`].

#![cfg(feature = "egui")]

mod painter;
mod ui;

pub use painter::EguiCanvas;
pub use ui::TourMapApp;
