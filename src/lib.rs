//! Interactive city map editor for tour planning.
//!
//! Cities are placed on a pannable, zoomable plane; the crate keeps their
//! pairwise distance matrix up to date, sends it to an external tour solver
//! over a WebSocket and shows the tour the solver sends back.
//!
//! The binary `tourmap` offers the matrix and a one-shot solve from the
//! command line; `tourmap-editor` (feature `egui`) is the interactive editor.

pub mod config;
pub mod editor;
pub mod error;
pub mod matrix;
pub mod model;
pub mod render;
pub mod solver;
pub mod viewport;

// Optional GUI/egui functionality lives behind the `egui` feature flag.
#[cfg(feature = "egui")]
pub mod egui_app;

pub use config::{EditorConfig, StaleTourPolicy};
pub use editor::{EditorSession, EditorState, InputEvent};
pub use error::{SolverError, SolverResult};
pub use matrix::DistanceMatrix;
pub use model::{City, CitySet, Point, Tour};
pub use viewport::Viewport;
