//! Interactive city map editor.
//!
//! - **Input**: toolkit-independent pointer, wheel and key events
//! - **Gestures**: click-vs-drag disambiguation with a pixel threshold
//! - **Hit-testing**: zoom-independent clickable radius around each city
//! - **Undo/Redo**: bounded snapshot history of the city set
//! - **Solver sync**: solve requests out, tour updates in, stale tours dropped

pub mod input;
pub mod operations;
pub mod selection;
pub mod session;
pub mod state;

pub use input::{Cursor, InputEvent, Key, KeyCommand, Modifiers, PointerState};
pub use operations::EditorHistory;
pub use selection::{hit_test, world_tolerance};
pub use session::EditorSession;
pub use state::EditorState;
