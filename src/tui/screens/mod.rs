//! Screen rendering and input handling.

mod editor;

pub use editor::{EditorScreen, Outcome};
