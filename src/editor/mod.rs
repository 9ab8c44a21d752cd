//! Editor module for markport
//!
//! Holds the document being edited and drives preview and export from it.

mod state;

pub use state::{EditorState, DEFAULT_CONTENT};
