//! Terminal user interface for reckon.
//!
//! ## Entry points
//!
//! - [`editor::EditorView`] — the full-screen estimation list editor.

pub mod editor;
