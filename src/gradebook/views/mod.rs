//! # Views Module
//!
//! Rendering of UI state snapshots for the terminal front end.

pub mod labels;
pub mod text_renderer;

pub use labels::{selection_label, Labeled};
pub use text_renderer::{TextRenderer, ViewRenderer};
