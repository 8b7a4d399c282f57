//! Platform-agnostic core of the grotto narrative adventure: BDF font
//! parsing, glyph rasterization, scrollback layout, and the dialog state
//! machine that sequences narrator and player turns.

pub mod config;
pub mod dialog;
pub mod font;
pub mod input;
pub mod layout;
pub mod render;
pub mod text_policy;
