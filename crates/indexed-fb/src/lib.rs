#![cfg_attr(not(test), no_std)]

//! Fixed 256x256 indexed-color framebuffer primitives.

mod framebuffer;
pub mod surface;

#[cfg(feature = "embedded-graphics")]
mod graphics;

pub use framebuffer::FrameBuffer;
pub use surface::{Palette, Rgb};

/// Color index stored per pixel. Hosts resolve it through a [`Palette`].
pub type ColorIndex = u8;

#[cfg(feature = "embedded-graphics")]
pub use graphics::PaletteIndex;
