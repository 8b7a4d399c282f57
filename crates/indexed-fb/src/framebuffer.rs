//! In-memory indexed-color framebuffer.

use core::convert::TryFrom;

use crate::{
    ColorIndex,
    surface::{BUFFER_SIZE, HEIGHT, WIDTH},
};

/// 8bpp indexed framebuffer, row-major (`index = y * WIDTH + x`).
#[derive(Clone)]
pub struct FrameBuffer {
    pixels: [ColorIndex; BUFFER_SIZE],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Creates a framebuffer filled with color index 0.
    pub const fn new() -> Self {
        Self {
            pixels: [0; BUFFER_SIZE],
        }
    }

    /// Returns the underlying pixel indices.
    pub fn pixels(&self) -> &[ColorIndex; BUFFER_SIZE] {
        &self.pixels
    }

    /// Fills the whole surface with one color index.
    pub fn clear(&mut self, color: ColorIndex) {
        self.pixels.fill(color);
    }

    /// Sets a pixel.
    ///
    /// Returns `true` when the pixel is in bounds, `false` otherwise. Rejected
    /// writes leave the buffer untouched.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: ColorIndex) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }

        self.pixels[y * WIDTH + x] = color;
        true
    }

    /// Signed variant of [`FrameBuffer::set_pixel`] for callers that draw with
    /// negative offsets (outlines at the surface edge).
    pub fn set_pixel_signed(&mut self, x: isize, y: isize, color: ColorIndex) -> bool {
        if x < 0 || y < 0 {
            return false;
        }

        self.set_pixel(x as usize, y as usize, color)
    }

    /// Reads a pixel.
    pub fn pixel(&self, x: usize, y: usize) -> Option<ColorIndex> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }

        Some(self.pixels[y * WIDTH + x])
    }

    /// Returns row `y` (0-based).
    pub fn row(&self, y: usize) -> Option<&[ColorIndex; WIDTH]> {
        if y >= HEIGHT {
            return None;
        }

        let start = y * WIDTH;
        <&[ColorIndex; WIDTH]>::try_from(&self.pixels[start..start + WIDTH]).ok()
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[ColorIndex]> {
        self.pixels.chunks_exact(WIDTH)
    }
}
