//! Surface geometry and palette resolution for presenting a [`FrameBuffer`].
//!
//! [`FrameBuffer`]: crate::FrameBuffer

use crate::ColorIndex;

/// Surface width in pixels.
pub const WIDTH: usize = 256;
/// Surface height in pixels.
pub const HEIGHT: usize = 256;
/// Total framebuffer size, one byte per pixel.
pub const BUFFER_SIZE: usize = WIDTH * HEIGHT;
/// Number of palette entries addressable by the host presenter.
pub const PALETTE_SIZE: usize = 16;
/// Bytes in one RGB-expanded row.
pub const RGB_LINE_BYTES: usize = WIDTH * 3;

/// 24-bit color.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn from_hex(value: u32) -> Self {
        Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }
}

/// Index to color mapping used when a frame is handed to the host.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Palette {
    colors: [Rgb; PALETTE_SIZE],
}

impl Default for Palette {
    /// The classic 16-color fantasy-console palette.
    fn default() -> Self {
        const HEX: [u32; PALETTE_SIZE] = [
            0x000000, 0x2B335F, 0x7E2072, 0x19959C, 0x8B4852, 0x395C98, 0xA9C1FF, 0xEEEEEE,
            0xD4186C, 0xD38441, 0xE9C35B, 0x70C6A9, 0x7696DE, 0xA3A3A3, 0xFF9798, 0xEDC7B0,
        ];

        let mut colors = [Rgb::default(); PALETTE_SIZE];
        for (slot, hex) in colors.iter_mut().zip(HEX) {
            *slot = Rgb::from_hex(hex);
        }
        Self { colors }
    }
}

impl Palette {
    pub const fn new(colors: [Rgb; PALETTE_SIZE]) -> Self {
        Self { colors }
    }

    /// Resolves an index. Indices past the palette wrap around.
    #[inline]
    pub fn resolve(&self, index: ColorIndex) -> Rgb {
        self.colors[index as usize % PALETTE_SIZE]
    }
}

/// Expands one row of color indices into packed RGB bytes.
///
/// Returns `None` when `row` is not a full surface row.
pub fn expand_row(row: &[ColorIndex], palette: &Palette) -> Option<[u8; RGB_LINE_BYTES]> {
    if row.len() != WIDTH {
        return None;
    }

    let mut out = [0u8; RGB_LINE_BYTES];
    for (chunk, &index) in out.chunks_exact_mut(3).zip(row) {
        let rgb = palette.resolve(index);
        chunk[0] = rgb.r;
        chunk[1] = rgb.g;
        chunk[2] = rgb.b;
    }
    Some(out)
}
