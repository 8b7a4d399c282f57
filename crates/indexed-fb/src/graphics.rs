use core::convert::Infallible;

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::{PixelColor, raw::RawU8},
};

use crate::{ColorIndex, FrameBuffer, surface};

/// Palette index usable as an `embedded-graphics` color.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PaletteIndex(pub ColorIndex);

impl PixelColor for PaletteIndex {
    type Raw = RawU8;
}

impl DrawTarget for FrameBuffer {
    type Color = PaletteIndex;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let _ = self.set_pixel_signed(point.x as isize, point.y as isize, color.0);
        }

        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(surface::WIDTH as u32, surface::HEIGHT as u32)
    }
}
