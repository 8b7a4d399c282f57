use indexed_fb::{ColorIndex, FrameBuffer};

use crate::font::{Glyph, GlyphTable};

/// Offsets stamped in the border color to outline a glyph.
pub const BORDER_DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Writes every inked pixel of `glyph` with its top-left corner at (`x`, `y`).
///
/// Pixels falling off the surface are dropped by the framebuffer.
pub fn draw_glyph(frame: &mut FrameBuffer, x: isize, y: isize, glyph: &Glyph, color: ColorIndex) {
    for (row, bits) in glyph.rows.iter().enumerate().take(glyph.height as usize) {
        if *bits == 0 {
            continue;
        }

        let py = y + row as isize;
        for col in 0..glyph.width as usize {
            if (bits >> col) & 1 != 0 {
                let _ = frame.set_pixel_signed(x + col as isize, py, color);
            }
        }
    }
}

/// Text rasterizer over a parsed glyph table.
#[derive(Clone, Copy, Debug)]
pub struct GlyphRenderer<'a> {
    table: &'a GlyphTable,
}

impl<'a> GlyphRenderer<'a> {
    pub const fn new(table: &'a GlyphTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a GlyphTable {
        self.table
    }

    /// Draws `text` left to right and returns the cursor x after the last glyph.
    ///
    /// With `border` set, each glyph is first stamped at the eight neighbouring
    /// offsets in the border color. Characters missing from the table are
    /// skipped without advancing.
    pub fn draw_text(
        &self,
        frame: &mut FrameBuffer,
        x: isize,
        y: isize,
        text: &str,
        color: ColorIndex,
        border: Option<ColorIndex>,
    ) -> isize {
        let mut cursor_x = x;

        for c in text.chars() {
            let Some(glyph) = self.table.glyph(c) else {
                continue;
            };

            if let Some(border) = border {
                for (dx, dy) in BORDER_DIRECTIONS {
                    draw_glyph(frame, cursor_x + dx, y + dy, glyph, border);
                }
            }
            draw_glyph(frame, cursor_x, y, glyph, color);
            cursor_x += glyph.advance() as isize;
        }

        cursor_x
    }

    /// Pixel advance of `text`, counting only glyphs present in the table.
    pub fn text_width(&self, text: &str) -> usize {
        text.chars()
            .filter_map(|c| self.table.glyph(c))
            .map(Glyph::advance)
            .sum()
    }
}
