//! Frame composition: glyph rasterizing and the scrollback scene.

mod glyph;

pub use glyph::{BORDER_DIRECTIONS, GlyphRenderer, draw_glyph};

use indexed_fb::{ColorIndex, FrameBuffer};

use crate::layout::TextLine;

/// Placement and colors of the scrollback on screen.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SceneStyle {
    pub background: ColorIndex,
    pub origin_x: isize,
    pub origin_y: isize,
    /// Vertical distance between consecutive baselines.
    pub line_pitch: isize,
    pub text_color: ColorIndex,
    pub border_color: Option<ColorIndex>,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            background: 0,
            origin_x: 2,
            origin_y: 16,
            line_pitch: 14,
            text_color: 7,
            border_color: Some(0),
        }
    }
}

impl SceneStyle {
    pub const fn with_colors(
        mut self,
        text_color: ColorIndex,
        border_color: Option<ColorIndex>,
    ) -> Self {
        self.text_color = text_color;
        self.border_color = border_color;
        self
    }

    pub const fn with_origin(mut self, origin_x: isize, origin_y: isize) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }
}

/// Redraws the whole frame from the visible scrollback lines.
pub fn draw_scene<'l, I>(
    frame: &mut FrameBuffer,
    renderer: &GlyphRenderer<'_>,
    lines: I,
    style: &SceneStyle,
) where
    I: IntoIterator<Item = &'l TextLine>,
{
    frame.clear(style.background);

    for (row, line) in lines.into_iter().enumerate() {
        if line.is_empty() {
            continue;
        }

        let y = style.origin_y + row as isize * style.line_pitch;
        renderer.draw_text(
            frame,
            style.origin_x,
            y,
            line.as_str(),
            style.text_color,
            style.border_color,
        );
    }
}
