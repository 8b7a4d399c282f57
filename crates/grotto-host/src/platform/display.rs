//! Frame presentation for terminal hosts.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    primitives::Rectangle,
};
use grotto_core::{dialog::GameMode, layout::TextLine};
use indexed_fb::{
    ColorIndex, FrameBuffer, PaletteIndex, Palette,
    surface::{self, HEIGHT, WIDTH},
};
use log::debug;

const FRAME_COLOR: ColorIndex = 5;

/// Draws a one-pixel window frame around the surface.
pub fn draw_window_frame(frame: &mut FrameBuffer) {
    let w = WIDTH as u32;
    let h = HEIGHT as u32;
    let edges = [
        Rectangle::new(Point::new(0, 0), Size::new(w, 1)),
        Rectangle::new(Point::new(0, h as i32 - 1), Size::new(w, 1)),
        Rectangle::new(Point::new(0, 0), Size::new(1, h)),
        Rectangle::new(Point::new(w as i32 - 1, 0), Size::new(1, h)),
    ];

    for edge in &edges {
        let _ = frame.fill_solid(edge, PaletteIndex(FRAME_COLOR));
    }
}

/// Writes a binary PPM (P6) of the frame.
pub fn write_ppm<W: Write>(out: &mut W, frame: &FrameBuffer, palette: &Palette) -> io::Result<()> {
    write!(out, "P6\n{WIDTH} {HEIGHT}\n255\n")?;
    for row in frame.rows() {
        let rgb = surface::expand_row(row, palette)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "short framebuffer row"))?;
        out.write_all(&rgb)?;
    }
    out.flush()
}

/// Echoes the scrollback to stdout and optionally snapshots the frame.
pub struct TerminalPresenter {
    palette: Palette,
    frame_out: Option<PathBuf>,
}

impl TerminalPresenter {
    pub fn new(frame_out: Option<PathBuf>) -> Self {
        Self {
            palette: Palette::default(),
            frame_out,
        }
    }

    pub fn present<'l, I>(
        &mut self,
        frame: &FrameBuffer,
        lines: I,
        mode: &GameMode,
    ) -> io::Result<()>
    where
        I: IntoIterator<Item = &'l TextLine>,
    {
        if let Some(path) = &self.frame_out {
            let mut out = BufWriter::new(File::create(path)?);
            write_ppm(&mut out, frame, &self.palette)?;
            debug!("frame written to {}", path.display());
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}", "-".repeat(24))?;
        for line in lines {
            writeln!(out, "{}", line.as_str())?;
        }
        match mode {
            GameMode::AwaitingAction => write!(out, "> ")?,
            GameMode::Ended(_) | GameMode::Failed(_) => write!(out, "(q to quit) ")?,
            GameMode::AwaitingNarration | GameMode::WaitingForNarration => {}
        }
        out.flush()
    }
}
