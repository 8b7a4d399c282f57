//! BDF bitmap font parsing.
//!
//! Only the records needed to rasterize glyphs are interpreted: `ENCODING`,
//! `BBX`, `BITMAP`, the hex rows that follow it, and `ENDCHAR`. Everything
//! else in the file (properties, `STARTCHAR` names, metrics) is skipped.
//!
//! Rows are stored with the leftmost pixel in bit 0. BDF writes rows
//! most-significant-bit first, so every row is bit-reversed within its
//! declared hex width while reading.

use core::fmt;
use std::{
    collections::HashMap,
    io::{self, BufRead},
};

use heapless::Vec as HeaplessVec;
use log::debug;

/// Tallest glyph the table can hold.
pub const MAX_GLYPH_ROWS: usize = 64;
/// Widest glyph (and widest hex row) the table can hold.
pub const MAX_GLYPH_WIDTH: usize = 64;

/// One rasterizable glyph.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Glyph {
    pub width: u8,
    pub height: u8,
    /// Bounding-box offsets as declared by `BBX`. Not used for rasterizing.
    pub x_offset: i16,
    pub y_offset: i16,
    /// One bitmask per row, `rows.len() == height`, bit 0 is the leftmost column.
    pub rows: HeaplessVec<u64, MAX_GLYPH_ROWS>,
}

impl Glyph {
    /// Whether the pixel at (`col`, `row`) is inked.
    #[inline]
    pub fn is_set(&self, col: usize, row: usize) -> bool {
        if col >= self.width as usize {
            return false;
        }

        self.rows
            .get(row)
            .is_some_and(|bits| (bits >> col) & 1 == 1)
    }

    /// Horizontal cursor advance used by the text renderer.
    #[inline]
    pub fn advance(&self) -> usize {
        self.width as usize + 1
    }
}

/// Immutable code point to glyph mapping.
#[derive(Clone, Debug, Default)]
pub struct GlyphTable {
    glyphs: HashMap<u32, Glyph>,
}

impl GlyphTable {
    /// Parses a BDF source from any buffered reader.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, FontError> {
        let mut parser = Parser::default();

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line =
                line.map_err(|err| FontError::new(line_no, FontErrorKind::Io(err.kind())))?;
            parser.feed(line_no, &line)?;
        }

        if parser.rows.is_some() {
            debug!("font: stream ended inside BITMAP for code {:?}", parser.code);
        }

        debug!("font: parsed {} glyphs", parser.glyphs.len());
        Ok(Self {
            glyphs: parser.glyphs,
        })
    }

    /// Parses a BDF source held in memory.
    pub fn parse_str(source: &str) -> Result<Self, FontError> {
        Self::parse(io::Cursor::new(source))
    }

    pub fn get(&self, code_point: u32) -> Option<&Glyph> {
        self.glyphs.get(&code_point)
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.get(c as u32)
    }

    pub fn contains(&self, c: char) -> bool {
        self.glyphs.contains_key(&(c as u32))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Parse failure, tagged with the 1-based source line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FontError {
    pub line: usize,
    pub kind: FontErrorKind,
}

impl FontError {
    const fn new(line: usize, kind: FontErrorKind) -> Self {
        Self { line, kind }
    }

    /// Record keyword the error was raised on.
    pub fn record(&self) -> &'static str {
        match self.kind {
            FontErrorKind::InvalidEncoding => "ENCODING",
            FontErrorKind::InvalidBoundingBox => "BBX",
            FontErrorKind::BitmapWithoutBbx => "BITMAP",
            FontErrorKind::InvalidHex | FontErrorKind::RowTooWide { .. } => "bitmap row",
            FontErrorKind::RowCountMismatch { .. } => "ENDCHAR",
            FontErrorKind::Io(_) => "source",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FontErrorKind {
    /// `ENCODING` operand is not an integer.
    InvalidEncoding,
    /// `BBX` does not carry four integer operands.
    InvalidBoundingBox,
    /// `BITMAP` opened before any `BBX` for the current glyph.
    BitmapWithoutBbx,
    /// Bitmap row is not a hexadecimal string.
    InvalidHex,
    /// Bitmap row has more hex digits than fit in a row mask.
    RowTooWide { digits: usize },
    /// Number of bitmap rows disagrees with the `BBX` height.
    RowCountMismatch { expected: u8, found: usize },
    /// Reading the source failed.
    Io(io::ErrorKind),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: ", self.line, self.record())?;
        match self.kind {
            FontErrorKind::InvalidEncoding => f.write_str("code point is not an integer"),
            FontErrorKind::InvalidBoundingBox => f.write_str("expected four integer operands"),
            FontErrorKind::BitmapWithoutBbx => f.write_str("no bounding box before bitmap"),
            FontErrorKind::InvalidHex => f.write_str("row is not hexadecimal"),
            FontErrorKind::RowTooWide { digits } => write!(f, "{digits} hex digits is too wide"),
            FontErrorKind::RowCountMismatch { expected, found } => {
                write!(f, "expected {expected} rows, found {found}")
            }
            FontErrorKind::Io(kind) => write!(f, "{kind}"),
        }
    }
}

impl std::error::Error for FontError {}

#[derive(Clone, Copy, Debug)]
struct BoundingBox {
    width: u8,
    height: u8,
    x_offset: i16,
    y_offset: i16,
}

#[derive(Default)]
struct Parser {
    glyphs: HashMap<u32, Glyph>,
    code: Option<i64>,
    bbx: Option<BoundingBox>,
    rows: Option<HeaplessVec<u64, MAX_GLYPH_ROWS>>,
    /// Current glyph is larger than a row mask holds; its bitmap is ignored.
    oversized: bool,
}

impl Parser {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), FontError> {
        let mut fields = line.split_whitespace();

        match fields.next() {
            Some("ENCODING") => {
                let code = fields
                    .next()
                    .and_then(|field| field.parse::<i64>().ok())
                    .ok_or(FontError::new(line_no, FontErrorKind::InvalidEncoding))?;
                self.code = Some(code);
            }
            Some("BBX") => {
                self.bbx = parse_bbx(line_no, fields)?;
                self.oversized = self.bbx.is_none();
                if self.oversized {
                    debug!("font: skipping oversized glyph {:?} at line {line_no}", self.code);
                }
            }
            Some("BITMAP") => {
                if self.oversized {
                    return Ok(());
                }
                if self.bbx.is_none() {
                    return Err(FontError::new(line_no, FontErrorKind::BitmapWithoutBbx));
                }
                self.rows = Some(HeaplessVec::new());
            }
            Some("ENDCHAR") => self.end_char(line_no)?,
            _ => {
                if let Some(rows) = self.rows.as_mut() {
                    // BITMAP cannot open without a BBX.
                    let height = self.bbx.map_or(0, |bbx| bbx.height);
                    let mask = parse_row(line_no, line.trim())?;
                    if rows.len() >= height as usize {
                        return Err(FontError::new(
                            line_no,
                            FontErrorKind::RowCountMismatch {
                                expected: height,
                                found: rows.len() + 1,
                            },
                        ));
                    }
                    let _ = rows.push(mask);
                }
            }
        }

        Ok(())
    }

    fn end_char(&mut self, line_no: usize) -> Result<(), FontError> {
        let code = self.code.take();
        let bbx = self.bbx.take();
        self.oversized = false;
        let Some(rows) = self.rows.take() else {
            debug!("font: ENDCHAR without BITMAP at line {line_no}");
            return Ok(());
        };
        let Some(bbx) = bbx else {
            return Ok(());
        };

        if rows.len() != bbx.height as usize {
            return Err(FontError::new(
                line_no,
                FontErrorKind::RowCountMismatch {
                    expected: bbx.height,
                    found: rows.len(),
                },
            ));
        }

        let Some(code) = code.and_then(|code| u32::try_from(code).ok()) else {
            debug!("font: skipping unencoded glyph ending at line {line_no}");
            return Ok(());
        };

        self.glyphs.insert(
            code,
            Glyph {
                width: bbx.width,
                height: bbx.height,
                x_offset: bbx.x_offset,
                y_offset: bbx.y_offset,
                rows,
            },
        );
        Ok(())
    }
}

/// Returns `None` for a box wider or taller than [`Glyph`] can store.
fn parse_bbx<'a>(
    line_no: usize,
    mut fields: impl Iterator<Item = &'a str>,
) -> Result<Option<BoundingBox>, FontError> {
    let mut values = [0i64; 4];
    for value in &mut values {
        *value = fields
            .next()
            .and_then(|field| field.parse::<i64>().ok())
            .ok_or(FontError::new(line_no, FontErrorKind::InvalidBoundingBox))?;
    }

    let [width, height, x_offset, y_offset] = values;
    let invalid = || FontError::new(line_no, FontErrorKind::InvalidBoundingBox);
    if width < 0 || height < 0 {
        return Err(invalid());
    }
    if width > MAX_GLYPH_WIDTH as i64 || height > MAX_GLYPH_ROWS as i64 {
        return Ok(None);
    }

    let x_offset = i16::try_from(x_offset).map_err(|_| invalid())?;
    let y_offset = i16::try_from(y_offset).map_err(|_| invalid())?;

    Ok(Some(BoundingBox {
        width: width as u8,
        height: height as u8,
        x_offset,
        y_offset,
    }))
}

/// Converts one hex row into an LSB-leftmost mask.
fn parse_row(line_no: usize, hex: &str) -> Result<u64, FontError> {
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FontError::new(line_no, FontErrorKind::InvalidHex));
    }

    let digits = hex.len();
    if digits * 4 > MAX_GLYPH_WIDTH {
        return Err(FontError::new(line_no, FontErrorKind::RowTooWide { digits }));
    }

    let value = u64::from_str_radix(hex, 16)
        .map_err(|_| FontError::new(line_no, FontErrorKind::InvalidHex))?;
    Ok(reverse_row(value, digits as u32 * 4))
}

/// Reverses the low `bits` bits of `value`.
#[inline]
fn reverse_row(value: u64, bits: u32) -> u64 {
    value.reverse_bits() >> (u64::BITS - bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER_A: &str = "\
STARTFONT 2.1
FONT -misc-test
SIZE 8 75 75
FONTBOUNDINGBOX 8 8 0 0
CHARS 1
STARTCHAR A
ENCODING 65
SWIDTH 500 0
DWIDTH 8 0
BBX 8 8 0 -1
BITMAP
18
24
42
42
7E
42
42
00
ENDCHAR
ENDFONT
";

    #[test]
    fn parses_glyph_with_reversed_rows() {
        let table = GlyphTable::parse_str(LETTER_A).unwrap();
        let glyph = table.get(65).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(glyph.width, 8);
        assert_eq!(glyph.height, 8);
        assert_eq!(glyph.y_offset, -1);

        let source = [0x18u8, 0x24, 0x42, 0x42, 0x7E, 0x42, 0x42, 0x00];
        let expected: Vec<u64> = source.iter().map(|b| b.reverse_bits() as u64).collect();
        assert_eq!(glyph.rows.as_slice(), expected.as_slice());
    }

    #[test]
    fn leftmost_source_bit_becomes_bit_zero() {
        let table = GlyphTable::parse_str("ENCODING 1\nBBX 4 1 0 0\nBITMAP\n80\nENDCHAR\n").unwrap();
        let glyph = table.get(1).unwrap();

        assert_eq!(glyph.rows[0], 0b0000_0001);
        assert!(glyph.is_set(0, 0));
        assert!(!glyph.is_set(1, 0));
    }

    #[test]
    fn reversal_spans_the_full_hex_width() {
        let table =
            GlyphTable::parse_str("ENCODING 2\nBBX 12 1 0 0\nBITMAP\n0010\nENDCHAR\n").unwrap();

        // 0x0010 over 16 bits: bit 4 set -> reversed to bit 11.
        assert_eq!(table.get(2).unwrap().rows[0], 1 << 11);
    }

    #[test]
    fn invalid_hex_row_names_its_line() {
        let err = GlyphTable::parse_str("ENCODING 65\nBBX 8 1 0 0\nBITMAP\nZZ\nENDCHAR\n")
            .unwrap_err();

        assert_eq!(err.line, 4);
        assert_eq!(err.kind, FontErrorKind::InvalidHex);
        assert_eq!(err.record(), "bitmap row");
    }

    #[test]
    fn bitmap_without_bbx_is_rejected() {
        let err = GlyphTable::parse_str("ENCODING 65\nBITMAP\n00\nENDCHAR\n").unwrap_err();

        assert_eq!(err.line, 2);
        assert_eq!(err.kind, FontErrorKind::BitmapWithoutBbx);
    }

    #[test]
    fn bounding_box_does_not_carry_over_between_glyphs() {
        let source = "ENCODING 65\nBBX 8 1 0 0\nBITMAP\n00\nENDCHAR\nENCODING 66\nBITMAP\n";
        let err = GlyphTable::parse_str(source).unwrap_err();

        assert_eq!(err.kind, FontErrorKind::BitmapWithoutBbx);
        assert_eq!(err.line, 7);
    }

    #[test]
    fn unterminated_glyph_is_absent() {
        let source = "ENCODING 65\nBBX 8 1 0 0\nBITMAP\n00\nENDCHAR\nENCODING 66\nBBX 8 1 0 0\n";
        let table = GlyphTable::parse_str(source).unwrap();

        assert!(table.contains('A'));
        assert!(!table.contains('B'));
    }

    #[test]
    fn row_count_must_match_height() {
        let err = GlyphTable::parse_str("ENCODING 65\nBBX 8 2 0 0\nBITMAP\n00\nENDCHAR\n")
            .unwrap_err();

        assert_eq!(
            err.kind,
            FontErrorKind::RowCountMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn unencoded_glyphs_are_skipped() {
        let table =
            GlyphTable::parse_str("ENCODING -1\nBBX 1 1 0 0\nBITMAP\n80\nENDCHAR\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_bbx_is_rejected() {
        let err = GlyphTable::parse_str("ENCODING 65\nBBX 8 x 0 0\n").unwrap_err();
        assert_eq!(err.kind, FontErrorKind::InvalidBoundingBox);

        let err = GlyphTable::parse_str("ENCODING 65\nBBX -1 8 0 0\n").unwrap_err();
        assert_eq!(err.kind, FontErrorKind::InvalidBoundingBox);
    }

    #[test]
    fn oversized_glyph_is_skipped_and_parsing_continues() {
        let source = "\
ENCODING 65
BBX 80 1 0 0
BITMAP
00000000000000000000
ENDCHAR
ENCODING 66
BBX 4 1 0 0
BITMAP
80
ENDCHAR
";
        let table = GlyphTable::parse_str(source).unwrap();

        assert!(!table.contains('A'));
        assert_eq!(table.glyph('B').unwrap().rows[0], 1);
    }

    #[test]
    fn display_includes_line_and_record() {
        let err = GlyphTable::parse_str("ENCODING abc\n").unwrap_err();
        assert_eq!(err.to_string(), "line 1: ENCODING: code point is not an integer");
    }
}
