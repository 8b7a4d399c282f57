//! Bounded scrollback with column wrapping.
//!
//! Text streams in one character at a time against the last (open) line. A
//! line wraps once it holds `max_line_width` characters, except that no-break
//! punctuation may hang one column past the limit so a sentence never starts
//! with `。` or `、`. Only the newest `max_visible_rows` lines are kept.

use std::collections::VecDeque;

use crate::text_policy::{LINE_BREAK, NO_BREAK_PUNCTUATION, is_no_break};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LayoutConfig {
    /// Wrap width in characters.
    pub max_line_width: usize,
    /// Lines kept in the scrollback.
    pub max_visible_rows: usize,
    pub no_break: &'static [char],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_line_width: 22,
            max_visible_rows: 16,
            no_break: NO_BREAK_PUNCTUATION,
        }
    }
}

impl LayoutConfig {
    pub const fn with_max_line_width(mut self, max_line_width: usize) -> Self {
        self.max_line_width = max_line_width;
        self
    }

    pub const fn with_max_visible_rows(mut self, max_visible_rows: usize) -> Self {
        self.max_visible_rows = max_visible_rows;
        self
    }

    pub const fn with_no_break(mut self, no_break: &'static [char]) -> Self {
        self.no_break = no_break;
        self
    }
}

/// One wrapped line. Length is counted in characters.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TextLine {
    text: String,
    chars: usize,
}

impl TextLine {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.chars == 0
    }

    fn push(&mut self, c: char) {
        self.text.push(c);
        self.chars += 1;
    }
}

#[derive(Clone, Debug)]
pub struct TextLayoutBuffer {
    config: LayoutConfig,
    lines: VecDeque<TextLine>,
}

impl Default for TextLayoutBuffer {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl TextLayoutBuffer {
    pub fn new(config: LayoutConfig) -> Self {
        let config = LayoutConfig {
            max_visible_rows: config.max_visible_rows.max(1),
            ..config
        };
        let mut buffer = Self {
            config,
            lines: VecDeque::with_capacity(config.max_visible_rows + 1),
        };
        buffer.clear();
        buffer
    }

    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// Drops all lines, leaving one empty open line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.lines.push_back(TextLine::default());
    }

    /// Streams `text` into the scrollback.
    pub fn append(&mut self, text: &str) {
        for c in text.chars() {
            if c == LINE_BREAK {
                self.start_line();
                continue;
            }

            let open_full = self
                .lines
                .back()
                .is_some_and(|line| line.chars >= self.config.max_line_width);
            if open_full && !is_no_break(c, self.config.no_break) {
                self.start_line();
            }

            if let Some(line) = self.lines.back_mut() {
                line.push(c);
            }
        }
    }

    /// Newest lines, oldest first.
    pub fn visible_lines(&self) -> impl ExactSizeIterator<Item = &TextLine> + '_ {
        let skip = self.lines.len().saturating_sub(self.config.max_visible_rows);
        self.lines.range(skip..)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn start_line(&mut self) {
        self.lines.push_back(TextLine::default());
        while self.lines.len() > self.config.max_visible_rows {
            self.lines.pop_front();
        }
    }
}
