//! Fixed-size terminal text box.
//!
//! Lays text out in monospace cells with greedy word wrapping and reports
//! whether it spills past the box. Widths come from `unicode-width`, so wide
//! CJK and emoji count as two cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::oracle::Container;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxSize {
    /// Columns, in terminal cells
    pub width: usize,
    /// Rows
    pub height: usize,
}

impl BoxSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Visual width of `s` in terminal cells.
pub fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Greedy word wrap of `text` into rows at most `width` cells wide.
///
/// Whitespace runs collapse to one space, `\n` forces a new row and a word
/// wider than `width` is broken between characters. A single character wider
/// than `width` still gets a row of its own, so callers must check row widths
/// as well as the row count. Blank text yields no rows.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    if text.trim().is_empty() {
        return rows;
    }

    for paragraph in text.trim().split('\n') {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = visual_width(word);
            if !current.is_empty() && current_width + 1 + word_width <= width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
                continue;
            }
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
            } else {
                // Hard break; the tail stays open so the next word can join it.
                let (mut pieces, tail, tail_width) = break_word(word, width);
                rows.append(&mut pieces);
                current = tail;
                current_width = tail_width;
            }
        }

        rows.push(current);
    }

    rows
}

/// Splits a word into full rows plus a trailing partial row.
fn break_word(word: &str, width: usize) -> (Vec<String>, String, usize) {
    let mut pieces = Vec::new();
    let mut chunk = String::new();
    let mut chunk_width = 0;

    for c in word.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if !chunk.is_empty() && chunk_width + cw > width {
            pieces.push(std::mem::take(&mut chunk));
            chunk_width = 0;
        }
        chunk.push(c);
        chunk_width += cw;
    }

    (pieces, chunk, chunk_width)
}

/// Does `text` overflow a box of `size`?
pub fn overflows(text: &str, size: BoxSize) -> bool {
    let rows = wrap_lines(text, size.width);
    rows.len() > size.height || rows.iter().any(|row| visual_width(row) > size.width)
}

/// In-memory text box used as the overflow oracle's rendering surface.
#[derive(Debug, Clone)]
pub struct TextBox {
    content: String,
    size: BoxSize,
}

impl TextBox {
    pub fn new(size: BoxSize) -> Self {
        Self {
            content: String::new(),
            size,
        }
    }

    pub fn with_content(size: BoxSize, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            size,
        }
    }

    /// Laid-out rows of the current content, clipped to the box height.
    pub fn rows(&self) -> Vec<String> {
        let mut rows = wrap_lines(&self.content, self.size.width);
        rows.truncate(self.size.height);
        rows
    }
}

impl Container for TextBox {
    fn content(&self) -> &str {
        &self.content
    }

    fn replace_content(&mut self, content: String) -> String {
        std::mem::replace(&mut self.content, content)
    }

    fn is_overflowing(&self) -> bool {
        overflows(&self.content, self.size)
    }
}
