//! Hard wrapping and dimensional constants for the InputBox.
//!
//! Chat messages are a single logical line, so rows are cut wherever the
//! next character would overflow, not at word boundaries. Every character
//! is its own `textwrap` fragment with no whitespace, and first-fit wrapping
//! over those fragments gives the hard wrap. Row spans, rendering and cursor
//! placement all come from the same split so they never disagree.

use std::ops::Range;

use textwrap::core::{Fragment, display_width};
use textwrap::wrap_algorithms::wrap_first_fit;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible rows before internal scrolling kicks in
pub(super) const MAX_VISIBLE_ROWS: u16 = 3;
/// Offset from area edge to first content column (border + padding)
pub(super) const CONTENT_OFFSET_X: u16 = 2;
/// Offset from area edge to first content row (border)
pub(super) const CONTENT_OFFSET_Y: u16 = 1;

/// One character of the buffer as a wrapping fragment.
#[derive(Debug)]
struct Glyph {
    start: usize,
    end: usize,
    width: usize,
}

impl Fragment for Glyph {
    fn width(&self) -> f64 {
        self.width as f64
    }

    fn whitespace_width(&self) -> f64 {
        0.0
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

fn glyphs(text: &str) -> Vec<Glyph> {
    text.char_indices()
        .map(|(start, c)| {
            let end = start + c.len_utf8();
            Glyph {
                start,
                end,
                width: display_width(&text[start..end]),
            }
        })
        .collect()
}

/// Calculate the inner content width after subtracting border/padding overhead.
/// Returns 0 if the area is too narrow.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Byte ranges of the rows `text` wraps into at `width` columns.
/// Always returns at least one (possibly empty) row. A character wider than
/// the row still gets a row of its own.
fn row_spans(text: &str, width: u16) -> Vec<Range<usize>> {
    let glyphs = glyphs(text);
    let line_widths = [f64::from(width.max(1))];
    wrap_first_fit(&glyphs, &line_widths)
        .into_iter()
        .map(|row| match (row.first(), row.last()) {
            (Some(first), Some(last)) => first.start..last.end,
            _ => text.len()..text.len(),
        })
        .collect()
}

/// Split `text` into rows no wider than `width` columns.
pub(super) fn wrap_rows(text: &str, width: u16) -> Vec<&str> {
    row_spans(text, width)
        .into_iter()
        .map(|span| &text[span])
        .collect()
}

/// Row and column of the cursor at byte offset `pos`.
/// A cursor right after a full row sits at the start of the next row.
pub(super) fn cursor_cell(text: &str, pos: usize, width: u16) -> (u16, u16) {
    let spans = row_spans(text, width);
    let row = spans
        .iter()
        .position(|span| pos < span.end)
        .unwrap_or(spans.len().saturating_sub(1));
    let start = spans.get(row).map_or(0, |span| span.start.min(pos));
    let col = display_width(&text[start..pos]);
    if col >= width.max(1) as usize {
        return (row as u16 + 1, 0);
    }
    (row as u16, col as u16)
}

/// Rows needed to show `text` with the cursor parked at its end.
pub(super) fn row_count(text: &str, width: u16) -> u16 {
    let rows = row_spans(text, width).len() as u16;
    let (cursor_row, _) = cursor_cell(text, text.len(), width);
    rows.max(cursor_row + 1)
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
