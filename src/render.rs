//! ASCII preview of one plate for the CLI's `--layout` flag.
//!
//! Waste regions are filled with `.` so offcuts stand out from the pieces,
//! which are outlined and labelled with their as-placed size.

use crate::types::{Layout, PlacedPiece, Rect};

const COLS: f64 = 80.0;
const ROWS: f64 = 40.0;

/// Grid cells covering a plate-space rectangle, edges inclusive.
#[derive(Debug, Clone, Copy)]
struct Span {
    left: usize,
    top: usize,
    right: usize,
    bottom: usize,
}

impl Span {
    fn is_flat(&self) -> bool {
        self.left == self.right || self.top == self.bottom
    }
}

struct Canvas {
    cells: Vec<Vec<char>>,
    scale: f64,
}

impl Canvas {
    /// `None` when the plate collapses to a line at preview scale.
    fn new(plate: Rect) -> Option<Self> {
        let scale = f64::min(COLS / plate.width as f64, ROWS / plate.height as f64);
        let cols = (plate.width as f64 * scale).round() as usize;
        let rows = (plate.height as f64 * scale).round() as usize;
        if cols == 0 || rows == 0 {
            return None;
        }
        Some(Self {
            cells: vec![vec![' '; cols + 1]; rows + 1],
            scale,
        })
    }

    fn at(&self, v: u64) -> usize {
        (v as f64 * self.scale).round() as usize
    }

    fn span(&self, x: u64, y: u64, size: Rect) -> Span {
        Span {
            left: self.at(x),
            top: self.at(y),
            right: self.at(x.saturating_add(size.width)),
            bottom: self.at(y.saturating_add(size.height)),
        }
    }

    fn shade(&mut self, span: Span) {
        for row in span.top..=span.bottom {
            for col in span.left..=span.right {
                if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
                    *cell = '.';
                }
            }
        }
    }

    fn outline(&mut self, span: Span) {
        for col in span.left..=span.right {
            self.stroke(col, span.top, '-');
            self.stroke(col, span.bottom, '-');
        }
        for row in span.top..=span.bottom {
            self.stroke(span.left, row, '|');
            self.stroke(span.right, row, '|');
        }
        for (col, row) in [
            (span.left, span.top),
            (span.right, span.top),
            (span.left, span.bottom),
            (span.right, span.bottom),
        ] {
            self.stroke(col, row, '+');
        }
    }

    /// Marks one edge cell; where edges cross the cell becomes `+`.
    fn stroke(&mut self, col: usize, row: usize, edge: char) {
        let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) else {
            return;
        };
        *cell = match (*cell, edge) {
            (_, '+') | ('+', _) => '+',
            ('|', '-') | ('-', '|') => '+',
            _ => edge,
        };
    }

    /// Centres `text` inside `span`, or leaves the box bare when it would
    /// touch the outline.
    fn label(&mut self, span: Span, text: &str) {
        let inner = span.right.saturating_sub(span.left + 1);
        let len = text.chars().count();
        if len > inner || span.bottom < span.top + 2 {
            return;
        }
        let row = (span.top + span.bottom) / 2;
        let start = span.left + 1 + (inner - len) / 2;
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(start + i)) {
                *cell = ch;
            }
        }
    }

    fn finish(self) -> String {
        let mut out = String::new();
        for row in &self.cells {
            let line: String = row.iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Draws one plate scaled to fit 80x40 characters. Empty when the plate is
/// too thin to show at that scale.
pub fn render_layout(plate: Rect, layout: &Layout) -> String {
    let Some(mut canvas) = Canvas::new(plate) else {
        return String::new();
    };

    for free in &layout.waste {
        let span = canvas.span(free.x, free.y, free.rect());
        if !span.is_flat() {
            canvas.shade(span);
        }
    }

    let border = canvas.span(0, 0, plate);
    canvas.outline(border);

    for piece in &layout.pieces {
        draw_piece(&mut canvas, piece);
    }

    canvas.finish()
}

fn draw_piece(canvas: &mut Canvas, piece: &PlacedPiece) {
    let span = canvas.span(piece.x, piece.y, piece.rect());
    if span.is_flat() {
        return;
    }
    canvas.outline(span);
    canvas.label(span, &piece.rect().to_string());
}
