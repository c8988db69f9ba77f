//! Page model and auto-paginating table layout
//!
//! Coordinates are PDF points measured from the top-left corner of the
//! page; the encoder flips them into PDF user space.

use super::metrics::{text_width, wrap_text};

/// Points per millimetre
pub const MM: f64 = 72.0 / 25.4;

/// The two standard faces a document may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// Page size and margins, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
}

impl PageSetup {
    /// A4 portrait, 210mm x 297mm
    pub const A4: PageSetup = PageSetup {
        width: 595.28,
        height: 841.89,
        margin_top: 40.0,
        margin_bottom: 40.0,
        margin_left: 40.0,
        margin_right: 40.0,
    };

    pub fn content_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    /// Lowest y a drawn row may reach
    pub fn content_bottom(&self) -> f64 {
        self.height - self.margin_bottom
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::A4
    }
}

/// Table look: font, padding and fills
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub font_size: f64,
    pub cell_padding: f64,
    pub line_height: f64,
    pub head_fill: Rgb,
    pub head_text: Rgb,
    pub body_text: Rgb,
    pub stripe_fill: Rgb,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            cell_padding: 5.0,
            line_height: 1.15,
            head_fill: Rgb(41, 128, 185),
            head_text: Rgb::WHITE,
            body_text: Rgb(80, 80, 80),
            stripe_fill: Rgb(245, 245, 245),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its baseline at `y`
    Text {
        x: f64,
        y: f64,
        size: f64,
        font: Font,
        color: Rgb,
        text: String,
    },
    /// Filled rectangle with its top edge at `y`
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Every text run on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rect { .. } => None,
        })
    }
}

/// A laid-out document, ready for encoding
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub setup: PageSetup,
    pub pages: Vec<Page>,
}

impl Document {
    /// A document with one blank page
    pub fn new(title: impl Into<String>, setup: PageSetup) -> Self {
        Self {
            title: title.into(),
            setup,
            pages: vec![Page::default()],
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
    }

    /// Whether any page carries exactly this text run
    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages.iter().any(|p| p.texts().any(|t| t == needle))
    }

    pub fn text(&mut self, x: f64, y: f64, size: f64, font: Font, color: Rgb, text: &str) {
        self.current().ops.push(DrawOp::Text {
            x,
            y,
            size,
            font,
            color,
            text: text.to_string(),
        });
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Rgb) {
        self.current().ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
        });
    }

    fn current(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

/// Column headers plus body rows of display text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub head: Vec<String>,
    pub body: Vec<Vec<String>>,
}

impl Table {
    pub fn new(head: &[&str]) -> Self {
        Self {
            head: head.iter().map(|h| h.to_string()).collect(),
            body: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.body.push(row);
    }

    fn column_count(&self) -> usize {
        self.body
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.head.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Column widths: natural content widths scaled to fill the content width
fn column_widths(table: &Table, setup: &PageSetup, style: &TableStyle) -> Vec<f64> {
    let columns = table.column_count();
    if columns == 0 {
        return Vec::new();
    }

    let mut natural = vec![0.0f64; columns];
    let cells = std::iter::once((&table.head, Font::Bold))
        .chain(table.body.iter().map(|row| (row, Font::Regular)));
    for (row, font) in cells {
        for (idx, cell) in row.iter().enumerate() {
            let longest = cell
                .split('\n')
                .map(|line| text_width(line, font, style.font_size))
                .fold(0.0, f64::max);
            natural[idx] = natural[idx].max(longest + 2.0 * style.cell_padding);
        }
    }

    let min_width = 2.0 * style.cell_padding + style.font_size;
    for width in &mut natural {
        *width = width.max(min_width);
    }

    let total: f64 = natural.iter().sum();
    let scale = setup.content_width() / total;
    natural.into_iter().map(|w| w * scale).collect()
}

struct LaidOutRow {
    lines: Vec<Vec<String>>,
    height: f64,
}

fn lay_out_row(row: &[String], widths: &[f64], font: Font, style: &TableStyle) -> LaidOutRow {
    let lines: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(idx, width)| {
            let text = row.get(idx).map(String::as_str).unwrap_or("");
            wrap_text(text, font, style.font_size, width - 2.0 * style.cell_padding)
        })
        .collect();

    let max_lines = lines.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let height = max_lines as f64 * style.font_size * style.line_height + 2.0 * style.cell_padding;
    LaidOutRow { lines, height }
}

/// Face, text colour and optional background of one row
#[derive(Clone, Copy)]
struct RowPaint {
    font: Font,
    color: Rgb,
    fill: Option<Rgb>,
}

fn draw_row(
    doc: &mut Document,
    row: &LaidOutRow,
    widths: &[f64],
    y: f64,
    paint: RowPaint,
    style: &TableStyle,
) {
    let left = doc.setup.margin_left;
    if let Some(fill) = paint.fill {
        let width: f64 = widths.iter().sum();
        doc.fill_rect(left, y, width, row.height, fill);
    }

    let mut x = left;
    for (cell_lines, width) in row.lines.iter().zip(widths) {
        for (k, line) in cell_lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline = y
                + style.cell_padding
                + k as f64 * style.font_size * style.line_height
                + style.font_size * 0.8;
            doc.text(
                x + style.cell_padding,
                baseline,
                style.font_size,
                paint.font,
                paint.color,
                line,
            );
        }
        x += width;
    }
}

/// Draw `table` starting at `start_y` on the current page.
///
/// Rows that would cross the bottom margin continue on a new page, where
/// the header row is drawn again. Returns the y just below the last row.
pub fn draw_table(doc: &mut Document, table: &Table, start_y: f64, style: &TableStyle) -> f64 {
    let setup = doc.setup;
    let widths = column_widths(table, &setup, style);
    if widths.is_empty() {
        return start_y;
    }

    let head = lay_out_row(&table.head, &widths, Font::Bold, style);
    let bottom = setup.content_bottom();

    let head_paint = RowPaint {
        font: Font::Bold,
        color: style.head_text,
        fill: Some(style.head_fill),
    };

    let mut y = start_y;
    draw_row(doc, &head, &widths, y, head_paint, style);
    y += head.height;

    for (idx, row) in table.body.iter().enumerate() {
        let laid_out = lay_out_row(row, &widths, Font::Regular, style);

        // Moved rows are drawn on the new page even if taller than it
        if y + laid_out.height > bottom {
            doc.add_page();
            y = setup.margin_top;
            draw_row(doc, &head, &widths, y, head_paint, style);
            y += head.height;
        }

        let paint = RowPaint {
            font: Font::Regular,
            color: style.body_text,
            fill: (idx % 2 == 0).then_some(style.stripe_fill),
        };
        draw_row(doc, &laid_out, &widths, y, paint, style);
        y += laid_out.height;
    }

    y
}
