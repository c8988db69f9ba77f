//! Minimal PDF 1.4 writer for laid-out documents
//!
//! Uses the built-in Helvetica faces (no embedding) with WinAnsiEncoding and
//! uncompressed content streams.

use super::layout::{Document, DrawOp, Font, Rgb};
use crate::error::{PayrollError, PayrollResult};
use std::io::Write;

const PRODUCER: &str = concat!("royalbit-payroll ", env!("CARGO_PKG_VERSION"));

// Fixed object numbers; page objects follow from FIRST_PAGE_OBJECT
const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT_REGULAR: usize = 3;
const FONT_BOLD: usize = 4;
const INFO: usize = 5;
const FIRST_PAGE_OBJECT: usize = 6;

/// Append-only object writer that records xref offsets
struct PdfWriter {
    out: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            out,
            offsets: Vec::new(),
        }
    }

    fn begin_object(&mut self, id: usize) -> PayrollResult<()> {
        if self.offsets.len() < id {
            self.offsets.resize(id, 0);
        }
        self.offsets[id - 1] = self.out.len();
        writeln!(self.out, "{} 0 obj", id)?;
        Ok(())
    }

    fn object(&mut self, id: usize, body: &[u8]) -> PayrollResult<()> {
        self.begin_object(id)?;
        self.out.extend_from_slice(body);
        self.out.extend_from_slice(b"\nendobj\n");
        Ok(())
    }

    fn stream(&mut self, id: usize, content: &[u8]) -> PayrollResult<()> {
        self.begin_object(id)?;
        write!(self.out, "<< /Length {} >>\nstream\n", content.len())?;
        self.out.extend_from_slice(content);
        self.out.extend_from_slice(b"\nendstream\nendobj\n");
        Ok(())
    }

    fn finish(mut self) -> PayrollResult<Vec<u8>> {
        if self.offsets.iter().any(|&offset| offset == 0) {
            return Err(PayrollError::Document("object table has gaps".to_string()));
        }

        let xref = self.out.len();
        let size = self.offsets.len() + 1;
        write!(self.out, "xref\n0 {}\n0000000000 65535 f \n", size)?;
        for offset in &self.offsets {
            write!(self.out, "{:010} 00000 n \n", offset)?;
        }
        write!(
            self.out,
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, CATALOG, INFO, xref
        )?;
        Ok(self.out)
    }
}

/// Encode a PDF string literal body: escapes delimiters, maps to WinAnsi
fn escape_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                bytes.push(b'\\');
                bytes.push(c as u8);
            }
            ' '..='~' => bytes.push(c as u8),
            // Latin-1 upper half matches WinAnsi
            '\u{A0}'..='\u{FF}' => bytes.push(c as u32 as u8),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}

fn color_components(color: Rgb) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        f64::from(color.0) / 255.0,
        f64::from(color.1) / 255.0,
        f64::from(color.2) / 255.0
    )
}

/// Content stream for one page, flipping y into PDF user space
fn page_content(ops: &[DrawOp], page_height: f64) -> PayrollResult<Vec<u8>> {
    let mut content = Vec::new();
    for op in ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                write!(
                    content,
                    "{} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\n",
                    color_components(*fill),
                    x,
                    page_height - y - height,
                    width,
                    height
                )?;
            }
            DrawOp::Text {
                x,
                y,
                size,
                font,
                color,
                text,
            } => {
                let font_name = match font {
                    Font::Regular => "F1",
                    Font::Bold => "F2",
                };
                write!(
                    content,
                    "BT\n/{} {:.2} Tf\n{} rg\n{:.2} {:.2} Td\n(",
                    font_name,
                    size,
                    color_components(*color),
                    x,
                    page_height - y
                )?;
                content.extend_from_slice(&escape_text(text));
                content.extend_from_slice(b") Tj\nET\n");
            }
        }
    }
    Ok(content)
}

/// Serialize `doc` to PDF bytes
pub fn encode(doc: &Document) -> PayrollResult<Vec<u8>> {
    if doc.pages.is_empty() {
        return Err(PayrollError::Document("document has no pages".to_string()));
    }

    let setup = doc.setup;
    let page_ids: Vec<usize> = (0..doc.pages.len())
        .map(|i| FIRST_PAGE_OBJECT + 2 * i)
        .collect();

    let mut writer = PdfWriter::new();
    writer.object(
        CATALOG,
        format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES).as_bytes(),
    )?;

    let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
    writer.object(
        PAGES,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_ids.len()
        )
        .as_bytes(),
    )?;

    writer.object(
        FONT_REGULAR,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    )?;
    writer.object(
        FONT_BOLD,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    )?;

    let mut info = b"<< /Title (".to_vec();
    info.extend_from_slice(&escape_text(&doc.title));
    info.extend_from_slice(format!(") /Producer ({}) >>", PRODUCER).as_bytes());
    writer.object(INFO, &info)?;

    for (page, &page_id) in doc.pages.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        writer.object(
            page_id,
            format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 {} 0 R /F2 {} 0 R >> >> /Contents {} 0 R >>",
                PAGES, setup.width, setup.height, FONT_REGULAR, FONT_BOLD, content_id
            )
            .as_bytes(),
        )?;
        writer.stream(content_id, &page_content(&page.ops, setup.height)?)?;
    }

    writer.finish()
}
