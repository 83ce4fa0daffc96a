//! Minimal PDF 1.4 writer for the paginated timetable document.
//!
//! Uses the standard Helvetica faces with WinAnsi encoding, so no fonts are
//! embedded. Text width is estimated from an average glyph advance rather than
//! real metrics; wrapping errs on the narrow side.

use std::fmt::Write as _;

use crate::matrix::ExportMatrix;
use crate::settings::PdfSettings;

const CELL_PADDING: f32 = 3.0;
const AVG_GLYPH_EM: f32 = 0.52;
const TIME_COLUMN_SHARE: f32 = 0.16;
const TITLE_SCALE: f32 = 1.6;

#[derive(Debug, Clone)]
enum Op {
    Rect { x: f32, y: f32, w: f32, h: f32, fill: bool },
    Text { x: f32, y: f32, size: f32, bold: bool, text: String },
}

struct Layout {
    page_width: f32,
    page_height: f32,
    margin: f32,
    font_size: f32,
    leading: f32,
    col_widths: Vec<f32>,
}

impl Layout {
    fn new(settings: &PdfSettings, cols: usize) -> Self {
        let table_width = settings.page_width - 2.0 * settings.margin;
        let col_widths = if cols <= 1 {
            vec![table_width]
        } else {
            let time_width = table_width * TIME_COLUMN_SHARE;
            let day_width = (table_width - time_width) / (cols - 1) as f32;
            std::iter::once(time_width)
                .chain(std::iter::repeat(day_width).take(cols - 1))
                .collect()
        };
        Self {
            page_width: settings.page_width,
            page_height: settings.page_height,
            margin: settings.margin,
            font_size: settings.font_size,
            leading: settings.font_size * 1.25,
            col_widths,
        }
    }

    fn max_chars(&self, col: usize) -> usize {
        let usable = self.col_widths[col] - 2.0 * CELL_PADDING;
        ((usable / (self.font_size * AVG_GLYPH_EM)).floor() as usize).max(1)
    }

    fn row_height(&self, lines: usize) -> f32 {
        lines.max(1) as f32 * self.leading + 2.0 * CELL_PADDING
    }

    fn body_top(&self) -> f32 {
        self.page_height - self.margin - self.font_size * TITLE_SCALE * 2.0
    }
}

/// Greedy word wrap; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word[..max_chars].iter().collect());
            word.drain(..max_chars);
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            word.len()
        } else {
            current.chars().count() + 1 + word.len()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn wrap_row(layout: &Layout, row: &[String]) -> Vec<Vec<String>> {
    (0..layout.col_widths.len())
        .map(|col| {
            let text = row.get(col).map(String::as_str).unwrap_or("");
            wrap_text(text, layout.max_chars(col))
        })
        .collect()
}

fn push_row(ops: &mut Vec<Op>, layout: &Layout, cells: &[Vec<String>], top: f32, bold: bool) -> f32 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
    let height = layout.row_height(lines);
    let mut x = layout.margin;
    for (col, cell) in cells.iter().enumerate() {
        let w = layout.col_widths[col];
        ops.push(Op::Rect {
            x,
            y: top - height,
            w,
            h: height,
            fill: bold,
        });
        for (k, line) in cell.iter().enumerate() {
            ops.push(Op::Text {
                x: x + CELL_PADDING,
                y: top - CELL_PADDING - layout.font_size * 0.85 - k as f32 * layout.leading,
                size: layout.font_size,
                bold: bold || col == 0,
                text: line.clone(),
            });
        }
        x += w;
    }
    top - height
}

fn start_page(layout: &Layout, title: &str, header: &[Vec<String>]) -> (Vec<Op>, f32) {
    let mut ops = vec![Op::Text {
        x: layout.margin,
        y: layout.page_height - layout.margin - layout.font_size * TITLE_SCALE,
        size: layout.font_size * TITLE_SCALE,
        bold: true,
        text: title.to_string(),
    }];
    let y = push_row(&mut ops, layout, header, layout.body_top(), true);
    (ops, y)
}

fn paginate(matrix: &ExportMatrix, title: &str, layout: &Layout) -> Vec<Vec<Op>> {
    let header = wrap_row(layout, &matrix.header);
    let mut pages = Vec::new();
    let (mut ops, mut y) = start_page(layout, title, &header);
    let fresh_page_y = y;
    let mut rows_on_page = 0usize;

    for row in &matrix.rows {
        let mut cells = wrap_row(layout, row);
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
        if y - layout.row_height(lines) < layout.margin && rows_on_page > 0 {
            pages.push(std::mem::take(&mut ops));
            let (next_ops, next_y) = start_page(layout, title, &header);
            ops = next_ops;
            y = next_y;
            rows_on_page = 0;
        }
        // A row taller than a whole page is cut to fit.
        let room = ((fresh_page_y - layout.margin - 2.0 * CELL_PADDING) / layout.leading)
            .floor()
            .max(1.0) as usize;
        for cell in cells.iter_mut() {
            if cell.len() > room {
                cell.truncate(room);
                if let Some(last) = cell.last_mut() {
                    last.push_str("...");
                }
            }
        }
        y = push_row(&mut ops, layout, &cells, y, false);
        rows_on_page += 1;
    }
    pages.push(ops);
    pages
}

fn win_ansi(c: char) -> Option<u8> {
    match c {
        '\u{20AC}' => Some(0x80),
        '\u{2026}' => Some(0x85),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201C}' => Some(0x93),
        '\u{201D}' => Some(0x94),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        c if (0xA0..=0xFF).contains(&(c as u32)) => Some(c as u32 as u8),
        _ => None,
    }
}

fn pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\t' | '\n' | '\r' => out.push(' '),
            _ => match win_ansi(c) {
                Some(b) => {
                    let _ = write!(out, "\\{:03o}", b);
                }
                None => out.push('?'),
            },
        }
    }
    out
}

fn content_stream(ops: &[Op], footer: &str, layout: &Layout) -> String {
    let mut s = String::new();
    s.push_str("0.5 w\n");
    for op in ops {
        match op {
            Op::Rect { x, y, w, h, fill } => {
                if *fill {
                    let _ = writeln!(s, "0.88 g {:.2} {:.2} {:.2} {:.2} re B 0 g", x, y, w, h);
                } else {
                    let _ = writeln!(s, "{:.2} {:.2} {:.2} {:.2} re S", x, y, w, h);
                }
            }
            Op::Text {
                x,
                y,
                size,
                bold,
                text,
            } => {
                let font = if *bold { "F2" } else { "F1" };
                let _ = writeln!(
                    s,
                    "BT /{} {:.2} Tf {:.2} {:.2} Td ({}) Tj ET",
                    font,
                    size,
                    x,
                    y,
                    pdf_string(text)
                );
            }
        }
    }
    let _ = writeln!(
        s,
        "BT /F1 {:.2} Tf {:.2} {:.2} Td ({}) Tj ET",
        layout.font_size * 0.9,
        layout.margin,
        layout.margin * 0.5,
        pdf_string(footer)
    );
    s
}

struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new(object_count: usize) -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: vec![0; object_count + 1],
        }
    }

    fn object(&mut self, id: usize, body: &str) {
        self.offsets[id] = self.buf.len();
        self.buf
            .extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
    }

    fn stream(&mut self, id: usize, data: &str) {
        let data = data.trim_end_matches('\n');
        let body = format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            data.len(),
            data
        );
        self.object(id, &body);
    }

    fn finish(mut self, root: usize) -> Vec<u8> {
        let xref_at = self.buf.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len());
        for off in &self.offsets[1..] {
            let _ = write!(tail, "{:010} 00000 n \n", off);
        }
        let _ = write!(
            tail,
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            self.offsets.len(),
            root,
            xref_at
        );
        self.buf.extend_from_slice(tail.as_bytes());
        self.buf
    }
}

pub fn encode_pdf(matrix: &ExportMatrix, title: &str, settings: &PdfSettings) -> Vec<u8> {
    let layout = Layout::new(settings, matrix.column_count().max(1));
    let pages = paginate(matrix, title, &layout);
    let page_count = pages.len();

    // 1 catalog, 2 page tree, 3-4 fonts, then (content, page) per page.
    let first_page_obj = 5;
    let object_count = 4 + 2 * page_count;
    let mut w = PdfWriter::new(object_count);
    w.object(1, "<< /Type /Catalog /Pages 2 0 R >>");
    w.object(
        3,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    w.object(
        4,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );

    let mut kids = Vec::with_capacity(page_count);
    for (i, ops) in pages.iter().enumerate() {
        let content_id = first_page_obj + 2 * i;
        let page_id = content_id + 1;
        let footer = format!("Page {} of {}", i + 1, page_count);
        w.stream(content_id, &content_stream(ops, &footer, &layout));
        w.object(
            page_id,
            &format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                layout.page_width, layout.page_height, content_id
            ),
        );
        kids.push(format!("{} 0 R", page_id));
    }
    w.object(
        2,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        ),
    );
    w.finish(1)
}
