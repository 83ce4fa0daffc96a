use anyhow::Context;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};

use crate::matrix::ExportMatrix;

const SHEET_NAME: &str = "Timetable";
const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 40;

fn column_width(matrix: &ExportMatrix, col: usize) -> f64 {
    let widest = matrix
        .lines()
        .filter_map(|line| line.get(col))
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0);
    (widest + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH) as f64
}

/// Single-sheet workbook: bold header row, bordered wrapped cells.
pub fn encode_xlsx(matrix: &ExportMatrix) -> anyhow::Result<Vec<u8>> {
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_background_color(0xD9E1F2)
        .set_border(FormatBorder::Thin);
    let time_format = Format::new().set_bold().set_border(FormatBorder::Thin);
    let cell_format = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Top)
        .set_border(FormatBorder::Thin);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(SHEET_NAME)
        .context("failed to name worksheet")?;

    for (col, title) in matrix.header.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, title, &header_format)
            .context("failed to write header row")?;
        sheet
            .set_column_width(col as u16, column_width(matrix, col))
            .context("failed to size column")?;
    }

    for (r, row) in matrix.rows.iter().enumerate() {
        let excel_row = (r + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            let format = if col == 0 { &time_format } else { &cell_format };
            sheet
                .write_string_with_format(excel_row, col as u16, value, format)
                .with_context(|| format!("failed to write row {}", excel_row))?;
        }
    }
    sheet
        .set_freeze_panes(1, 1)
        .context("failed to freeze header")?;

    workbook
        .save_to_buffer()
        .context("failed to build spreadsheet")
}
