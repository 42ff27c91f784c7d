// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::excel_date::{
    DATE_FORMAT, DATETIME_FORMAT, naive_date_to_excel_serial, naive_datetime_to_excel_serial,
};
use crate::report::book::{Cell, ReportBook, Sheet};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::io;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const MAX_COLUMN_WIDTH: usize = 60;

/// Per-row styles; banding alternates between the two palettes.
struct Styles {
    header: Format,
    text: [Format; 2],
    number: [Format; 2],
    date: [Format; 2],
    datetime: [Format; 2],
}

impl Styles {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::RGB(0xFFFFFF))
                .set_background_color(Color::RGB(0x2F75B5))
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin),
            text: banded(|f| f),
            number: banded(|f| f.set_align(FormatAlign::Right)),
            date: banded(|f| f.set_num_format(DATE_FORMAT)),
            datetime: banded(|f| f.set_num_format(DATETIME_FORMAT)),
        }
    }
}

fn banded(style: fn(Format) -> Format) -> [Format; 2] {
    [0xEAF3FB, 0xFFFFFF].map(|color| {
        style(
            Format::new()
                .set_background_color(Color::RGB(color))
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin),
        )
    })
}

/// Write every sheet of `book` to `path`.
pub(crate) fn write_book(book: &ReportBook, path: &Path) -> AppResult<()> {
    tracing::info!(path = %path.display(), sheets = book.sheets.len(), "writing workbook");

    let styles = Styles::new();
    let mut workbook = Workbook::new();

    for sheet in &book.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, sheet, &styles)?;
    }

    workbook.save(path_str(path)?)?;
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, styles: &Styles) -> AppResult<()> {
    let mut col_widths: Vec<usize> = sheet
        .headers
        .iter()
        .map(|h| UnicodeWidthStr::width(h.as_str()))
        .collect();

    // ---------------------------
    // Header
    // ---------------------------
    let first_row = if sheet.headers.is_empty() {
        0
    } else {
        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_with_format(0, col as u16, header.as_str(), &styles.header)?;
        }
        worksheet.set_freeze_panes(1, 0)?;
        1
    };

    // ---------------------------
    // Rows
    // ---------------------------
    for (row_index, cells) in sheet.rows.iter().enumerate() {
        let row = first_row + row_index as u32;
        let band = row_index % 2;

        for (col, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row, col as u16, cell, band, styles)?;

            let width = UnicodeWidthStr::width(cell.display().as_str());
            match col_widths.get_mut(col) {
                Some(w) => *w = (*w).max(width),
                None => col_widths.push(width),
            }
        }
    }

    // ---------------------------
    // Column widths
    // ---------------------------
    for (c, w) in col_widths.iter().enumerate() {
        let w = (*w).min(MAX_COLUMN_WIDTH);
        worksheet.set_column_width(c as u16, w as f64 + 2.0)?;
    }

    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    band: usize,
    styles: &Styles,
) -> AppResult<()> {
    match cell {
        Cell::Text(s) => {
            worksheet.write_with_format(row, col, s.as_str(), &styles.text[band])?;
        }
        Cell::Number(n) => {
            worksheet.write_with_format(row, col, *n, &styles.number[band])?;
        }
        Cell::Integer(n) => {
            worksheet.write_with_format(row, col, *n as f64, &styles.number[band])?;
        }
        Cell::Bool(b) => {
            worksheet.write_with_format(row, col, *b, &styles.text[band])?;
        }
        Cell::DateTime(dt) => {
            let serial = naive_datetime_to_excel_serial(dt);
            worksheet.write_with_format(row, col, serial, &styles.datetime[band])?;
        }
        Cell::Date(d) => {
            let serial = naive_date_to_excel_serial(d);
            worksheet.write_with_format(row, col, serial, &styles.date[band])?;
        }
        Cell::Blank => {
            worksheet.write_blank(row, col, &styles.text[band])?;
        }
    }
    Ok(())
}

fn path_str(path: &Path) -> AppResult<&str> {
    path.to_str()
        .ok_or_else(|| AppError::from(io::Error::other("invalid path")))
}
