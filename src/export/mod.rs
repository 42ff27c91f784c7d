// src/export/mod.rs

mod excel_date;
mod fs_utils;
mod xlsx;

use crate::errors::AppResult;
use crate::report::book::ReportBook;
use std::path::PathBuf;

/// Write `book` into `out_dir` under its own file name and return the path.
pub fn save_book(book: &ReportBook, out_dir: &str) -> AppResult<PathBuf> {
    let dir = fs_utils::prepare_output_dir(out_dir)?;
    let path = fs_utils::output_path(&dir, &book.file_name);
    xlsx::write_book(book, &path)?;
    tracing::info!(path = %path.display(), "report saved");
    Ok(path)
}
