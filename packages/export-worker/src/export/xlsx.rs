//! XLSX export: a single "Comments" sheet with header and data rows,
//! columns sized to their longest value.

use std::io;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use youtube_client::Comment;

use crate::settings::Field;

/// Column width cap; anything longer is truncated visually, not in data.
const MAX_COLUMN_WIDTH: usize = 80;

pub(super) fn write(path: &Path, comments: &[Comment], fields: &[Field]) -> io::Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Comments").map_err(io::Error::other)?;

    for (col, field) in fields.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, field.name())
            .map_err(io::Error::other)?;
    }
    for (row, comment) in comments.iter().enumerate() {
        for (col, field) in fields.iter().enumerate() {
            worksheet
                .write_string(row as u32 + 1, col as u16, field.render(comment))
                .map_err(io::Error::other)?;
        }
    }

    for (col, field) in fields.iter().enumerate() {
        let longest = comments
            .iter()
            .map(|c| field.render(c).chars().count())
            .chain([field.name().len()])
            .max()
            .unwrap_or(0);
        let width = (longest + 2).min(MAX_COLUMN_WIDTH);
        worksheet
            .set_column_width(col as u16, width as f64)
            .map_err(io::Error::other)?;
    }

    // Render to memory first so the only filesystem operation is a plain
    // write whose io kind survives for the read-only check.
    let buffer = workbook.save_to_buffer().map_err(io::Error::other)?;
    std::fs::write(path, buffer)
}
