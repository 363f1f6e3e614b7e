//! File export of projected comment records.
//!
//! All formats share the same projection: each record is rendered onto
//! exactly the selected fields, in selection order, with absent values
//! blank. Filenames embed the video id and the UTC minute.

mod csv;
mod json;
mod xlsx;

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;
use youtube_client::Comment;

use crate::settings::{ExportFormat, Field};

/// Build the export filename: `comments_<video_id>_<YYYYmmdd_HHMM>.<ext>`.
pub fn build_filename(video_id: &str, format: ExportFormat) -> String {
    let ts = Utc::now().format("%Y%m%d_%H%M");
    format!("comments_{video_id}_{ts}.{}", format.extension())
}

/// Write `comments` to a new file in `dir`, creating the directory if
/// needed. Returns the path of the written file.
pub fn export(
    comments: &[Comment],
    dir: &Path,
    video_id: &str,
    fields: &[Field],
    format: ExportFormat,
) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(build_filename(video_id, format));
    match format {
        ExportFormat::Csv => csv::write(&path, comments, fields)?,
        ExportFormat::Xlsx => xlsx::write(&path, comments, fields)?,
        ExportFormat::Json => json::write(&path, comments, fields)?,
    }
    info!(
        video_id,
        path = %path.display(),
        count = comments.len(),
        format = format.extension(),
        "export written"
    );
    Ok(path)
}

/// Whether an export failure looks like a read-only target, the one case
/// the runner retries in the fallback directory. Anything else is fatal.
pub fn is_read_only_fs(err: &io::Error) -> bool {
    err.raw_os_error() == Some(30)
        || matches!(
            err.kind(),
            io::ErrorKind::ReadOnlyFilesystem | io::ErrorKind::PermissionDenied
        )
}
