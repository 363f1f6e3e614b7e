//! CSV export: header row plus one row per comment, UTF-8, standard
//! quoting.

use std::io;
use std::path::Path;

use youtube_client::Comment;

use crate::settings::Field;

pub(super) fn write(path: &Path, comments: &[Comment], fields: &[Field]) -> io::Result<()> {
    // The file is created directly so filesystem errors keep their io
    // kind for the caller's read-only check.
    let file = std::fs::File::create(path)?;
    let mut writer = ::csv::Writer::from_writer(file);

    writer
        .write_record(fields.iter().map(Field::name))
        .map_err(csv_to_io)?;
    for comment in comments {
        writer
            .write_record(fields.iter().map(|f| f.render(comment)))
            .map_err(csv_to_io)?;
    }
    writer.flush()
}

fn csv_to_io(err: ::csv::Error) -> io::Error {
    match err.into_kind() {
        ::csv::ErrorKind::Io(io_err) => io_err,
        other => io::Error::other(format!("csv write failed: {other:?}")),
    }
}
