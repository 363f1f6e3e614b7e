//! JSON export: a single array of projected objects with human-readable
//! indentation. Counts keep their native JSON type.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};
use youtube_client::Comment;

use crate::settings::Field;

pub(super) fn write(path: &Path, comments: &[Comment], fields: &[Field]) -> io::Result<()> {
    let records: Vec<Value> = comments
        .iter()
        .map(|comment| {
            let mut record = Map::new();
            for field in fields {
                record.insert(field.name().to_owned(), field.to_value(comment));
            }
            Value::Object(record)
        })
        .collect();

    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush()
}
