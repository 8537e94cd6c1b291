//! CSV export of collected records

use crate::output::OutputError;
use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Lets spreadsheet tools detect UTF-8 and show Korean text correctly
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Makes `name` safe to use as a file name
///
/// Characters reserved on common filesystems are removed and spaces become
/// underscores.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Writes `rows` with a header line to `<dir>/<name>_<timestamp>.csv`
///
/// The file starts with a UTF-8 byte order mark. The directory is created
/// when missing. Returns the path written.
///
/// # Errors
///
/// `OutputError::Empty` when there are no rows to write.
pub fn write_csv<T: Serialize>(
    rows: &[T],
    dir: &Path,
    name: &str,
) -> Result<PathBuf, OutputError> {
    if rows.is_empty() {
        return Err(OutputError::Empty);
    }

    fs::create_dir_all(dir)?;
    let file_name = format!(
        "{}_{}.csv",
        sanitize_filename(name),
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(file_name);

    let mut file = File::create(&path)?;
    file.write_all(UTF8_BOM)?;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    tracing::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(path)
}
