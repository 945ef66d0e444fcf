//! Shared plumbing for the tab-separated dataset files.
//!
//! Both hetrec2011 files are tab-separated with a header line. Quote characters
//! appear verbatim in artist names, so quoting is disabled.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{DataError, DataResult};

/// Build a header-aware, tab-delimited csv reader over `reader`.
pub(crate) fn reader<R: Read>(reader: R, flexible: bool) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .quoting(false)
        .flexible(flexible)
        .from_reader(reader)
}

/// Open a data file, naming the path on failure.
pub(crate) fn open(path: &Path) -> DataResult<File> {
    File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Read the header and locate each of `columns` by exact name.
pub(crate) fn column_indices<R: Read, const N: usize>(
    rdr: &mut csv::Reader<R>,
    columns: [&str; N],
) -> DataResult<[usize; N]> {
    let headers = rdr
        .headers()
        .map_err(|e| DataError::MalformedRecord {
            row: 0,
            reason: format!("unreadable header: {e}"),
        })?
        .clone();

    let mut indices = [0usize; N];
    for (slot, column) in indices.iter_mut().zip(columns) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| DataError::MissingColumn {
                column: column.to_string(),
            })?;
    }
    Ok(indices)
}

/// Fetch field `index` of a data row as trimmed UTF-8 (lossy).
pub(crate) fn field(
    record: &csv::ByteRecord,
    index: usize,
    column: &str,
    row: usize,
) -> DataResult<String> {
    record
        .get(index)
        .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
        .ok_or_else(|| DataError::MalformedRecord {
            row,
            reason: format!("missing \"{column}\" field"),
        })
}
