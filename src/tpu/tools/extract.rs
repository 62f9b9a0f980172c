use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::tpu::tools::error::{Result, ToolError};
use crate::tpu::tools::io::html_read::{self, RawSheet};
use crate::tpu::tools::model::{Field, Record};
use crate::tpu::tools::schema::{ColumnIndex, DATA_START_ROW, FieldMap};

/// Reads one sheet and returns its records. Failures are logged as warnings
/// and produce an empty result.
pub fn extract(path: &Path, source_prefix: &str) -> Vec<Record> {
    match try_extract(path, source_prefix) {
        Ok(records) => records,
        Err(error) => {
            warn!(path = %path.display(), %error, "skipping sheet");
            Vec::new()
        }
    }
}

/// Reads one sheet and returns its records, reporting why a sheet is unusable.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn try_extract(path: &Path, source_prefix: &str) -> Result<Vec<Record>> {
    let sheet = html_read::read_sheet(path)?;
    debug!(rows = sheet.rows.len(), "table parsed");
    let source = source_name(path, source_prefix);
    records_from_sheet(&sheet, &source)
        .ok_or_else(|| ToolError::sheet(path, "no code column in header row"))
}

/// Projects the data rows of `sheet` onto the resolved fields. Returns `None`
/// when the header has no code column.
pub fn records_from_sheet(sheet: &RawSheet, source: &str) -> Option<Vec<Record>> {
    let index = ColumnIndex::from_header(sheet.header());
    let fields = FieldMap::resolve(&index)?;
    debug!(fields = %fields.describe(), "resolved columns");

    let records = sheet
        .rows_from(DATA_START_ROW)
        .filter_map(|row| project_row(row, &fields, source))
        .collect();
    Some(records)
}

fn project_row(row: &[Option<String>], fields: &FieldMap, source: &str) -> Option<Record> {
    let code = cell(row, fields.code_column())?;
    let mut record = Record::new(code, source);
    for (field, column) in fields.iter().filter(|(field, _)| *field != Field::Code) {
        if let Some(value) = cell(row, column) {
            record.set(field, value);
        }
    }
    Some(record)
}

fn cell(row: &[Option<String>], column: usize) -> Option<String> {
    row.get(column)
        .and_then(Option::as_deref)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// File stem with `prefix` removed, e.g. `65_Tabela_Classes_Foo.xls` → `Foo`.
pub fn source_name(path: &Path, prefix: &str) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.strip_prefix(prefix).map(str::to_string).unwrap_or(stem)
}
