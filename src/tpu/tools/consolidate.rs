use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::tpu::tools::error::{Result, ToolError};
use crate::tpu::tools::extract;
use crate::tpu::tools::io::json_write;
use crate::tpu::tools::model::{Consolidation, SheetSummary};

/// Extension of the sheets exported by the CNJ tables.
pub const DEFAULT_EXTENSION: &str = "xls";
/// Prefix removed from file stems to build the `source` of each record.
pub const DEFAULT_SOURCE_PREFIX: &str = "65_Tabela_Classes_";
/// Output location relative to the program directory.
pub const DEFAULT_OUTPUT: &str = "doctxt/classesProcessuaisTbr.json";

/// Settings for a consolidation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidateOptions {
    /// Spreadsheet extension without the leading dot. Compared ignoring ASCII
    /// case.
    pub extension: String,
    pub source_prefix: String,
}

impl Default for ConsolidateOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            source_prefix: DEFAULT_SOURCE_PREFIX.to_string(),
        }
    }
}

/// Replaces a leading `~` component with `home`. Paths without one, or with
/// no home directory known, are returned unchanged.
pub fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Home directory of the current user, from `HOME` or `USERPROFILE`.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Lists the sheets directly inside `directory`, sorted by file name.
pub fn discover_sheets(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(ToolError::DirectoryNotFound(directory.to_path_buf()));
    }

    let mut sheets = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            sheets.push(path);
        }
    }
    sheets.sort_by(|lhs, rhs| lhs.file_name().cmp(&rhs.file_name()));

    if sheets.is_empty() {
        return Err(ToolError::NoInputFiles {
            directory: directory.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    Ok(sheets)
}

/// Extracts every sheet in `directory` and concatenates the records in file
/// name order.
#[instrument(level = "info", skip_all, fields(directory = %directory.display()))]
pub fn consolidate(directory: &Path, options: &ConsolidateOptions) -> Result<Consolidation> {
    let sheets = discover_sheets(directory, &options.extension)?;
    info!(sheet_count = sheets.len(), "reading sheets");

    let mut consolidation = Consolidation::default();
    for path in &sheets {
        let records = extract::extract(path, &options.source_prefix);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(file = %file_name, records = records.len(), "sheet extracted");
        consolidation.sheets.push(SheetSummary {
            file_name,
            records: records.len(),
        });
        consolidation.records.extend(records);
    }

    if consolidation.records.is_empty() {
        return Err(ToolError::NoValidData(directory.to_path_buf()));
    }
    Ok(consolidation)
}

/// Consolidates `directory` and writes the collection to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(directory = %directory.display(), output = %output.display())
)]
pub fn run(directory: &Path, output: &Path, options: &ConsolidateOptions) -> Result<Consolidation> {
    let consolidation = consolidate(directory, options)?;
    json_write::write_records(output, &consolidation.records)?;
    for sheet in consolidation.sheets.iter().filter(|sheet| sheet.records > 0) {
        info!(file = %sheet.file_name, records = sheet.records, "sheet consolidated");
    }
    info!(
        files = consolidation.files_processed(),
        records = consolidation.total_records(),
        "collection written"
    );
    Ok(consolidation)
}
