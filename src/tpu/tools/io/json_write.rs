use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::tpu::tools::error::Result;
use crate::tpu::tools::model::Record;

/// Writes the collection as a pretty-printed JSON array, replacing any file
/// already at `path`. The destination is either fully written or untouched.
pub fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    let json_string = serde_json::to_string_pretty(records)?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    if let Err(error) = fs::write(&staging, json_string).and_then(|()| fs::rename(&staging, path)) {
        let _ = fs::remove_file(&staging);
        return Err(error.into());
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".partial");
    path.with_file_name(name)
}
