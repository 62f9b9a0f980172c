use std::collections::BTreeMap;

use crate::tpu::tools::model::Field;

/// Rows between the header (row 0) and the first data row. They are part of
/// the export layout and are never inspected.
pub const PREAMBLE_ROWS: usize = 5;
/// Index of the first data row in a sheet table.
pub const DATA_START_ROW: usize = 1 + PREAMBLE_ROWS;

/// Normalized header names paired with the column they came from, in column
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    entries: Vec<(String, usize)>,
}

impl ColumnIndex {
    /// Builds the index from a header row. Missing cells are skipped. A
    /// repeated name keeps the position of its first occurrence but points at
    /// the last column carrying it.
    pub fn from_header(header: &[Option<String>]) -> Self {
        let mut entries: Vec<(String, usize)> = Vec::with_capacity(header.len());
        for (column, cell) in header.iter().enumerate() {
            let Some(name) = cell.as_deref().map(normalize_header) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            match entries.iter_mut().find(|(existing, _)| *existing == name) {
                Some(entry) => entry.1 = column,
                None => entries.push((name, column)),
            }
        }
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, column)| (name.as_str(), *column))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lower-cases and trims a header cell.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Columns resolved for each semantic field of one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    code: usize,
    columns: BTreeMap<Field, usize>,
}

impl FieldMap {
    /// Resolves fields in [`Field::PRIORITY`] order, never reusing a claimed
    /// column. The code takes the first header containing any of its aliases;
    /// the other fields try their aliases in order and take the first header
    /// containing the current one. Returns `None` when no code column exists.
    pub fn resolve(index: &ColumnIndex) -> Option<Self> {
        let mut columns: BTreeMap<Field, usize> = BTreeMap::new();
        for field in Field::PRIORITY {
            let unclaimed = |column: usize| !columns.values().any(|claimed| *claimed == column);
            let found = if field == Field::Code {
                index.iter().find(|(name, column)| {
                    unclaimed(*column) && field.aliases().iter().any(|alias| name.contains(alias))
                })
            } else {
                field.aliases().iter().find_map(|alias| {
                    index
                        .iter()
                        .find(|(name, column)| unclaimed(*column) && name.contains(alias))
                })
            };
            if let Some((_, column)) = found {
                columns.insert(field, column);
            }
        }

        let code = columns.get(&Field::Code).copied()?;
        Some(Self { code, columns })
    }

    pub fn code_column(&self) -> usize {
        self.code
    }

    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Resolved `(field, column)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, usize)> + '_ {
        self.columns.iter().map(|(field, column)| (*field, *column))
    }

    /// Human readable summary, e.g. `code=0, description=3`.
    pub fn describe(&self) -> String {
        self.iter()
            .map(|(field, column)| format!("{}={column}", field.key()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
