use serde::{Deserialize, Serialize};

/// Semantic fields recognised in a class sheet, in resolution priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Code,
    ParentCode,
    Abbreviation,
    Description,
}

impl Field {
    /// Every field, highest priority first. A header claimed by an earlier
    /// field is never considered for a later one.
    pub const PRIORITY: [Field; 4] = [
        Field::Code,
        Field::ParentCode,
        Field::Abbreviation,
        Field::Description,
    ];

    /// Lower-case fragments that identify the field inside a normalized header.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Code => &["código", "codigo"],
            Field::ParentCode => &["cód. pai", "cod. pai"],
            Field::Abbreviation => &["sigla"],
            Field::Description => &["descrição", "descricao", "glossário", "glossario"],
        }
    }

    /// Key used for the field in the JSON output.
    pub fn key(self) -> &'static str {
        match self {
            Field::Code => "code",
            Field::ParentCode => "parent_code",
            Field::Abbreviation => "abbreviation",
            Field::Description => "description",
        }
    }
}

/// One consolidated class entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Class code. Never empty.
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sheet the record came from, derived from the file name.
    pub source: String,
}

impl Record {
    /// Creates a record carrying only the mandatory fields.
    pub fn new(code: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            parent_code: None,
            abbreviation: None,
            description: None,
            source: source.into(),
        }
    }

    /// Sets an optional field. `Field::Code` replaces the code.
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Code => self.code = value,
            Field::ParentCode => self.parent_code = Some(value),
            Field::Abbreviation => self.abbreviation = Some(value),
            Field::Description => self.description = Some(value),
        }
    }
}

/// Number of records a single sheet contributed to the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub file_name: String,
    pub records: usize,
}

/// Result of consolidating a directory: the ordered collection plus per-file
/// counts for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consolidation {
    pub records: Vec<Record>,
    pub sheets: Vec<SheetSummary>,
}

impl Consolidation {
    /// Number of files that were read, valid or not.
    pub fn files_processed(&self) -> usize {
        self.sheets.len()
    }

    pub fn total_records(&self) -> usize {
        self.records.len()
    }
}
