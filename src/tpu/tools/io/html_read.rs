use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use scraper::{ElementRef, Html};

use crate::tpu::tools::error::{Result, ToolError};

/// Upper bound for a single cell's `colspan`. Larger values are clamped.
const MAX_COLSPAN: usize = 1024;
/// Upper bound for a single cell's `rowspan`. Larger values are clamped.
const MAX_ROWSPAN: usize = 65_536;

/// Raw cell grid of the first table found in a sheet. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSheet {
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawSheet {
    /// Row 0, the candidate column names.
    pub fn header(&self) -> &[Option<String>] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows from `start` onwards.
    pub fn rows_from(&self, start: usize) -> impl Iterator<Item = &[Option<String>]> {
        self.rows.iter().skip(start).map(Vec::as_slice)
    }
}

/// Reads a sheet file and returns its first HTML table.
pub fn read_sheet(path: &Path) -> Result<RawSheet> {
    let bytes = fs::read(path)?;
    let html = decode_lossy(&bytes);
    parse_first_table(&html).ok_or_else(|| ToolError::sheet(path, "no table found"))
}

/// Decodes Western-European 8-bit text. Never fails: windows-1252 maps every
/// byte value, the undefined ones to C1 controls.
pub fn decode_lossy(bytes: &[u8]) -> String {
    WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
}

/// Parses `html` and returns the cell grid of its first `<table>`, or `None`
/// when the document holds no table. Rows of nested tables are not included.
/// Cells spanning several columns or rows are repeated in every slot they
/// cover.
pub fn parse_first_table(html: &str) -> Option<RawSheet> {
    let document = Html::parse_document(html);
    let table = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "table")?;

    let mut spans = RowSpans::default();
    let rows = table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "tr")
        .filter(|row| owning_table(row).is_some_and(|owner| owner.id() == table.id()))
        .map(|row| read_row(&row, &mut spans))
        .collect();

    Some(RawSheet { rows })
}

fn owning_table<'a>(row: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "table")
}

/// Cells carried down from earlier rows by `rowspan`, indexed by column.
#[derive(Debug, Default)]
struct RowSpans {
    pending: Vec<Option<(Option<String>, usize)>>,
}

impl RowSpans {
    /// Takes the carried value for `column`, if a cell above still covers it.
    fn take(&mut self, column: usize) -> Option<Option<String>> {
        let slot = self.pending.get_mut(column)?;
        let (text, remaining) = slot.as_mut()?;
        let value = text.clone();
        *remaining -= 1;
        if *remaining == 0 {
            *slot = None;
        }
        Some(value)
    }

    fn carry(&mut self, column: usize, text: Option<String>, rows: usize) {
        if self.pending.len() <= column {
            self.pending.resize(column + 1, None);
        }
        self.pending[column] = Some((text, rows));
    }

    fn has_pending_from(&self, column: usize) -> bool {
        self.pending.iter().skip(column).any(Option::is_some)
    }
}

fn read_row(row: &ElementRef<'_>, spans: &mut RowSpans) -> Vec<Option<String>> {
    let mut cells = Vec::new();
    for cell in row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|element| matches!(element.value().name(), "td" | "th"))
    {
        while let Some(carried) = spans.take(cells.len()) {
            cells.push(carried);
        }

        let text = cell_text(&cell);
        let columns = span_attr(&cell, "colspan", MAX_COLSPAN);
        let rows = span_attr(&cell, "rowspan", MAX_ROWSPAN);
        for _ in 0..columns {
            if rows > 1 {
                spans.carry(cells.len(), text.clone(), rows - 1);
            }
            cells.push(text.clone());
        }
    }

    while spans.has_pending_from(cells.len()) {
        let carried = spans.take(cells.len()).unwrap_or_default();
        cells.push(carried);
    }
    cells
}

fn span_attr(cell: &ElementRef<'_>, name: &str, max: usize) -> usize {
    cell.value()
        .attr(name)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|span| *span > 0)
        .unwrap_or(1)
        .min(max)
}

fn cell_text(cell: &ElementRef<'_>) -> Option<String> {
    let joined = cell.text().collect::<String>();
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
