//! Stream-mode table detection over extracted page text.
//!
//! PDF has no native table model, so tables are recovered from alignment
//! patterns in the page text: consecutive lines that split into the same
//! number of cells on column gaps (a tab or a run of two or more spaces)
//! are treated as one table. This is positional detection only; semantic
//! table-structure inference is out of scope.

use unidoc_core::Table;

/// Minimum consecutive aligned lines to accept as a table.
const MIN_ROWS: usize = 2;
/// Minimum cells per line for the line to count as tabular.
const MIN_COLUMNS: usize = 2;

/// Detect tables in one page's extracted text, top to bottom.
///
/// Pages without aligned multi-column runs yield an empty list, which is
/// the success case for absence.
#[must_use]
pub fn detect_tables(text: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Table = Vec::new();

    for line in text.lines() {
        let cells = split_cells(line);
        let extends_current = cells.len() >= MIN_COLUMNS
            && current.last().map_or(true, |row| row.len() == cells.len());
        if extends_current {
            current.push(cells);
        } else {
            flush(&mut current, &mut tables);
            // A differently shaped tabular line starts a new candidate.
            if cells.len() >= MIN_COLUMNS {
                current.push(cells);
            }
        }
    }
    flush(&mut current, &mut tables);

    tables
}

fn flush(current: &mut Table, tables: &mut Vec<Table>) {
    if current.len() >= MIN_ROWS {
        tables.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Split a line into cells on tabs or runs of two or more spaces.
fn split_cells(line: &str) -> Vec<String> {
    line.split('\t')
        .flat_map(|part| part.split("  "))
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}
