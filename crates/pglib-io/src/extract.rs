//! Tokenizing table extractor.
//!
//! Slices case-file text into named raw tables. The grammar is line based:
//!
//! ```text
//! %% bus data                  <- opens table "bus data"
//! %    bus_i    type    Pd     <- header row (leading "% ")
//! mpc.bus = [                  <- assignment line, skipped
//!     1    3    0.0;           <- data row
//!     2    1    300.0; % NG    <- data row; ';' and '%' end fields
//! ];                           <- closes the table
//! ```
//!
//! Lines outside an open table are ignored. A `%% ` line arriving while a
//! table is open seals that table with the rows it has. A table still open at
//! end of input stays registered, but the lines routed to it are dropped and
//! recorded as an error-severity diagnostic.

use std::collections::BTreeMap;

use pglib_core::Diagnostics;
use tracing::{debug, warn};

/// Marker opening a table; the rest of the line is its name.
pub const TABLE_START: &str = "%% ";
/// Marker closing the open table.
pub const TABLE_END: &str = "];";
const HEADER_MARKER: &str = "% ";
const ASSIGNMENT_PREFIX: &str = "mpc.";

/// Rows of one named table, header (conventionally) first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub name: String,
    pub rows: Vec<Vec<String>>,
    /// 1-based source line of each row
    pub lines: Vec<usize>,
}

impl RawTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, line: usize, fields: Vec<String>) {
        self.rows.push(fields);
        self.lines.push(line);
    }

    /// First row, treated as the header.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Every row after the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Source line of row `row` (0 is the header).
    pub fn line_of(&self, row: usize) -> Option<usize> {
        self.lines.get(row).copied()
    }
}

/// Split case-file text into its named tables.
pub fn extract_tables(text: &str) -> BTreeMap<String, RawTable> {
    let mut diag = Diagnostics::new();
    extract_tables_with_diagnostics(text, &mut diag)
}

/// [`extract_tables`], recording duplicate and unterminated tables in `diag`.
pub fn extract_tables_with_diagnostics(
    text: &str,
    diag: &mut Diagnostics,
) -> BTreeMap<String, RawTable> {
    let mut tables: BTreeMap<String, RawTable> = BTreeMap::new();
    let mut open: Option<RawTable> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim_start();

        if let Some(rest) = trimmed.strip_prefix(TABLE_START) {
            if let Some(previous) = open.take() {
                debug!(table = %previous.name, "table reopened before end marker; sealing");
                seal(&mut tables, previous);
            }
            let name = rest.trim().to_string();
            if tables.contains_key(&name) {
                warn!(table = %name, line = line_no, "duplicate table name replaces earlier table");
                diag.add_warning_at_line(
                    "extract",
                    &format!("duplicate table '{}' replaces earlier table", name),
                    line_no,
                );
            }
            debug!(table = %name, line = line_no, "opened table");
            tables.insert(name.clone(), RawTable::new(name.clone()));
            open = Some(RawTable::new(name));
            continue;
        }

        let Some(table) = open.as_mut() else {
            continue;
        };

        if trimmed.trim_end().starts_with(TABLE_END) {
            if let Some(done) = open.take() {
                debug!(table = %done.name, rows = done.rows.len(), "closed table");
                seal(&mut tables, done);
            }
        } else if let Some(rest) = trimmed.strip_prefix(HEADER_MARKER) {
            let fields = split_header(rest);
            if !fields.is_empty() {
                table.push(line_no, fields);
            }
        } else if !trimmed.starts_with(ASSIGNMENT_PREFIX) {
            let fields = split_data(trimmed);
            if !fields.is_empty() {
                table.push(line_no, fields);
            }
        }
    }

    if let Some(unterminated) = open {
        warn!(
            table = %unterminated.name,
            dropped_rows = unterminated.rows.len(),
            "table never closed; its rows were dropped"
        );
        diag.add_error_with_entity(
            "extract",
            &format!(
                "table never closed; {} row(s) dropped",
                unterminated.rows.len()
            ),
            &unterminated.name,
        );
    }

    tables
}

fn seal(tables: &mut BTreeMap<String, RawTable>, table: RawTable) {
    tables.insert(table.name.clone(), table);
}

/// Header fields: whitespace separated.
pub fn split_header(rest: &str) -> Vec<String> {
    rest.split_whitespace().map(str::to_string).collect()
}

/// Data fields: separated by whitespace, `;` or runs of `%`.
pub fn split_data(line: &str) -> Vec<String> {
    line.split(|c: char| c.is_whitespace() || c == ';' || c == '%')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
