//! Raw table to typed dataset conversion.
//!
//! Bus and branch tables map positionally: the first row names the columns,
//! every other row is data. Branches also get a synthetic `line_idx` column.
//!
//! Generators are assembled from two tables. Each generator-data row is
//! concatenated with the cost row at the same position:
//!
//! ```text
//! generator data:       bus  Pg  ...  [generator_type]
//! generator cost data:  model startup shutdown n  c(n-1) ... c(0)  [type copy]
//! ```
//!
//! PGLib cases append the generator type as a trailing comment (`; % NG`)
//! that the header does not declare. It is detected from the first data row,
//! kept from the generator row, and dropped from the cost row.

use pglib_core::{
    CaseError, CaseResult, DiagnosticIssue, Diagnostics, Severity, TypedDataset, LINE_IDX_COLUMN,
};
use tracing::debug;

use crate::config::{LoadOptions, ShortRowPolicy};
use crate::extract::RawTable;
use crate::tables::TableKind;

/// Name given to the undeclared trailing generator type field.
pub const GENERATOR_TYPE_COLUMN: &str = "generator_type";

/// Cost header fields kept ahead of the coefficients (model, startup, shutdown, n).
const COST_HEADER_FIELDS: usize = 4;
/// Position of the coefficient count in a cost row.
const COEFFICIENT_COUNT_FIELD: usize = 3;

pub fn normalize_bus(
    table: &RawTable,
    options: &LoadOptions,
    diag: &mut Diagnostics,
) -> CaseResult<TypedDataset> {
    positional(table, options, diag, false)
}

/// Branch table plus `line_idx`, the 0-based row position.
pub fn normalize_branch(
    table: &RawTable,
    options: &LoadOptions,
    diag: &mut Diagnostics,
) -> CaseResult<TypedDataset> {
    positional(table, options, diag, true)
}

/// Merge generator data with generator cost data, one record per generator.
pub fn normalize_generator(
    gen: &RawTable,
    cost: &RawTable,
    options: &LoadOptions,
    diag: &mut Diagnostics,
) -> CaseResult<TypedDataset> {
    let gen_header = header_of(gen)?;
    let cost_header = header_of(cost)?;
    if cost_header.len() < COST_HEADER_FIELDS {
        return Err(CaseError::malformed_header(
            &cost.name,
            format!(
                "header has {} fields; expected at least {}",
                cost_header.len(),
                COST_HEADER_FIELDS
            ),
        ));
    }

    let gen_rows = gen.data_rows();
    let cost_rows = cost.data_rows();
    if gen_rows.len() != cost_rows.len() {
        return Err(CaseError::misaligned(
            TableKind::GeneratorData.name(),
            format!(
                "{} generator rows but {} generator cost rows",
                gen_rows.len(),
                cost_rows.len()
            ),
        ));
    }

    let has_type = options.detect_generator_type
        && detect_generator_type(gen_header, gen_rows.first().map(Vec::as_slice));
    let n = match cost_rows.first() {
        Some(first) => coefficient_count(&cost.name, first, options.max_cost_coefficients)?,
        None => 0,
    };
    debug!(
        generators = gen_rows.len(),
        has_type,
        coefficients = n,
        "merging generator and cost tables"
    );

    let mut names = gen_header.to_vec();
    if has_type {
        names.push(GENERATOR_TYPE_COLUMN.to_string());
    }
    names.extend(cost_header[..COST_HEADER_FIELDS].iter().cloned());
    names.extend(cost_coefficient_names(n));

    let gen_width = gen_header.len() + usize::from(has_type);
    let cost_width = COST_HEADER_FIELDS + n;

    let mut rows = Vec::with_capacity(gen_rows.len());
    for (i, (gen_row, cost_row)) in gen_rows.iter().zip(cost_rows).enumerate() {
        let cost_fields = if has_type {
            cost_row.split_last().map(|(_, rest)| rest).unwrap_or(&[])
        } else {
            cost_row.as_slice()
        };

        let mut merged = fit_row(gen, i, gen_row, gen_width, options.short_rows, diag)?;
        merged.extend(fit_row(
            cost,
            i,
            cost_fields,
            cost_width,
            options.short_rows,
            diag,
        )?);
        rows.push(merged);
    }

    TypedDataset::from_text_rows(TableKind::GeneratorData.name(), names, rows)
}

/// Whether generator rows carry an undeclared trailing type field.
///
/// True only when the first data row has exactly one field more than the
/// header. With no data row, or any other width, the answer is false.
pub fn detect_generator_type(header: &[String], first_row: Option<&[String]>) -> bool {
    first_row.is_some_and(|row| row.len() == header.len() + 1)
}

/// Column names for `n` cost coefficients, highest order first.
pub fn cost_coefficient_names(n: usize) -> Vec<String> {
    (0..n).rev().map(|k| format!("c({})", k)).collect()
}

fn coefficient_count(table: &str, first_row: &[String], max: usize) -> CaseResult<usize> {
    let raw = first_row.get(COEFFICIENT_COUNT_FIELD).ok_or_else(|| {
        CaseError::malformed_header(
            table,
            format!(
                "first data row has {} fields; coefficient count expected in field {}",
                first_row.len(),
                COEFFICIENT_COUNT_FIELD + 1
            ),
        )
    })?;
    let n = raw.parse::<usize>().map_err(|_| {
        CaseError::malformed_header(table, format!("coefficient count '{}' is not an integer", raw))
    })?;
    if n > max {
        return Err(CaseError::malformed_header(
            table,
            format!("coefficient count {} exceeds the limit of {}", n, max),
        ));
    }
    Ok(n)
}

fn positional(
    table: &RawTable,
    options: &LoadOptions,
    diag: &mut Diagnostics,
    with_line_idx: bool,
) -> CaseResult<TypedDataset> {
    let header = header_of(table)?;
    let mut names = header.to_vec();
    if with_line_idx {
        names.push(LINE_IDX_COLUMN.to_string());
    }

    let rows = table
        .data_rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut fitted = fit_row(table, i, row, header.len(), options.short_rows, diag)?;
            if with_line_idx {
                fitted.push(Some(i.to_string()));
            }
            Ok(fitted)
        })
        .collect::<CaseResult<Vec<_>>>()?;

    TypedDataset::from_text_rows(&table.name, names, rows)
}

fn header_of(table: &RawTable) -> CaseResult<&[String]> {
    table
        .header()
        .ok_or_else(|| CaseError::malformed_header(&table.name, "table has no header row"))
}

/// Check a data row against `width`, padding short rows under `Fill`.
fn fit_row(
    table: &RawTable,
    row: usize,
    fields: &[String],
    width: usize,
    policy: ShortRowPolicy,
    diag: &mut Diagnostics,
) -> CaseResult<Vec<Option<String>>> {
    let line = table.line_of(row + 1);
    let at = match line {
        Some(l) => format!("data row {} (line {})", row, l),
        None => format!("data row {}", row),
    };

    if fields.len() > width {
        return Err(CaseError::misaligned(
            &table.name,
            format!("{} has {} fields; expected {}", at, fields.len(), width),
        ));
    }

    let missing = width - fields.len();
    if missing > 0 {
        match policy {
            ShortRowPolicy::Reject => {
                return Err(CaseError::misaligned(
                    &table.name,
                    format!("{} has {} fields; expected {}", at, fields.len(), width),
                ));
            }
            ShortRowPolicy::Fill => {
                let message = format!("padded {} missing field(s) with null", missing);
                let entity = format!("{} row {}", table.name, row);
                let mut issue =
                    DiagnosticIssue::new(Severity::Warning, "alignment", message).with_entity(entity);
                if let Some(l) = line {
                    issue = issue.with_line(l);
                }
                diag.add(issue);
            }
        }
    }

    let mut out: Vec<Option<String>> = fields.iter().cloned().map(Some).collect();
    out.resize(width, None);
    Ok(out)
}
