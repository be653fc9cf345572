//! CSV text form of a dataset.
//!
//! Writing then reading a dataset re-infers its column types from text; the
//! result equals the original. Nulls are written as empty fields and read
//! back as nulls.

use pglib_core::{CaseError, CaseResult, TypedDataset};

/// Render `dataset` as CSV with a header record.
pub fn write_csv(dataset: &TypedDataset) -> CaseResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(dataset.column_names())
        .map_err(|e| csv_error("<header>", e))?;
    for row in dataset.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| csv_error("<row>", e))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CaseError::type_inference("<csv>", e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CaseError::type_inference("<csv>", e.to_string()))
}

/// Parse CSV text and infer one type per column.
pub fn read_csv(table: &str, text: &str) -> CaseResult<TypedDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let names: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error("<header>", e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error("<row>", e))?;
        rows.push(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect(),
        );
    }

    TypedDataset::from_text_rows(table, names, rows)
}

fn csv_error(column: &str, err: csv::Error) -> CaseError {
    CaseError::type_inference(column, err.to_string())
}
