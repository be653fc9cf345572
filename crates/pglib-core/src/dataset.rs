//! Typed tabular datasets produced by the normalizer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CaseError, CaseResult};
use crate::infer::infer_column_type;
use crate::value::{ScalarType, Value};

/// A named column and its inferred type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub dtype: ScalarType,
}

/// An ordered set of typed columns and positionally aligned rows.
///
/// Every row holds exactly one value per column. Row order is source order,
/// so a row's position doubles as its 0-based element index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypedDataset {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl TypedDataset {
    /// Build a dataset from text fields, inferring one type per column.
    ///
    /// `table` names the source in errors. `None` fields become [`Value::Null`].
    pub fn from_text_rows(
        table: &str,
        names: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> CaseResult<Self> {
        let width = names.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(CaseError::misaligned(
                table,
                format!(
                    "row {} has {} fields but the header declares {}",
                    idx,
                    row.len(),
                    width
                ),
            ));
        }

        let dtypes: Vec<ScalarType> = (0..width)
            .map(|col| infer_column_type(rows.iter().map(|r| r[col].as_deref())))
            .collect();

        let typed_rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(names.iter().zip(&dtypes))
                    .map(|(raw, (name, dtype))| match raw {
                        None => Ok(Value::Null),
                        Some(raw) => dtype.parse(&raw).ok_or_else(|| {
                            CaseError::type_inference(
                                name.as_str(),
                                format!("'{}' does not parse as {}", raw, dtype),
                            )
                        }),
                    })
                    .collect::<CaseResult<Vec<_>>>()
            })
            .collect::<CaseResult<Vec<_>>>()?;

        let columns = names
            .into_iter()
            .zip(dtypes)
            .map(|(name, dtype)| Column { name, dtype })
            .collect();

        Ok(Self {
            columns,
            rows: typed_rows,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Position of the first column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_type(&self, name: &str) -> Option<ScalarType> {
        self.column_index(name).map(|idx| self.columns[idx].dtype)
    }

    /// Cell at `row` in column `name`.
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// All values of column `name`, in row order.
    pub fn column_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[col]))
    }

    /// Row `row` as a name-keyed mapping. Later duplicate names win.
    pub fn row_fields(&self, row: usize) -> Option<BTreeMap<String, Value>> {
        let values = self.rows.get(row)?;
        Some(
            self.columns
                .iter()
                .zip(values)
                .map(|(c, v)| (c.name.clone(), v.clone()))
                .collect(),
        )
    }
}
