//! The four tables a case file must provide.

use std::collections::BTreeMap;
use std::fmt;

use pglib_core::{CaseError, CaseResult};

use crate::extract::RawTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Bus,
    GeneratorData,
    GeneratorCost,
    Branch,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Bus,
        TableKind::GeneratorData,
        TableKind::GeneratorCost,
        TableKind::Branch,
    ];

    /// Name on the table's `%% ` delimiter line.
    pub fn name(self) -> &'static str {
        match self {
            TableKind::Bus => "bus data",
            TableKind::GeneratorData => "generator data",
            TableKind::GeneratorCost => "generator cost data",
            TableKind::Branch => "branch data",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The required raw tables, resolved once after extraction.
#[derive(Debug, Clone)]
pub struct CaseTables {
    pub bus: RawTable,
    pub generator: RawTable,
    pub generator_cost: RawTable,
    pub branch: RawTable,
}

impl CaseTables {
    /// Take the required tables out of `tables`, leaving any others behind.
    ///
    /// Tables are looked up in [`TableKind::ALL`] order; the first missing
    /// one is reported.
    pub fn resolve(tables: &mut BTreeMap<String, RawTable>) -> CaseResult<Self> {
        let mut take = |kind: TableKind| {
            tables
                .remove(kind.name())
                .ok_or_else(|| CaseError::missing_table(kind.name()))
        };

        Ok(Self {
            bus: take(TableKind::Bus)?,
            generator: take(TableKind::GeneratorData)?,
            generator_cost: take(TableKind::GeneratorCost)?,
            branch: take(TableKind::Branch)?,
        })
    }

    pub fn get(&self, kind: TableKind) -> &RawTable {
        match kind {
            TableKind::Bus => &self.bus,
            TableKind::GeneratorData => &self.generator,
            TableKind::GeneratorCost => &self.generator_cost,
            TableKind::Branch => &self.branch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_tables;

    #[test]
    fn test_names_round_trip() {
        for kind in TableKind::ALL {
            assert_eq!(TableKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TableKind::from_name("bus names"), None);
    }

    #[test]
    fn test_resolve_reports_first_missing() {
        let mut tables = extract_tables("%% bus data\n% a\n];\n%% branch data\n% b\n];\n");
        let err = CaseTables::resolve(&mut tables).unwrap_err();
        assert!(matches!(err, CaseError::MissingTable { ref name } if name == "generator data"));
    }

    #[test]
    fn test_resolve_leaves_extra_tables() {
        let text = "%% bus data\n];\n%% generator data\n];\n%% generator cost data\n];\n\
                    %% branch data\n];\n%% bus names\n];\n";
        let mut tables = extract_tables(text);
        let resolved = CaseTables::resolve(&mut tables).expect("all tables present");

        assert_eq!(resolved.get(TableKind::GeneratorCost).name, "generator cost data");
        assert_eq!(tables.len(), 1);
        assert!(tables.contains_key("bus names"));
    }
}
