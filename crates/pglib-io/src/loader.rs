//! Top-level case loading.

use std::fs;
use std::path::Path;

use pglib_core::{
    to_graph_with_diagnostics, CaseError, CaseGraph, CaseResult, Diagnostics, TypedDataset,
};
use serde::Serialize;
use tracing::debug;

use crate::config::LoadOptions;
use crate::extract::extract_tables_with_diagnostics;
use crate::metadata::{scan_metadata, CaseMetadata};
use crate::normalize::{normalize_branch, normalize_bus, normalize_generator};
use crate::tables::CaseTables;

/// The three normalized datasets of one case file.
#[derive(Debug, Clone, Serialize)]
pub struct Case {
    pub metadata: CaseMetadata,
    pub bus: TypedDataset,
    pub generator: TypedDataset,
    pub branch: TypedDataset,
}

impl Case {
    /// `(bus, generator, branch)`, in that order.
    pub fn into_parts(self) -> (TypedDataset, TypedDataset, TypedDataset) {
        (self.bus, self.generator, self.branch)
    }

    /// Project the datasets onto a bus/branch multigraph.
    pub fn to_graph(&self, diag: &mut Diagnostics) -> CaseResult<CaseGraph> {
        to_graph_with_diagnostics(&self.bus, &self.generator, &self.branch, diag)
    }
}

/// A loaded case plus everything worked around while loading it.
#[derive(Debug, Clone, Serialize)]
pub struct LoadResult {
    pub case: Case,
    pub diagnostics: Diagnostics,
}

/// Load a case file with default options and return `(bus, generator, branch)`.
pub fn load(path: impl AsRef<Path>) -> CaseResult<(TypedDataset, TypedDataset, TypedDataset)> {
    Ok(load_case(path, &LoadOptions::default())?.case.into_parts())
}

/// Load a case file from disk.
pub fn load_case(path: impl AsRef<Path>, options: &LoadOptions) -> CaseResult<LoadResult> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| CaseError::io(path, e))?;
    debug!(path = %path.display(), bytes = text.len(), "read case file");
    load_case_str(&text, options)
}

/// Load a case from in-memory text.
pub fn load_case_str(text: &str, options: &LoadOptions) -> CaseResult<LoadResult> {
    let mut diagnostics = Diagnostics::new();

    let mut extracted = extract_tables_with_diagnostics(text, &mut diagnostics);
    let tables = CaseTables::resolve(&mut extracted)?;
    if !extracted.is_empty() {
        debug!(
            ignored = ?extracted.keys().collect::<Vec<_>>(),
            "tables not used by the normalizer"
        );
    }

    let bus = normalize_bus(&tables.bus, options, &mut diagnostics)?;
    let generator = normalize_generator(
        &tables.generator,
        &tables.generator_cost,
        options,
        &mut diagnostics,
    )?;
    let branch = normalize_branch(&tables.branch, options, &mut diagnostics)?;
    let metadata = scan_metadata(text);

    debug!(
        case = metadata.name.as_deref().unwrap_or("<unnamed>"),
        buses = bus.len(),
        generators = generator.len(),
        branches = branch.len(),
        issues = diagnostics.issues.len(),
        "loaded case"
    );

    Ok(LoadResult {
        case: Case {
            metadata,
            bus,
            generator,
            branch,
        },
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShortRowPolicy;
    use pglib_core::{BusId, Value};

    const TINY: &str = "\
%% bus data
% bus_i type
1 3
2 1
];
%% generator data
% bus Pg
1 10
];
%% generator cost data
% model startup shutdown n
2 0 0 2
];
%% branch data
% fbus tbus
1 2
];
";

    #[test]
    fn test_tiny_case_fill() {
        let result = load_case_str(TINY, &LoadOptions::default()).expect("load");
        let (bus, gen, branch) = result.case.into_parts();

        assert_eq!(bus.len(), 2);
        assert_eq!(bus.value(1, "bus_i"), Some(&Value::Int(2)));

        assert_eq!(gen.len(), 1);
        assert_eq!(
            gen.column_names().collect::<Vec<_>>(),
            vec!["bus", "Pg", "model", "startup", "shutdown", "n", "c(1)", "c(0)"]
        );
        assert_eq!(gen.value(0, "bus"), Some(&Value::Int(1)));
        assert_eq!(gen.value(0, "Pg"), Some(&Value::Int(10)));
        assert_eq!(gen.value(0, "model"), Some(&Value::Int(2)));
        assert_eq!(gen.value(0, "startup"), Some(&Value::Int(0)));
        assert_eq!(gen.value(0, "shutdown"), Some(&Value::Int(0)));
        assert_eq!(gen.value(0, "c(1)"), Some(&Value::Null));
        assert_eq!(gen.value(0, "c(0)"), Some(&Value::Null));

        assert_eq!(branch.len(), 1);
        assert_eq!(branch.value(0, "fbus"), Some(&Value::Int(1)));
        assert_eq!(branch.value(0, "tbus"), Some(&Value::Int(2)));
        assert_eq!(branch.value(0, "line_idx"), Some(&Value::Int(0)));

        assert_eq!(result.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_tiny_case_reject() {
        let options = LoadOptions {
            short_rows: ShortRowPolicy::Reject,
            ..LoadOptions::default()
        };
        let err = load_case_str(TINY, &options).unwrap_err();
        assert!(matches!(err, CaseError::MisalignedTable { .. }));
    }

    #[test]
    fn test_huge_coefficient_count_is_rejected() {
        let text = TINY.replace("2 0 0 2\n", "2 0 0 2000000\n");
        let err = load_case_str(&text, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, CaseError::MalformedHeader { .. }), "got {err}");
    }

    #[test]
    fn test_missing_generator_tables() {
        let text = "%% bus data\n% bus_i\n1\n];\n%% branch data\n% fbus tbus\n1 1\n];\n";
        let err = load_case_str(text, &LoadOptions::default()).unwrap_err();
        match err {
            CaseError::MissingTable { name } => {
                assert!(name == "generator data" || name == "generator cost data")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_case_graph() {
        let result = load_case_str(TINY, &LoadOptions::default()).expect("load");
        let mut diag = Diagnostics::new();
        let graph = result.case.to_graph(&mut diag).expect("graph");

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        let host = graph.node(BusId::new(1)).unwrap();
        assert_eq!(host.generator_data.get("Pg"), Some(&Value::Int(10)));
        assert!(diag.issues.is_empty());
    }

    #[test]
    fn test_result_serializes_to_json() {
        let result = load_case_str(TINY, &LoadOptions::default()).expect("load");
        let json = serde_json::to_value(&result).expect("serialize");

        assert_eq!(json["case"]["bus"]["columns"][0]["name"], "bus_i");
        assert_eq!(json["case"]["bus"]["columns"][0]["dtype"], "integer");
        assert_eq!(json["case"]["branch"]["rows"][0][2], 0);
        assert!(json["case"]["generator"]["rows"][0][7].is_null());
        assert_eq!(json["diagnostics"]["issues"][0]["category"], "alignment");
    }

    #[test]
    fn test_missing_file() {
        let err = load("/nonexistent/case.m").unwrap_err();
        assert!(matches!(err, CaseError::Io { .. }));
    }
}
