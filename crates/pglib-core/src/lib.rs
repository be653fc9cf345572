//! # pglib-core: Case Dataset Model
//!
//! Typed tabular datasets for MATPOWER / PGLib-OPF case files and the graph
//! view built on top of them.
//!
//! ## Design Philosophy
//!
//! A case file is loaded into three flat tables (buses, generators,
//! branches). Columns keep the names the file declares; types are inferred
//! per column rather than hard-coded, so cases with extra or renamed columns
//! still load. Anything that needs topology (connectivity, neighbours,
//! parallel lines) goes through [`CaseGraph`], a `petgraph` directed
//! multigraph projected from the tables.
//!
//! ## Quick Start
//!
//! ```rust
//! use pglib_core::{to_graph, BusId, TypedDataset, Value};
//!
//! fn table(names: &[&str], rows: &[&[&str]]) -> TypedDataset {
//!     TypedDataset::from_text_rows(
//!         "example",
//!         names.iter().map(|s| s.to_string()).collect(),
//!         rows.iter()
//!             .map(|r| r.iter().map(|s| Some(s.to_string())).collect())
//!             .collect(),
//!     )
//!     .unwrap()
//! }
//!
//! let bus = table(&["bus_i", "type"], &[&["1", "3"], &["2", "1"]]);
//! let gen = table(&["bus", "Pg"], &[&["1", "10"]]);
//! let branch = table(&["fbus", "tbus", "line_idx"], &[&["1", "2", "0"]]);
//!
//! let graph = to_graph(&bus, &gen, &branch).unwrap();
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(
//!     graph.node(BusId::new(1)).unwrap().generator_data.get("Pg"),
//!     Some(&Value::Int(10))
//! );
//! ```
//!
//! ## Modules
//!
//! - [`value`] - Cell values and column scalar types
//! - [`infer`] - Per-column type inference
//! - [`dataset`] - [`TypedDataset`] and [`Column`]
//! - [`graph`] - Bus/branch multigraph view
//! - [`diagnostics`] - Non-fatal issues collected during a load
//! - [`error`] - [`CaseError`] taxonomy
//!
//! ## Integration with pglib-io
//!
//! The pglib-io crate extracts raw tables from case-file text and normalizes
//! them into the datasets defined here.

pub mod dataset;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod infer;
pub mod value;

pub use dataset::{Column, TypedDataset};
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{CaseError, CaseResult};
pub use graph::{
    to_graph, to_graph_with_diagnostics, BranchEdge, BusId, BusNode, CaseGraph,
    FROM_BUS_COLUMN, GENERATOR_BUS_COLUMN, LINE_IDX_COLUMN, TO_BUS_COLUMN,
};
pub use infer::infer_column_type;
pub use value::{ScalarType, Value};
