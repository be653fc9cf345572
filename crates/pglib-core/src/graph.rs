//! Directed multigraph view over normalized case datasets.
//!
//! Buses become nodes, branches become edges from `fbus` to `tbus` keyed by
//! `line_idx`. Parallel branches between the same buses stay distinct edges.
//! The projection is read-only; it never re-parses text.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::TypedDataset;
use crate::diagnostics::Diagnostics;
use crate::error::{CaseError, CaseResult};
use crate::value::Value;

/// Generator column holding the host bus identifier.
pub const GENERATOR_BUS_COLUMN: &str = "bus";
/// Branch column holding the sending-end bus.
pub const FROM_BUS_COLUMN: &str = "fbus";
/// Branch column holding the receiving-end bus.
pub const TO_BUS_COLUMN: &str = "tbus";
/// Synthetic branch column holding the 0-based row position.
pub const LINE_IDX_COLUMN: &str = "line_idx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusId(i64);

impl BusId {
    #[inline]
    pub fn new(value: i64) -> Self {
        BusId(value)
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Read an identifier cell. Integral floats (`3.0`) are accepted.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(BusId(*v)),
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                Some(BusId(*v as i64))
            }
            _ => None,
        }
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bus {}", self.0)
    }
}

/// Node weight: one bus and the generator it hosts, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusNode {
    pub id: BusId,
    pub fields: BTreeMap<String, Value>,
    /// Fields of the bus's generator row; empty when the bus hosts none.
    pub generator_data: BTreeMap<String, Value>,
}

/// Edge weight: one branch row minus its endpoint and key columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchEdge {
    pub line_idx: usize,
    pub from_bus: BusId,
    pub to_bus: BusId,
    pub fields: BTreeMap<String, Value>,
}

/// Directed multigraph of buses and branches.
#[derive(Debug, Clone, Default)]
pub struct CaseGraph {
    graph: DiGraph<BusNode, BranchEdge>,
    bus_index: HashMap<BusId, NodeIndex>,
    line_index: HashMap<usize, EdgeIndex>,
}

impl CaseGraph {
    /// The underlying petgraph graph, for algorithms beyond the lookups here.
    pub fn graph(&self) -> &DiGraph<BusNode, BranchEdge> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, bus: BusId) -> Option<&BusNode> {
        self.bus_index.get(&bus).map(|idx| &self.graph[*idx])
    }

    /// Branch with the given `line_idx` key.
    pub fn edge(&self, line_idx: usize) -> Option<&BranchEdge> {
        self.line_index.get(&line_idx).map(|idx| &self.graph[*idx])
    }

    pub fn buses(&self) -> impl Iterator<Item = &BusNode> {
        self.graph.node_weights()
    }

    /// Every branch from `from` to `to`, including parallel lines.
    pub fn edges_between(&self, from: BusId, to: BusId) -> Vec<&BranchEdge> {
        let (Some(a), Some(b)) = (self.bus_index.get(&from), self.bus_index.get(&to)) else {
            return Vec::new();
        };
        let mut edges: Vec<&BranchEdge> = self
            .graph
            .edges_connecting(*a, *b)
            .map(|e| e.weight())
            .collect();
        edges.sort_by_key(|e| e.line_idx);
        edges
    }

    /// Buses reachable over one outgoing branch.
    pub fn successors(&self, bus: BusId) -> Vec<BusId> {
        let Some(idx) = self.bus_index.get(&bus) else {
            return Vec::new();
        };
        let mut out: Vec<BusId> = self
            .graph
            .edges(*idx)
            .map(|e| self.graph[e.target()].id)
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

/// Project bus, generator and branch datasets onto a [`CaseGraph`].
pub fn to_graph(
    bus: &TypedDataset,
    gen: &TypedDataset,
    branch: &TypedDataset,
) -> CaseResult<CaseGraph> {
    let mut diag = Diagnostics::new();
    to_graph_with_diagnostics(bus, gen, branch, &mut diag)
}

/// [`to_graph`], recording generator/bus anomalies in `diag`.
pub fn to_graph_with_diagnostics(
    bus: &TypedDataset,
    gen: &TypedDataset,
    branch: &TypedDataset,
    diag: &mut Diagnostics,
) -> CaseResult<CaseGraph> {
    let id_column = bus
        .columns()
        .first()
        .map(|c| c.name.clone())
        .ok_or_else(|| missing_column("bus", "bus_i"))?;

    let generators = generators_by_bus(gen, diag)?;

    let mut out = CaseGraph::default();
    for row in 0..bus.len() {
        let id = bus_id_at(bus, "bus", row, &id_column)?;
        let fields = bus.row_fields(row).unwrap_or_default();
        let generator_data = generators
            .get(&id)
            .and_then(|gen_row| gen.row_fields(*gen_row))
            .unwrap_or_default();
        let node = BusNode {
            id,
            fields,
            generator_data,
        };

        if let Some(existing) = out.bus_index.get(&id) {
            diag.add_warning_with_entity(
                "graph",
                "duplicate bus identifier; later row replaces earlier",
                &id.to_string(),
            );
            out.graph[*existing] = node;
        } else {
            let idx = out.graph.add_node(node);
            out.bus_index.insert(id, idx);
        }
    }

    for id in generators.keys() {
        if !out.bus_index.contains_key(id) {
            diag.add_warning_with_entity("graph", "generator on unknown bus ignored", &id.to_string());
        }
    }

    if branch.column_index(LINE_IDX_COLUMN).is_none() {
        return Err(missing_column("branch", LINE_IDX_COLUMN));
    }
    for row in 0..branch.len() {
        let from_bus = bus_id_at(branch, "branch", row, FROM_BUS_COLUMN)?;
        let to_bus = bus_id_at(branch, "branch", row, TO_BUS_COLUMN)?;
        let line_idx = line_idx_at(branch, row)?;

        let a = *out.bus_index.get(&from_bus).ok_or_else(|| CaseError::UnknownBus {
            line_idx,
            bus: from_bus.value(),
        })?;
        let b = *out.bus_index.get(&to_bus).ok_or_else(|| CaseError::UnknownBus {
            line_idx,
            bus: to_bus.value(),
        })?;

        let mut fields = branch.row_fields(row).unwrap_or_default();
        for key in [FROM_BUS_COLUMN, TO_BUS_COLUMN, LINE_IDX_COLUMN] {
            fields.remove(key);
        }

        let edge = out.graph.add_edge(
            a,
            b,
            BranchEdge {
                line_idx,
                from_bus,
                to_bus,
                fields,
            },
        );
        out.line_index.insert(line_idx, edge);
    }

    debug!(
        buses = out.node_count(),
        branches = out.edge_count(),
        "built case graph"
    );
    Ok(out)
}

/// Map each host bus to the row of its generator; later rows win.
fn generators_by_bus(
    gen: &TypedDataset,
    diag: &mut Diagnostics,
) -> CaseResult<BTreeMap<BusId, usize>> {
    if gen.column_index(GENERATOR_BUS_COLUMN).is_none() {
        return Err(missing_column("generator", GENERATOR_BUS_COLUMN));
    }
    let mut hosts = BTreeMap::new();
    for row in 0..gen.len() {
        let id = bus_id_at(gen, "generator", row, GENERATOR_BUS_COLUMN)?;
        if hosts.insert(id, row).is_some() {
            diag.add_warning_with_entity(
                "graph",
                "bus hosts several generators; last generator row kept",
                &id.to_string(),
            );
        }
    }
    Ok(hosts)
}

fn bus_id_at(ds: &TypedDataset, table: &str, row: usize, column: &str) -> CaseResult<BusId> {
    let value = ds
        .value(row, column)
        .ok_or_else(|| missing_column(table, column))?;
    BusId::from_value(value).ok_or_else(|| CaseError::InvalidBusId {
        table: table.to_string(),
        row,
        value: value.to_string(),
    })
}

/// Branch key of `row`; integral floats are accepted as for bus identifiers.
fn line_idx_at(branch: &TypedDataset, row: usize) -> CaseResult<usize> {
    let value = branch
        .value(row, LINE_IDX_COLUMN)
        .ok_or_else(|| missing_column("branch", LINE_IDX_COLUMN))?;
    let key = match value {
        Value::Int(v) => usize::try_from(*v).ok(),
        Value::Float(v) if v.is_finite() && v.fract() == 0.0 && *v >= 0.0 => Some(*v as usize),
        _ => None,
    };
    key.ok_or_else(|| CaseError::InvalidLineIdx {
        row,
        value: value.to_string(),
    })
}

fn missing_column(table: &str, column: &str) -> CaseError {
    CaseError::MissingColumn {
        table: table.to_string(),
        column: column.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(names: &[&str], rows: &[&[&str]]) -> TypedDataset {
        TypedDataset::from_text_rows(
            "test",
            names.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| Some(s.to_string())).collect())
                .collect(),
        )
        .expect("build dataset")
    }

    fn three_bus() -> (TypedDataset, TypedDataset, TypedDataset) {
        let bus = dataset(
            &["bus_i", "type", "Pd"],
            &[&["1", "3", "0.0"], &["2", "1", "300.0"], &["3", "2", "300.0"]],
        );
        let gen = dataset(&["bus", "Pg"], &[&["1", "20.0"], &["3", "260.0"]]);
        let branch = dataset(
            &["fbus", "tbus", "r", "line_idx"],
            &[
                &["1", "2", "0.00281", "0"],
                &["2", "3", "0.00108", "1"],
                &["2", "3", "0.00297", "2"],
            ],
        );
        (bus, gen, branch)
    }

    #[test]
    fn test_nodes_carry_generator_data() {
        let (bus, gen, branch) = three_bus();
        let graph = to_graph(&bus, &gen, &branch).expect("graph");

        assert_eq!(graph.node_count(), 3);
        let host = graph.node(BusId::new(3)).unwrap();
        assert_eq!(host.fields.get("type"), Some(&Value::Int(2)));
        assert_eq!(host.generator_data.get("Pg"), Some(&Value::Float(260.0)));
        assert!(graph.node(BusId::new(2)).unwrap().generator_data.is_empty());
    }

    #[test]
    fn test_parallel_branches_are_distinct_edges() {
        let (bus, gen, branch) = three_bus();
        let graph = to_graph(&bus, &gen, &branch).expect("graph");

        assert_eq!(graph.edge_count(), 3);
        let parallel = graph.edges_between(BusId::new(2), BusId::new(3));
        assert_eq!(parallel.len(), 2);
        assert_eq!(parallel[0].line_idx, 1);
        assert_eq!(parallel[1].line_idx, 2);
        assert!(graph.edges_between(BusId::new(3), BusId::new(2)).is_empty());
        assert_eq!(graph.successors(BusId::new(2)), vec![BusId::new(3)]);
    }

    #[test]
    fn test_edge_fields_exclude_endpoints_and_key() {
        let (bus, gen, branch) = three_bus();
        let graph = to_graph(&bus, &gen, &branch).expect("graph");

        let edge = graph.edge(0).unwrap();
        assert_eq!(edge.from_bus, BusId::new(1));
        assert_eq!(edge.to_bus, BusId::new(2));
        assert_eq!(edge.fields.len(), 1);
        assert_eq!(edge.fields.get("r"), Some(&Value::Float(0.00281)));
    }

    #[test]
    fn test_shared_generator_bus_last_wins() {
        let (bus, _, branch) = three_bus();
        let gen = dataset(&["bus", "Pg"], &[&["1", "20.0"], &["1", "40.0"]]);
        let mut diag = Diagnostics::new();
        let graph = to_graph_with_diagnostics(&bus, &gen, &branch, &mut diag).expect("graph");

        let host = graph.node(BusId::new(1)).unwrap();
        assert_eq!(host.generator_data.get("Pg"), Some(&Value::Float(40.0)));
        assert_eq!(diag.issues_by_category("graph").count(), 1);
    }

    #[test]
    fn test_unknown_branch_bus_rejected() {
        let (bus, gen, _) = three_bus();
        let branch = dataset(&["fbus", "tbus", "line_idx"], &[&["1", "9", "0"]]);
        let err = to_graph(&bus, &gen, &branch).unwrap_err();
        assert!(matches!(err, CaseError::UnknownBus { line_idx: 0, bus: 9 }));
    }

    #[test]
    fn test_missing_line_idx_column_rejected() {
        let (bus, gen, _) = three_bus();
        let branch = dataset(&["fbus", "tbus"], &[&["1", "2"]]);
        let err = to_graph(&bus, &gen, &branch).unwrap_err();
        assert!(matches!(err, CaseError::MissingColumn { ref column, .. } if column == "line_idx"));
    }

    #[test]
    fn test_generator_on_unknown_bus_ignored() {
        let (bus, _, branch) = three_bus();
        let gen = dataset(&["bus", "Pg"], &[&["1", "20.0"], &["7", "55.0"]]);
        let mut diag = Diagnostics::new();
        let graph = to_graph_with_diagnostics(&bus, &gen, &branch, &mut diag).expect("graph");

        assert_eq!(graph.node_count(), 3);
        assert!(graph.node(BusId::new(7)).is_none());
        assert!(graph
            .buses()
            .all(|node| node.generator_data.get("Pg") != Some(&Value::Float(55.0))));
        let issues: Vec<_> = diag.issues_by_category("graph").collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].entity.as_deref(), Some("Bus 7"));
    }

    #[test]
    fn test_non_integer_line_idx_rejected() {
        let (bus, gen, _) = three_bus();
        let branch = dataset(
            &["fbus", "tbus", "line_idx"],
            &[&["1", "2", "0"], &["2", "3", "1.5"]],
        );
        let err = to_graph(&bus, &gen, &branch).unwrap_err();
        assert!(matches!(
            err,
            CaseError::InvalidLineIdx { row: 1, ref value } if value == "1.5"
        ));

        let negative = dataset(&["fbus", "tbus", "line_idx"], &[&["1", "2", "-1"]]);
        let err = to_graph(&bus, &gen, &negative).unwrap_err();
        assert!(matches!(err, CaseError::InvalidLineIdx { row: 0, .. }));
    }

    #[test]
    fn test_graph_accessor_matches_lookups() {
        let (bus, gen, branch) = three_bus();
        let graph = to_graph(&bus, &gen, &branch).expect("graph");

        let inner = graph.graph();
        assert_eq!(inner.node_count(), graph.node_count());
        assert_eq!(inner.edge_count(), graph.edge_count());
        let keys: Vec<usize> = inner.edge_weights().map(|e| e.line_idx).collect();
        assert_eq!(keys, vec![0, 1, 2]);
    }

    #[test]
    fn test_bus_id_from_integral_float() {
        assert_eq!(BusId::from_value(&Value::Float(4.0)), Some(BusId::new(4)));
        assert_eq!(BusId::from_value(&Value::Float(4.5)), None);
        assert_eq!(BusId::from_value(&Value::from("NG")), None);
    }
}
