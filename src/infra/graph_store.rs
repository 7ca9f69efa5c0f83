// ============================================================
// Layer 6 — Similarity / Call Graph Store
// ============================================================
// Loads the four repository-level relations once per run:
//
//   commit2commit.json      — commit ↔ commit similarity
//   method2method.json      — method ↔ method co-change similarity
//   method_call_method.json — direct method → method call edges
//   method_call_graph.json  — general call graph (graph distance)
//
// Weighted relations are JSON objects of objects:
//   { "A.run()": { "B.stop()": 0.4, ... }, ... }
// Call relations are adjacency lists:
//   { "A.run()": ["B.stop()", "C.init()"], ... }
//
// All four files are required. A missing file aborts the run,
// since no dataset is consistent without them.
//
// The loaded SimilarityGraphs value is read-only and passed by
// shared reference to every component that needs it.

use anyhow::{Context, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::de::DeserializeOwned;
use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::PrepareError;

pub const COMMIT_SIMILARITY_FILE: &str = "commit2commit.json";
pub const METHOD_SIMILARITY_FILE: &str = "method2method.json";
pub const METHOD_CALLS_FILE:      &str = "method_call_method.json";
pub const CALL_GRAPH_FILE:        &str = "method_call_graph.json";

// ─── SimilarityMatrix ─────────────────────────────────────────────────────────
/// Sparse symmetric similarity between identifiers (commits or methods)
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    rows: HashMap<String, HashMap<String, f64>>,
}

impl SimilarityMatrix {
    pub fn new(rows: HashMap<String, HashMap<String, f64>>) -> Self {
        Self { rows }
    }

    /// Build from undirected edges; each edge is stored in both rows
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = (&'a str, &'a str, f64)>) -> Self {
        let mut rows: HashMap<String, HashMap<String, f64>> = HashMap::new();
        for (a, b, w) in edges {
            rows.entry(a.to_string()).or_default().insert(b.to_string(), w);
            rows.entry(b.to_string()).or_default().insert(a.to_string(), w);
        }
        Self { rows }
    }

    /// Similarity of `a` and `b`, 0.0 when unrelated
    pub fn weight(&self, a: &str, b: &str) -> f64 {
        self.rows
            .get(a)
            .and_then(|row| row.get(b))
            .or_else(|| self.rows.get(b).and_then(|row| row.get(a)))
            .copied()
            .unwrap_or(0.0)
    }

    /// Everything related to `id`, with its weight
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.rows
            .get(id)
            .into_iter()
            .flat_map(|row| row.iter().map(|(k, &w)| (k.as_str(), w)))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ─── MethodCalls ──────────────────────────────────────────────────────────────
/// Direct call edges, indexed both ways
#[derive(Debug, Clone, Default)]
pub struct MethodCalls {
    callees: HashMap<String, Vec<String>>,
    callers: HashMap<String, Vec<String>>,
}

impl MethodCalls {
    pub fn new(callees: HashMap<String, Vec<String>>) -> Self {
        let mut callers: HashMap<String, Vec<String>> = HashMap::new();
        for (caller, targets) in &callees {
            for callee in targets {
                callers.entry(callee.clone()).or_default().push(caller.clone());
            }
        }
        Self { callees, callers }
    }

    /// Methods called by `method` and methods calling it
    pub fn adjacent<'a>(&'a self, method: &str) -> impl Iterator<Item = &'a str> + 'a {
        let out = self.callees.get(method).into_iter().flatten();
        let inc = self.callers.get(method).into_iter().flatten();
        out.chain(inc).map(String::as_str)
    }
}

// ─── CallGraph ────────────────────────────────────────────────────────────────
/// General method call graph, used for graph-distance expansion
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl CallGraph {
    pub fn from_adjacency(adjacency: &HashMap<String, Vec<String>>) -> Self {
        let mut cg = Self::default();
        for (caller, callees) in adjacency {
            let from = cg.node(caller);
            for callee in callees {
                let to = cg.node(callee);
                cg.graph.update_edge(from, to, ());
            }
        }
        cg
    }

    fn node(&mut self, method: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(method) {
            return idx;
        }
        let idx = self.graph.add_node(method.to_string());
        self.index.insert(method.to_string(), idx);
        idx
    }

    /// Methods within `max_depth` hops of `method`, ignoring edge
    /// direction, with their hop distance. `method` itself is excluded.
    pub fn within_distance(&self, method: &str, max_depth: usize) -> BTreeMap<String, usize> {
        let mut found = BTreeMap::new();
        let Some(&start) = self.index.get(method) else {
            return found;
        };

        let mut seen  = HashMap::from([(start, 0usize)]);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            let depth = seen[&node];
            if depth == max_depth {
                continue;
            }
            for next in self.graph.neighbors_undirected(node) {
                if seen.contains_key(&next) {
                    continue;
                }
                seen.insert(next, depth + 1);
                found.insert(self.graph[next].clone(), depth + 1);
                queue.push_back(next);
            }
        }
        found
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

// ─── SimilarityGraphs ─────────────────────────────────────────────────────────
/// The four read-only relations of one repository
#[derive(Debug, Clone, Default)]
pub struct SimilarityGraphs {
    pub commit_similarity: SimilarityMatrix,
    pub method_similarity: SimilarityMatrix,
    pub method_calls:      MethodCalls,
    pub call_graph:        CallGraph,
}

// ─── GraphStore ───────────────────────────────────────────────────────────────
pub struct GraphStore {
    dir: PathBuf,
}

impl GraphStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load all four relations; any missing file is fatal
    pub fn load(&self) -> Result<SimilarityGraphs> {
        let commit_similarity = SimilarityMatrix::new(self.read(COMMIT_SIMILARITY_FILE)?);
        let method_similarity = SimilarityMatrix::new(self.read(METHOD_SIMILARITY_FILE)?);
        let method_calls      = MethodCalls::new(self.read(METHOD_CALLS_FILE)?);
        let call_graph        = CallGraph::from_adjacency(&self.read(CALL_GRAPH_FILE)?);

        tracing::info!(
            "Loaded similarity graphs: {} commits, {} methods, {} call-graph nodes",
            commit_similarity.len(),
            method_similarity.len(),
            call_graph.node_count()
        );

        Ok(SimilarityGraphs { commit_similarity, method_similarity, method_calls, call_graph })
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        read_json(&path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(PrepareError::MissingSimilarityGraph { path: path.to_path_buf() }.into());
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Cannot parse '{}'", path.display()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(edges: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        edges
            .iter()
            .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_similarity_weight_is_symmetric() {
        let m = SimilarityMatrix::from_edges([("a", "b", 0.7)]);
        assert_eq!(m.weight("a", "b"), 0.7);
        assert_eq!(m.weight("b", "a"), 0.7);
        assert_eq!(m.weight("a", "c"), 0.0);
    }

    #[test]
    fn test_one_sided_rows_still_resolve() {
        let mut rows = HashMap::new();
        rows.insert("a".to_string(), HashMap::from([("b".to_string(), 0.3)]));
        let m = SimilarityMatrix::new(rows);
        assert_eq!(m.weight("b", "a"), 0.3);
    }

    #[test]
    fn test_method_calls_both_directions() {
        let calls = MethodCalls::new(adjacency(&[("a", &["b"]), ("c", &["a"])]));
        let mut adj: Vec<&str> = calls.adjacent("a").collect();
        adj.sort();
        assert_eq!(adj, vec!["b", "c"]);
    }

    #[test]
    fn test_call_graph_distance() {
        // a → b → c → d
        let cg = CallGraph::from_adjacency(&adjacency(&[("a", &["b"]), ("b", &["c"]), ("c", &["d"])]));
        let near = cg.within_distance("b", 2);
        assert_eq!(near.get("a"), Some(&1));
        assert_eq!(near.get("c"), Some(&1));
        assert_eq!(near.get("d"), Some(&2));
        assert!(!near.contains_key("b"));
        assert!(cg.within_distance("unknown", 2).is_empty());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = GraphStore::new(dir.path()).load().unwrap_err();
        let prepare = err.downcast_ref::<PrepareError>().unwrap();
        assert!(matches!(prepare, PrepareError::MissingSimilarityGraph { .. }));
    }

    #[test]
    fn test_load_all_four_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(COMMIT_SIMILARITY_FILE), r#"{"c1": {"c2": 0.5}}"#).unwrap();
        fs::write(dir.path().join(METHOD_SIMILARITY_FILE), r#"{"a": {"b": 0.9}}"#).unwrap();
        fs::write(dir.path().join(METHOD_CALLS_FILE), r#"{"a": ["c"]}"#).unwrap();
        fs::write(dir.path().join(CALL_GRAPH_FILE), r#"{"a": ["c"], "c": ["d"]}"#).unwrap();

        let graphs = GraphStore::new(dir.path()).load().unwrap();
        assert_eq!(graphs.commit_similarity.weight("c2", "c1"), 0.5);
        assert_eq!(graphs.method_similarity.weight("a", "b"), 0.9);
        assert_eq!(graphs.method_calls.adjacent("c").collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(graphs.call_graph.node_count(), 3);
    }
}
