// ============================================================
// Layer 5 — Short-Method Expansion
// ============================================================
// A method whose body is only a handful of tokens says little
// on its own (getters, delegates, one-line wrappers). For those
// candidates the row also carries the code of related methods.
//
// Relations and their strength:
//   direct caller / callee       → 1.0
//   co-change similarity         → its weight
//   call-graph distance d (≤ 2)  → 1 / d
//
// A related method keeps its strongest relation. Results are
// sorted by strength, then by method id, and capped at K.
//
// The expansion belongs to one candidate only. A candidate that
// is not short gets an empty expansion.

use std::collections::HashMap;

use crate::domain::code_block::CodeBlocks;
use crate::infra::graph_store::SimilarityGraphs;

/// Hop limit for call-graph neighbourhoods
const CALL_GRAPH_DEPTH: usize = 2;

/// Strength of a direct call edge
const DIRECT_CALL_STRENGTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionParams {
    /// Bodies with at most this many tokens are expanded
    pub short_method_len: usize,
    /// Maximum number of related methods (K)
    pub max_related:      usize,
}

impl Default for ExpansionParams {
    fn default() -> Self {
        Self { short_method_len: 5, max_related: 10 }
    }
}

pub fn is_short(code: &[u32], params: &ExpansionParams) -> bool {
    code.len() <= params.short_method_len
}

/// Up to `max_related` methods related to `method`, strongest first
pub fn related_methods(method: &str, graphs: &SimilarityGraphs, max_related: usize) -> Vec<String> {
    let near = graphs.call_graph.within_distance(method, CALL_GRAPH_DEPTH);
    let mut strength: HashMap<&str, f64> = HashMap::new();

    for callee in graphs.method_calls.adjacent(method) {
        offer(&mut strength, method, callee, DIRECT_CALL_STRENGTH);
    }
    for (similar, weight) in graphs.method_similarity.neighbors(method) {
        offer(&mut strength, method, similar, weight);
    }
    for (other, distance) in &near {
        offer(&mut strength, method, other, 1.0 / *distance as f64);
    }

    let mut ranked: Vec<(&str, f64)> = strength.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(max_related);
    ranked.into_iter().map(|(m, _)| m.to_string()).collect()
}

/// Record `candidate` with strength `s`, keeping the strongest relation
fn offer<'a>(strength: &mut HashMap<&'a str, f64>, method: &str, candidate: &'a str, s: f64) {
    if candidate == method || s <= 0.0 {
        return;
    }
    let entry = strength.entry(candidate).or_insert(0.0);
    if s > *entry {
        *entry = s;
    }
}

/// Code of the methods used to expand `method`, or nothing when the
/// candidate's body is not short. Related methods absent from the
/// commit's block table are left out.
pub fn expand_candidate(
    method: &str,
    code:   &[u32],
    blocks: &CodeBlocks,
    graphs: &SimilarityGraphs,
    params: &ExpansionParams,
) -> Vec<Vec<u32>> {
    if !is_short(code, params) {
        return Vec::new();
    }
    related_methods(method, graphs, params.max_related)
        .iter()
        .filter_map(|related| blocks.get(related))
        .map(<[u32]>::to_vec)
        .collect()
}
