// ============================================================
// Layer 5 — Collaborative-Filtering Score
// ============================================================
// "Reports that read like this one were fixed in these
// methods." The score of a method is the similarity-weighted
// vote of earlier reports that fixed it.
//
// Steps (once per report, shared by all its candidates):
//   1. TF-IDF vectors for the current report and every prior
//      report (sublinear tf, smooth idf, L2-normalised)
//   2. Keep the `neighbors` most similar priors (cosine > 0)
//   3. Commit propagation: a prior whose commit is similar to a
//      neighbour's commit also votes, with weight
//      sim(neighbour) × sim(commits)
//   4. Every voting report adds its weight to each method it fixed
//   5. Method propagation: each voted method passes
//      score × sim(methods) to its co-change neighbours (one hop)
//   6. Divide by the largest score → every score is in [0, 1]
//
// Methods missing from the result score 0.0.

use std::collections::{BTreeMap, HashSet};

use crate::domain::bug_report::BugReport;
use crate::infra::graph_store::SimilarityGraphs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfsParams {
    /// Maximum number of similar prior reports
    pub neighbors:             usize,
    pub use_commit_similarity: bool,
    pub use_method_similarity: bool,
}

impl Default for CfsParams {
    fn default() -> Self {
        Self { neighbors: 50, use_commit_similarity: true, use_method_similarity: true }
    }
}

/// method id → collaborative-filtering score in [0, 1].
/// Ordered, so every sum below runs in the same order on every run.
pub type MethodScores = BTreeMap<String, f64>;

/// Score every method fixed by (or co-changed with) reports similar
/// to `current`. `priors` must only hold strictly earlier reports.
pub fn collaborative_filtering_scores(
    current: &[String],
    priors:  &[&BugReport],
    graphs:  &SimilarityGraphs,
    params:  &CfsParams,
) -> MethodScores {
    let mut scores = MethodScores::new();
    if priors.is_empty() || current.is_empty() {
        return scores;
    }

    // ── Step 1–2: textual neighbours ─────────────────────────────────────────
    let mut docs: Vec<&[String]> = Vec::with_capacity(priors.len() + 1);
    docs.push(current);
    docs.extend(priors.iter().map(|r| r.tokens.as_slice()));
    let vectors = tfidf_vectors(&docs);
    let (query, prior_vectors) = vectors.split_at(1);

    let mut neighbors: Vec<(usize, f64)> = prior_vectors
        .iter()
        .enumerate()
        .map(|(i, v)| (i, cosine(&query[0], v)))
        .filter(|(_, sim)| *sim > 0.0)
        .collect();
    neighbors.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| priors[a.0].bug_id.cmp(&priors[b.0].bug_id))
    });
    neighbors.truncate(params.neighbors);

    // ── Step 3: commit propagation ───────────────────────────────────────────
    let mut voters = neighbors.clone();
    if params.use_commit_similarity {
        let chosen: HashSet<usize> = neighbors.iter().map(|(i, _)| *i).collect();
        for (j, prior) in priors.iter().enumerate() {
            if chosen.contains(&j) {
                continue;
            }
            let weight = neighbors
                .iter()
                .map(|&(i, sim)| {
                    sim * graphs.commit_similarity.weight(&priors[i].commit_id, &prior.commit_id)
                })
                .fold(0.0, f64::max);
            if weight > 0.0 {
                voters.push((j, weight));
            }
        }
    }

    // ── Step 4: votes ────────────────────────────────────────────────────────
    for &(i, weight) in &voters {
        for method in &priors[i].fixed_methods {
            *scores.entry(method.clone()).or_insert(0.0) += weight;
        }
    }

    // ── Step 5: method propagation ───────────────────────────────────────────
    if params.use_method_similarity {
        let mut spread = MethodScores::new();
        for (method, score) in &scores {
            for (similar, weight) in graphs.method_similarity.neighbors(method) {
                if similar != method.as_str() && weight > 0.0 {
                    *spread.entry(similar.to_string()).or_insert(0.0) += score * weight;
                }
            }
        }
        for (method, extra) in spread {
            *scores.entry(method).or_insert(0.0) += extra;
        }
    }

    // ── Step 6: normalise ────────────────────────────────────────────────────
    let max = scores.values().copied().fold(0.0, f64::max);
    if max > 0.0 {
        for score in scores.values_mut() {
            *score /= max;
        }
    }

    tracing::trace!(
        "cfs: {} neighbours, {} voters, {} scored methods",
        neighbors.len(),
        voters.len(),
        scores.len()
    );
    scores
}

/// Score of `method`, 0.0 when it received no votes
pub fn score_of(scores: &MethodScores, method: &str) -> f64 {
    scores.get(method).copied().unwrap_or(0.0)
}

/// L2-normalised sparse TF-IDF vector, keyed in term order
type SparseVec<'a> = BTreeMap<&'a str, f64>;

/// Sublinear tf (1 + ln tf) × smooth idf (ln(1 + n / (1 + df)) + 1)
fn tfidf_vectors<'a>(docs: &[&'a [String]]) -> Vec<SparseVec<'a>> {
    let n = docs.len() as f64;

    let term_counts: Vec<BTreeMap<&str, usize>> = docs
        .iter()
        .map(|&tokens| {
            let mut tf: BTreeMap<&str, usize> = BTreeMap::new();
            for t in tokens {
                *tf.entry(t.as_str()).or_insert(0) += 1;
            }
            tf
        })
        .collect();

    let mut df: BTreeMap<&str, usize> = BTreeMap::new();
    for tf in &term_counts {
        for &term in tf.keys() {
            *df.entry(term).or_insert(0) += 1;
        }
    }

    term_counts
        .into_iter()
        .map(|tf| {
            let mut vec: SparseVec = tf
                .into_iter()
                .map(|(term, count)| {
                    let idf = (1.0 + n / (1.0 + df[term] as f64)).ln() + 1.0;
                    (term, (1.0 + (count as f64).ln()) * idf)
                })
                .collect();
            let norm = vec.values().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for v in vec.values_mut() {
                    *v /= norm;
                }
            }
            vec
        })
        .collect()
}

fn cosine(a: &SparseVec<'_>, b: &SparseVec<'_>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, x)| large.get(term).map(|y| x * y))
        .sum()
}
