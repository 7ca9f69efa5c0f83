// ============================================================
// Layer 5 — Vocabulary Encoder
// ============================================================
// Replaces every report token with a single-element list
// holding its vocabulary index:
//
//   vocabulary: crash=0, parser=1          (V = 2)
//   tokens:     ["parser", "segfault", "crash"]
//   encoded:    [[1], [2], [0]]            ← "segfault" → [V]
//
// Pure: the vocabulary is only read.

use crate::domain::bug_report::{BugReport, RawReport};
use crate::infra::vocabulary_store::Vocabulary;

/// Encode a token sequence, mapping unknown tokens to the sentinel
pub fn encode_tokens(tokens: &[String], vocab: &Vocabulary) -> Vec<Vec<u32>> {
    tokens
        .iter()
        .map(|token| vec![vocab.index_of(token).unwrap_or_else(|| vocab.sentinel())])
        .collect()
}

/// Turn preprocessed raw reports into prepared, encoded reports.
/// Order is preserved.
pub fn encode_reports(reports: Vec<(RawReport, Vec<String>)>, vocab: &Vocabulary) -> Vec<BugReport> {
    reports
        .into_iter()
        .map(|(raw, tokens)| {
            let token_ids = encode_tokens(&tokens, vocab);
            BugReport::from_raw(raw, tokens, token_ids)
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bug_report::fixtures::day;

    fn vocab() -> Vocabulary {
        Vocabulary::from_ranked(&["crash".into(), "parser".into()]).unwrap()
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_known_tokens_map_to_their_index() {
        let v = vocab();
        assert_eq!(encode_tokens(&tokens(&["crash", "parser"]), &v), vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_unknown_tokens_map_to_sentinel() {
        let v = vocab();
        let encoded = encode_tokens(&tokens(&["parser", "segfault", "crash"]), &v);
        assert_eq!(encoded, vec![vec![1], vec![2], vec![0]]);
    }

    #[test]
    fn test_empty_sequence() {
        assert!(encode_tokens(&[], &vocab()).is_empty());
    }

    #[test]
    fn test_encode_reports_keeps_order_and_fields() {
        let raw = RawReport {
            bug_id:        "7".into(),
            commit_id:     "c7".into(),
            summary:       "parser crash".into(),
            description:   String::new(),
            fixed_methods: ["A.parse()".to_string()].into_iter().collect(),
            commit_time:   day(3),
        };
        let reports = encode_reports(vec![(raw, tokens(&["parser", "crash", "oops"]))], &vocab());

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].bug_id, "7");
        assert_eq!(reports[0].token_ids, vec![vec![1], vec![0], vec![2]]);
        assert!(reports[0].fixes("A.parse()"));
    }
}
