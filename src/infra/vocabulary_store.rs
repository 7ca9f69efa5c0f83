// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Builds, saves, and loads the word vocabulary used to encode
// bug-report tokens.
//
// Construction (first run only):
//   1. Count every report token across the whole corpus
//   2. Drop tokens seen fewer than `min_count` times
//   3. Rank by frequency (ties broken by the token itself)
//   4. Keep the top `max_vocab` tokens → indexes 0..V-1
//
// The vocabulary is written as a HuggingFace WordLevel
// tokenizer JSON. Its `[UNK]` entry sits at index V, which is
// exactly the out-of-vocabulary sentinel, so later runs load
// the file with Tokenizer::from_file and get identical indexes.
//
// File: {data_dir}/word_vocab.json
//
// Reference: Mikolov et al. (2013) word2vec vocabulary pruning

use anyhow::{Context, Result};
use std::{collections::HashMap, path::PathBuf, str::FromStr};
use tokenizers::Tokenizer;

use crate::domain::error::PrepareError;

/// Token stored at index V in the persisted tokenizer
pub const UNK_TOKEN: &str = "[UNK]";

const VOCAB_FILE: &str = "word_vocab.json";

// ─── Vocabulary ───────────────────────────────────────────────────────────────
/// A fixed token → index mapping of size V.
/// Never mutated once built; shared by reference during generation.
pub struct Vocabulary {
    tokenizer: Tokenizer,
    size:      u32,
}

impl Vocabulary {
    /// Wrap a WordLevel tokenizer whose `[UNK]` entry is the sentinel
    pub fn from_tokenizer(tokenizer: Tokenizer) -> Self {
        let size = tokenizer
            .get_vocab(false)
            .keys()
            .filter(|t| t.as_str() != UNK_TOKEN)
            .count() as u32;
        Self { tokenizer, size }
    }

    /// Build an in-memory vocabulary from tokens already in rank order
    pub fn from_ranked(tokens: &[String]) -> Result<Self> {
        let json = tokenizer_json(tokens);
        let tokenizer = Tokenizer::from_str(&json.to_string())
            .map_err(|e| PrepareError::vocabulary(format!("cannot build tokenizer: {e}")))?;
        Ok(Self::from_tokenizer(tokenizer))
    }

    /// Index of `token`, or None when it is out of vocabulary
    pub fn index_of(&self, token: &str) -> Option<u32> {
        if token == UNK_TOKEN {
            return None;
        }
        self.tokenizer.token_to_id(token).filter(|&id| id < self.size)
    }

    /// Index reserved for out-of-vocabulary tokens (= V)
    pub fn sentinel(&self) -> u32 {
        self.size
    }

    /// Number of real tokens (V)
    pub fn len(&self) -> usize {
        self.size as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

// ─── VocabularyStore ──────────────────────────────────────────────────────────
pub struct VocabularyStore {
    dir: PathBuf,
}

impl VocabularyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the saved vocabulary, or build one from `corpus` and save it
    pub fn load_or_build(
        &self,
        corpus:    &[Vec<String>],
        max_vocab: usize,
        min_count: usize,
    ) -> Result<Vocabulary> {
        let path = self.dir.join(VOCAB_FILE);
        if path.exists() {
            tracing::info!("Loading existing vocabulary from '{}'", path.display());
            self.load()
        } else {
            tracing::info!(
                "Building new vocabulary (max_vocab={}, min_count={})",
                max_vocab,
                min_count
            );
            self.build_and_save(corpus, max_vocab, min_count)
        }
    }

    /// Load a previously saved vocabulary
    pub fn load(&self) -> Result<Vocabulary> {
        let path = self.dir.join(VOCAB_FILE);
        let tokenizer = Tokenizer::from_file(&path).map_err(|e| {
            PrepareError::vocabulary(format!("cannot load '{}': {e}", path.display()))
        })?;
        Ok(Vocabulary::from_tokenizer(tokenizer))
    }

    fn build_and_save(
        &self,
        corpus:    &[Vec<String>],
        max_vocab: usize,
        min_count: usize,
    ) -> Result<Vocabulary> {
        if corpus.is_empty() {
            return Err(PrepareError::vocabulary("no reports to build a vocabulary from").into());
        }

        let ranked = rank_tokens(corpus, max_vocab, min_count);
        let vocab  = Vocabulary::from_ranked(&ranked)?;

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        let path = self.dir.join(VOCAB_FILE);
        vocab.tokenizer.save(&path, true).map_err(|e| {
            PrepareError::vocabulary(format!("cannot write '{}': {e}", path.display()))
        })?;

        tracing::info!(
            "Vocabulary built with {} tokens, saved to '{}'",
            ranked.len(),
            path.display()
        );

        Ok(vocab)
    }
}

/// Frequency-ranked tokens with count >= min_count, at most max_vocab
fn rank_tokens(corpus: &[Vec<String>], max_vocab: usize, min_count: usize) -> Vec<String> {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for tokens in corpus {
        for token in tokens {
            *freq.entry(token.as_str()).or_insert(0) += 1;
        }
    }

    let mut words: Vec<(&str, usize)> = freq
        .into_iter()
        .filter(|(token, count)| *count >= min_count && *token != UNK_TOKEN)
        .collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    words.truncate(max_vocab);

    words.into_iter().map(|(token, _)| token.to_string()).collect()
}

/// WordLevel tokenizer JSON with `[UNK]` at index len(tokens)
fn tokenizer_json(ranked: &[String]) -> serde_json::Value {
    let mut vocab = serde_json::Map::new();
    for (idx, token) in ranked.iter().enumerate() {
        vocab.insert(token.clone(), serde_json::json!(idx));
    }
    vocab.insert(UNK_TOKEN.to_string(), serde_json::json!(ranked.len()));

    serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": UNK_TOKEN
        }
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Vec<String>> {
        let docs = [
            "crash parser null parser",
            "parser crash window",
            "window resize crash",
        ];
        docs.iter()
            .map(|d| d.split_whitespace().map(String::from).collect())
            .collect()
    }

    #[test]
    fn test_rank_by_frequency_then_token() {
        let ranked = rank_tokens(&corpus(), 10, 1);
        // crash=3, parser=3, window=2, null=1, resize=1
        assert_eq!(ranked, vec!["crash", "parser", "window", "null", "resize"]);
    }

    #[test]
    fn test_min_count_and_max_vocab() {
        assert_eq!(rank_tokens(&corpus(), 10, 2), vec!["crash", "parser", "window"]);
        assert_eq!(rank_tokens(&corpus(), 1, 1), vec!["crash"]);
    }

    #[test]
    fn test_sentinel_is_vocab_size() {
        let vocab = Vocabulary::from_ranked(&["crash".into(), "parser".into()]).unwrap();
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.sentinel(), 2);
        assert_eq!(vocab.index_of("crash"), Some(0));
        assert_eq!(vocab.index_of("parser"), Some(1));
        assert_eq!(vocab.index_of("window"), None);
        assert_eq!(vocab.index_of(UNK_TOKEN), None);
    }

    #[test]
    fn test_build_then_reload_gives_same_indexes() {
        let dir   = tempfile::tempdir().unwrap();
        let store = VocabularyStore::new(dir.path());

        let built = store.load_or_build(&corpus(), 10, 1).unwrap();
        assert!(dir.path().join(VOCAB_FILE).exists());

        // Second call must load, even if handed a different corpus
        let loaded = store.load_or_build(&[], 10, 1).unwrap();
        assert_eq!(built.len(), loaded.len());
        for token in ["crash", "parser", "window", "null", "resize"] {
            assert_eq!(built.index_of(token), loaded.index_of(token));
        }
    }

    #[test]
    fn test_empty_corpus_is_fatal() {
        let dir   = tempfile::tempdir().unwrap();
        let store = VocabularyStore::new(dir.path());
        assert!(store.load_or_build(&[], 10, 1).is_err());
    }
}
