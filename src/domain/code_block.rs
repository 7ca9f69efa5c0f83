// ============================================================
// Layer 3 — Code Block Table
// ============================================================
// One commit snapshot's methods and their code token ids.
//
// A BTreeMap keeps the table ordered by method id, so
// exhaustive negative sampling walks methods in a stable
// order from run to run.
//
// A table is loaded per report and dropped before the next
// report is processed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// method_id → code token ids, for a single commit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeBlocks {
    methods: BTreeMap<String, Vec<u32>>,
}

impl CodeBlocks {
    /// Code tokens of `method`, or None if the method does not
    /// exist in this snapshot (deleted or renamed)
    pub fn get(&self, method: &str) -> Option<&[u32]> {
        self.methods.get(method).map(Vec::as_slice)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// All method ids in table order
    pub fn method_ids(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl FromIterator<(String, Vec<u32>)> for CodeBlocks {
    fn from_iter<I: IntoIterator<Item = (String, Vec<u32>)>>(iter: I) -> Self {
        Self { methods: iter.into_iter().collect() }
    }
}
