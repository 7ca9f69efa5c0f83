// ============================================================
// Layer 3 — Dataset Split
// ============================================================
// Which half of the chronological split a table belongs to.
// The split decides the sampling policy and the corpus used
// for prior-report queries:
//
//   Train → random negatives, oversampled positives,
//           priors drawn from the training reports only
//   Test  → exhaustive negatives, no oversampling,
//           priors drawn from every report

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test  => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
