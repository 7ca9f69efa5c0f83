// ============================================================
// Layer 6 — Code Block Store
// ============================================================
// Reads one commit's code-block table from disk.
//
// File naming convention:
//   blocks/
//     3f2a9c1.json   ← { "A.run()": [12, 7, 301], ... }
//     9b01e44.json
//     ...
//
// A commit without a file is reported as MissingCommitBlocks
// so the assembler can skip that report. A file that exists
// but does not decode is a BlockFile error and stops the run.

use std::{fs, path::PathBuf};

use crate::domain::code_block::CodeBlocks;
use crate::domain::error::PrepareError;
use crate::domain::traits::BlockSource;

pub struct JsonBlockStore {
    dir: PathBuf,
}

impl JsonBlockStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, commit_id: &str) -> PathBuf {
        self.dir.join(format!("{commit_id}.json"))
    }
}

impl BlockSource for JsonBlockStore {
    fn load_blocks(&self, commit_id: &str) -> Result<CodeBlocks, PrepareError> {
        let path = self.path_for(commit_id);
        if !path.exists() {
            return Err(PrepareError::missing_blocks(commit_id));
        }

        let json = fs::read_to_string(&path).map_err(|e| PrepareError::BlockFile {
            path:    path.clone(),
            message: e.to_string(),
        })?;
        let blocks: CodeBlocks = serde_json::from_str(&json).map_err(|e| PrepareError::BlockFile {
            path:    path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!("Loaded {} code blocks for commit {}", blocks.len(), commit_id);
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_commit_is_recoverable() {
        let dir   = tempfile::tempdir().unwrap();
        let store = JsonBlockStore::new(dir.path());
        let err   = store.load_blocks("nope").unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_loads_block_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c1.json"), r#"{"A.run()": [1, 2], "B.stop()": [3]}"#).unwrap();

        let blocks = JsonBlockStore::new(dir.path()).load_blocks("c1").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks.get("B.stop()"), Some(&[3u32][..]));
    }

    #[test]
    fn test_corrupt_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c1.json"), "not json").unwrap();

        let err = JsonBlockStore::new(dir.path()).load_blocks("c1").unwrap_err();
        assert!(matches!(err, PrepareError::BlockFile { .. }));
        assert!(!err.is_recoverable());
    }
}
