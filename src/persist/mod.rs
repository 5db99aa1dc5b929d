//! Board persistence as JSON files.
//!
//! One file per `(size, level)`, pretty-printed with 2-space indentation,
//! unconditionally overwritten on rerun.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::extraction::BoardCell;

/// Reads and writes board files under one output directory.
pub struct BoardStore {
    root: PathBuf,
}

impl BoardStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic file path for `(size, level)`.
    pub fn board_path(&self, size: u32, level: u32) -> PathBuf {
        self.root.join(format!("{size}x{size}_level{level}.json"))
    }

    /// Serialize a sorted board, creating the output directory if absent.
    /// Any existing file at the same path is overwritten.
    pub fn save(&self, size: u32, level: u32, cells: &[BoardCell]) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("creating {}", self.root.display()))?;

        let path = self.board_path(size, level);
        let mut json = serde_json::to_string_pretty(cells).context("serializing board")?;
        json.push('\n');
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// Load a previously persisted board.
    pub fn load(&self, size: u32, level: u32) -> Result<Vec<BoardCell>> {
        let path = self.board_path(size, level);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: u32, col: u32, color: &str) -> BoardCell {
        BoardCell {
            row,
            col,
            color: color.to_string(),
        }
    }

    #[test]
    fn board_path_is_deterministic() {
        let store = BoardStore::new("boards");
        assert_eq!(
            store.board_path(8, 5),
            PathBuf::from("boards/8x8_level5.json")
        );
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = BoardStore::new(dir.path());
        let cells = vec![
            cell(0, 0, "rgb(255, 0, 0)"),
            cell(0, 1, "rgb(0, 0, 255)"),
            cell(1, 0, "rgb(255, 0, 0)"),
        ];

        store.save(7, 1, &cells).unwrap();
        assert_eq!(store.load(7, 1).unwrap(), cells);
    }

    #[test]
    fn empty_board_still_writes_a_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = BoardStore::new(dir.path().join("boards"));

        let path = store.save(9, 2, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
        assert!(store.load(9, 2).unwrap().is_empty());
    }

    #[test]
    fn rerun_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = BoardStore::new(dir.path());

        store.save(8, 5, &[cell(0, 0, "rgb(1, 1, 1)")]).unwrap();
        let replacement = vec![cell(0, 0, "rgb(2, 2, 2)")];
        store.save(8, 5, &replacement).unwrap();

        assert_eq!(store.load(8, 5).unwrap(), replacement);
    }

    #[test]
    fn file_uses_two_space_indentation() {
        let dir = tempfile::tempdir().unwrap();
        let store = BoardStore::new(dir.path());

        let path = store.save(7, 3, &[cell(2, 4, "rgb(9, 9, 9)")]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("  {\n    \"row\": 2,\n    \"col\": 4,"));
    }
}
