//! Filesystem utilities.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// All regular files below `root`, sorted. A missing root yields nothing.
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry =
            entry.with_context(|| format!("failed to walk directory: {}", root.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_files_sorted_and_recursive() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("kotlin");
        fs::create_dir_all(root.join("com/acme")).unwrap();
        fs::write(root.join("com/acme/B.kt"), "").unwrap();
        fs::write(root.join("A.kt"), "").unwrap();

        let files = walk_files(&root).unwrap();
        assert_eq!(files, vec![root.join("A.kt"), root.join("com/acme/B.kt")]);
    }

    #[test]
    fn test_walk_missing_root() {
        let tmp = TempDir::new().unwrap();
        assert!(walk_files(&tmp.path().join("missing")).unwrap().is_empty());
    }
}
