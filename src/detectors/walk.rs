//! Repository file listing, `.gitignore`-aware (§4.5).

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Collect all regular files under `repo_root`, skipping anything excluded
/// by `.gitignore`/`.ignore` files.
pub fn collect_files(repo_root: &Path) -> Vec<PathBuf> {
    WalkBuilder::new(repo_root)
        .hidden(false)
        .require_git(false)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_files_and_respects_gitignore() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.rs"), "fn main() {}").unwrap();
        std::fs::write(dir.path().join(".gitignore"), "ignored.rs\n").unwrap();
        std::fs::write(dir.path().join("ignored.rs"), "fn skip() {}").unwrap();

        let files = collect_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert!(names.contains(&"a.rs".to_string()));
        assert!(!names.contains(&"ignored.rs".to_string()));
    }
}
