//! Source-tree discovery: walk a project directory for C/C++ translation
//! units, skipping VCS and build-output directories.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SOURCE_EXTENSIONS: &[&str] = &["c", "cpp", "cc", "cxx"];
const SKIP_DIRS: &[&str] = &[".git", "build", "CMakeFiles"];

fn is_skipped(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| SKIP_DIRS.contains(&name) || name.starts_with("cmake-build-"))
        .unwrap_or(false)
}

/// Every `.c`/`.cpp`/`.cc`/`.cxx` file under `root`, in directory-walk order.
/// This order becomes the call graph's first-encounter order, since parsing
/// results are merged back in input-list order regardless of which file
/// finishes parsing first.
pub fn discover_source_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_recognized_extensions_and_skips_build_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.cpp"), "").unwrap();
        std::fs::write(dir.path().join("b.cc"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let build_dir = dir.path().join("build");
        std::fs::create_dir(&build_dir).unwrap();
        std::fs::write(build_dir.join("generated.cpp"), "").unwrap();

        let found = discover_source_files(dir.path());
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().unwrap() != "txt"));
        assert!(!found.iter().any(|p| p.starts_with(&build_dir)));
    }

    #[test]
    fn empty_tree_yields_no_sources() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_source_files(dir.path()).is_empty());
    }
}
