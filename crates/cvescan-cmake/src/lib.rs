//! CMake dependency extraction: a thin adapter, not a full build-system
//! integration.
//!
//! A regex-based line scanner over `CMakeLists.txt` text, not a CMake DSL
//! evaluator. It recognizes the handful of directives that actually declare
//! third-party dependencies in the wild: `find_package`, `FetchContent_Declare`,
//! `ExternalProject_Add`, and `pkg_check_modules`. Anything else in the
//! manifest — `add_subdirectory`, `target_link_libraries`, custom macros — is
//! out of scope.

mod directives;
mod error;

use cvescan_core::Dependency;
use std::path::Path;
use walkdir::WalkDir;

pub use directives::extract_from_text;
pub use error::{CmakeError, Result};

/// Directory names to skip while walking a project tree for manifests, the
/// same skip-list the orchestrator's source-file discovery uses.
const SKIP_DIRS: &[&str] = &[".git", "build", "cmake-build-debug", "cmake-build-release", "CMakeFiles"];

fn is_skipped(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| SKIP_DIRS.contains(&name) || name.starts_with("cmake-build-"))
        .unwrap_or(false)
}

fn read_manifest(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CmakeError::ReadFailed {
        path: path.display().to_string(),
        source,
    })
}

/// Walk `root` for `CMakeLists.txt` files and extract every declared
/// dependency across all of them, in file-discovery order. A manifest that
/// cannot be read is logged and skipped — a missing or unreadable manifest
/// is a warning, not a fatal error.
pub fn extract_dependencies(root: &Path) -> Vec<Dependency> {
    let mut deps = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|e| !is_skipped(e));
    for entry in walker.filter_map(|e| e.ok()) {
        if entry.file_type().is_file() && entry.file_name() == "CMakeLists.txt" {
            match read_manifest(entry.path()) {
                Ok(text) => deps.extend(extract_from_text(&text)),
                Err(e) => tracing::warn!("{e}"),
            }
        }
    }

    deps
}
