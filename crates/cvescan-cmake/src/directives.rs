//! Directive-level regex extraction, split out from the file-walking shell
//! in `lib.rs` so each directive's shape can be unit tested against a raw
//! snippet without touching the filesystem.

use cvescan_core::{Dependency, DependencySource};
use regex::Regex;
use std::sync::OnceLock;

fn find_package_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)find_package\s*\(\s*([A-Za-z0-9_\-]+)([^)]*)\)").unwrap())
}

fn fetch_content_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)FetchContent_Declare\s*\(\s*([A-Za-z0-9_\-]+)([^)]*)\)").unwrap())
}

fn external_project_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)ExternalProject_Add\s*\(\s*([A-Za-z0-9_\-]+)([^)]*)\)").unwrap())
}

fn pkg_check_modules_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)pkg_check_modules\s*\(\s*([A-Za-z0-9_\-]+)\s+([^)]*)\)").unwrap())
}

fn version_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d+(?:\.\d+){1,3}[A-Za-z0-9.\-]*\b").unwrap())
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?:GIT_REPOSITORY|URL)\s+"?([^\s")]+)"?"#).unwrap())
}

fn git_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"GIT_TAG\s+"?([^\s")]+)"?"#).unwrap())
}

/// Infer a vendor from a source URL's path, the way a human reading
/// `https://github.com/<vendor>/<repo>.git` would: the path segment
/// immediately before the repository name.
fn vendor_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches(".git").trim_end_matches('/');
    let path_segments: Vec<&str> = trimmed
        .rsplit_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed)
        .split('/')
        .skip(1) // host
        .filter(|s| !s.is_empty())
        .collect();
    if path_segments.len() >= 2 {
        Some(path_segments[path_segments.len() - 2].to_string())
    } else {
        None
    }
}

fn version_from_body(body: &str) -> String {
    git_tag_re()
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .or_else(|| version_token_re().find(body).map(|m| m.as_str().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn extract_find_package(text: &str, out: &mut Vec<Dependency>) {
    for caps in find_package_re().captures_iter(text) {
        let name = caps[1].to_string();
        let body = &caps[2];
        let version = version_token_re()
            .find(body)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        out.push(Dependency::new(name, version, DependencySource::SystemFound));
    }
}

fn extract_fetch_content(text: &str, out: &mut Vec<Dependency>) {
    for caps in fetch_content_re().captures_iter(text) {
        let name = caps[1].to_string();
        let body = &caps[2];
        let mut dep = Dependency::new(name, version_from_body(body), DependencySource::Fetched);
        if let Some(url) = url_re().captures(body).and_then(|c| c.get(1)) {
            if let Some(vendor) = vendor_from_url(url.as_str()) {
                dep = dep.with_vendor(vendor);
            }
        }
        out.push(dep);
    }
}

fn extract_external_project(text: &str, out: &mut Vec<Dependency>) {
    for caps in external_project_re().captures_iter(text) {
        let name = caps[1].to_string();
        let body = &caps[2];
        let mut dep = Dependency::new(name, version_from_body(body), DependencySource::Fetched);
        if let Some(url) = url_re().captures(body).and_then(|c| c.get(1)) {
            if let Some(vendor) = vendor_from_url(url.as_str()) {
                dep = dep.with_vendor(vendor);
            }
        }
        out.push(dep);
    }
}

fn extract_pkg_check_modules(text: &str, out: &mut Vec<Dependency>) {
    for caps in pkg_check_modules_re().captures_iter(text) {
        let body = &caps[2];
        for token in body.split_whitespace() {
            if token.eq_ignore_ascii_case("REQUIRED") || token.eq_ignore_ascii_case("QUIET") {
                continue;
            }
            let (name, version) = match token.split_once(">=").or_else(|| token.split_once('=')) {
                Some((n, v)) => (n.to_string(), v.to_string()),
                None => (token.to_string(), "unknown".to_string()),
            };
            if name.is_empty() {
                continue;
            }
            out.push(Dependency::new(name, version, DependencySource::PackageConfig));
        }
    }
}

/// Extract every `Dependency` declared in one `CMakeLists.txt`'s text, in
/// source order: `find_package`, then `FetchContent_Declare`, then
/// `ExternalProject_Add`, then `pkg_check_modules`.
pub fn extract_from_text(text: &str) -> Vec<Dependency> {
    let mut out = Vec::new();
    extract_find_package(text, &mut out);
    extract_fetch_content(text, &mut out);
    extract_external_project(text, &mut out);
    extract_pkg_check_modules(text, &mut out);
    out
}
