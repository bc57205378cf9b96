use serde::{Deserialize, Serialize};

/// A declared third-party artifact, as extracted from a build manifest.
///
/// Immutable after extraction: nothing downstream of the CMake/manifest
/// adapter mutates a `Dependency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Product identifier, e.g. "openssl".
    pub name: String,
    /// Organization identifier, often inferable from a source URL.
    pub vendor: Option<String>,
    /// A semver-like token, a VCS tag, `unknown`/`any`, or a comparator
    /// expression like `>=1.2`.
    pub version: String,
    pub source: DependencySource,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>, source: DependencySource) -> Self {
        Self {
            name: name.into(),
            vendor: None,
            version: version.into(),
            source,
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }
}

/// Provenance tag for how a dependency was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencySource {
    Fetched,
    SystemFound,
    Subproject,
    PackageConfig,
}
