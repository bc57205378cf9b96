use crate::cve::CveRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-library outcome of a CVE database query.
///
/// A library with an empty `cves` list is omitted from the map this lives
/// in — see `VulnerabilitiesMap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerabilityResult {
    pub library_name: String,
    pub version: String,
    /// ISO-8601 timestamp of when the check ran.
    pub checked_at: String,
    pub cves: Vec<CveRecord>,
}

/// Mapping from library name to its vulnerability outcome. Libraries with
/// no matched CVE are never inserted.
pub type VulnerabilitiesMap = HashMap<String, VulnerabilityResult>;
