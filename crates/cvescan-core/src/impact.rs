use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Derived from a call graph and a set of vulnerable library names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    /// Functions whose call list contains an identifier matching a
    /// vulnerable library. Sorted.
    pub directly_vulnerable: Vec<String>,
    /// Transitive closure of `directly_vulnerable` under the reverse call
    /// relation. Sorted.
    pub vulnerable_functions: Vec<String>,
    /// `vulnerable_functions \ directly_vulnerable`. Sorted.
    pub indirectly_vulnerable: Vec<String>,
    /// The input vulnerable-library name set, sorted for reporting.
    pub vulnerable_libraries: Vec<String>,
    /// function -> shortest witness path ending at an external vulnerable
    /// identifier.
    pub vulnerability_chains: HashMap<String, Vec<String>>,
}
