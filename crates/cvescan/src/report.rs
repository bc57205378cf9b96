//! Final report assembly: the JSON-serializable shape returned to callers
//! of the orchestrator and printed (or written) by the CLI.

use cvescan_core::{CallGraph, ImpactAnalysis, VulnerabilitiesMap};
use serde::{Deserialize, Serialize};

/// Scan-level metadata a human or the out-of-scope LLM report generator
/// needs without this repo owning that generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub started_at: String,
    pub duration_ms: u128,
    pub source_file_count: usize,
    pub dependency_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: Meta,
    pub vulnerabilities: VulnerabilitiesMap,
    pub call_graph: CallGraph,
    pub impact: ImpactAnalysis,
}
