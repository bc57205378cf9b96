//! Shared data model for the cvescan vulnerability-impact pipeline.
//!
//! Every downstream crate (`cvescan-versioning`, `cvescan-advisories`,
//! `cvescan-callgraph`, `cvescan-impact`, and the `cvescan` binary) builds
//! on the types defined here, so the pipeline's stages agree on one
//! canonical representation of dependencies, CVE records, call graphs, and
//! impact analyses without re-deriving each other's structs.

pub mod callgraph;
pub mod cve;
pub mod dependency;
pub mod error;
pub mod impact;
pub mod vulnerability;

pub use callgraph::{CallGraph, CallSite, FunctionInfo};
pub use cve::{CpeMatch, CveRecord, Severity, Witness};
pub use error::{CoreError, Result};
pub use dependency::{Dependency, DependencySource};
pub use impact::ImpactAnalysis;
pub use vulnerability::{VulnerabilitiesMap, VulnerabilityResult};
