//! Pipeline Orchestrator.
//!
//! Sequences the analysis components: declared dependencies feed the CVE
//! client (which folds in CPE matching and version-range evaluation),
//! source files feed the call-graph builder (which consults the identifier
//! filter), and both outputs feed the impact analyzer. The only concurrency
//! boundary is between the (sequential, rate-limited) CVE lookups and the
//! (embarrassingly parallel) file parsing — modeled here as two tasks
//! joined before the impact analysis runs.

use crate::config::Config;
use crate::report::{Meta, Report};
use crate::sources::discover_source_files;
use cvescan_advisories::CveClient;
use cvescan_core::{Dependency, VulnerabilitiesMap, VulnerabilityResult};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Per-run context: the analysis clock and the (rate-limited, shared) CVE
/// client. An explicit struct the orchestrator owns and passes down,
/// instead of a process-wide mutable cache reached for globally.
pub struct RunContext {
    client: Arc<CveClient>,
    started: Instant,
    started_at: chrono::DateTime<chrono::Utc>,
}

impl RunContext {
    pub fn new(config: &Config, api_key_override: Option<String>) -> Self {
        let api_key = api_key_override.or_else(|| config.nvd.api_key.clone());
        let mut client = match &config.nvd.base_url {
            Some(base_url) => CveClient::with_base_url(base_url.clone(), api_key),
            None => CveClient::new(api_key),
        };
        if let Some(timeout_secs) = config.nvd.timeout_secs {
            client = client.with_timeout(timeout_secs);
        }
        Self {
            client: Arc::new(client),
            started: Instant::now(),
            started_at: chrono::Utc::now(),
        }
    }
}

/// Query the CVE client for every declared dependency concurrently. The
/// client's internal rate limiter still serializes the outbound requests;
/// the task group here just removes the orchestrator's own sequential-await
/// overhead.
async fn collect_vulnerabilities(client: Arc<CveClient>, dependencies: Vec<Dependency>) -> VulnerabilitiesMap {
    let mut tasks = Vec::with_capacity(dependencies.len());
    for dep in dependencies {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let cves = client.search(dep.vendor.as_deref(), &dep.name, &dep.version).await;
            (dep, cves)
        }));
    }

    let mut map = VulnerabilitiesMap::new();
    for task in tasks {
        match task.await {
            Ok((dep, cves)) if !cves.is_empty() => {
                let checked_at = chrono::Utc::now().to_rfc3339();
                map.insert(
                    dep.name.clone(),
                    VulnerabilityResult {
                        library_name: dep.name,
                        version: dep.version,
                        checked_at,
                        cves,
                    },
                );
            }
            Ok(_) => {}
            Err(e) => warn!("CVE lookup task panicked: {e}"),
        }
    }
    map
}

/// Run the full pipeline against an already-extracted project tree. Archive
/// extraction is out of scope; callers hand this an extracted directory
/// directly. Fatal: no source files to analyze.
pub async fn run(project_dir: &Path, ctx: &RunContext) -> anyhow::Result<Report> {
    let dependencies = cvescan_cmake::extract_dependencies(project_dir);
    if dependencies.is_empty() {
        warn!("no CMake manifest (or no dependencies) found under {}", project_dir.display());
    }
    info!("discovered {} declared dependencies", dependencies.len());

    let sources = discover_source_files(project_dir);
    if sources.is_empty() {
        anyhow::bail!("no source files found under {} — nothing to analyze", project_dir.display());
    }
    info!("discovered {} source files", sources.len());

    let dependency_count = dependencies.len();
    let source_file_count = sources.len();

    let vuln_task = collect_vulnerabilities(ctx.client.clone(), dependencies);
    let graph_task = tokio::task::spawn_blocking(move || cvescan_callgraph::build(&sources));

    let (vulnerabilities, graph_result) = tokio::join!(vuln_task, graph_task);
    let call_graph = graph_result.map_err(|e| anyhow::anyhow!("call-graph builder task panicked: {e}"))??;

    let vulnerable_libraries: Vec<String> = vulnerabilities.keys().cloned().collect();
    let impact = cvescan_impact::analyze(&call_graph, &vulnerable_libraries);

    let meta = Meta {
        started_at: ctx.started_at.to_rfc3339(),
        duration_ms: ctx.started.elapsed().as_millis(),
        source_file_count,
        dependency_count,
    };

    info!(
        "scan complete: {} vulnerable libraries, {} directly vulnerable functions, {} transitively vulnerable",
        vulnerable_libraries.len(),
        impact.directly_vulnerable.len(),
        impact.vulnerable_functions.len()
    );

    Ok(Report {
        meta,
        vulnerabilities,
        call_graph,
        impact,
    })
}
