//! Impact Analyzer. Pure and single-threaded
//! over a built `CallGraph` and a vulnerable-library name set.

use cvescan_core::{CallGraph, ImpactAnalysis};
use std::collections::{HashMap, HashSet, VecDeque};

/// Substring-containment library match: deliberately loose, since external
/// C/C++ symbol names frequently carry a library name as a prefix
/// (`openssl_…`, `curl_easy_…`).
pub fn is_vuln_lib(callee: &str, libs: &[String]) -> bool {
    let lower = callee.to_lowercase();
    libs.iter().any(|v| !v.is_empty() && lower.contains(&v.to_lowercase()))
}

fn direct_set(graph: &CallGraph, libs: &[String]) -> HashSet<String> {
    graph
        .functions
        .iter()
        .filter(|(_, info)| info.calls.iter().any(|c| is_vuln_lib(&c.function, libs)))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Least fixed point: a function joins the vulnerable set if any call-site
/// callee is already in it. Iterates to convergence.
fn transitive_closure(graph: &CallGraph, direct: &HashSet<String>) -> HashSet<String> {
    let mut vulnerable = direct.clone();
    loop {
        let mut grew = false;
        for (caller, callees) in &graph.call_graph {
            if vulnerable.contains(caller) {
                continue;
            }
            if callees.iter().any(|c| vulnerable.contains(c)) {
                vulnerable.insert(caller.clone());
                grew = true;
            }
        }
        if !grew {
            break;
        }
    }
    vulnerable
}

/// Shortest witness chain from `start` to an identifier satisfying
/// `is_vuln_lib`, via BFS over the call relation. Ties broken by
/// call-site traversal order (first-encounter), since the queue is FIFO
/// and each node's calls are examined in their recorded order.
fn shortest_chain(graph: &CallGraph, start: &str, libs: &[String]) -> Option<Vec<String>> {
    let mut visited = HashSet::new();
    visited.insert(start.to_string());
    let mut queue = VecDeque::new();
    queue.push_back(vec![start.to_string()]);

    while let Some(path) = queue.pop_front() {
        let current = path.last().expect("path is never empty");
        let Some(info) = graph.functions.get(current) else {
            continue;
        };

        for site in &info.calls {
            if is_vuln_lib(&site.function, libs) {
                let mut chain = path.clone();
                chain.push(site.function.clone());
                return Some(chain);
            }
        }

        for site in &info.calls {
            let callee = &site.function;
            if graph.functions.contains_key(callee) && visited.insert(callee.clone()) {
                let mut next = path.clone();
                next.push(callee.clone());
                queue.push_back(next);
            }
        }
    }

    None
}

/// Compute direct/indirect vulnerability sets and witness chains for every
/// transitively vulnerable function.
pub fn analyze(graph: &CallGraph, vulnerable_libraries: &[String]) -> ImpactAnalysis {
    let direct = direct_set(graph, vulnerable_libraries);
    let vulnerable = transitive_closure(graph, &direct);

    let mut vulnerability_chains: HashMap<String, Vec<String>> = HashMap::new();
    for f in &vulnerable {
        let chain = shortest_chain(graph, f, vulnerable_libraries)
            .expect("every transitively vulnerable function has a witness chain by construction");
        vulnerability_chains.insert(f.clone(), chain);
    }

    let mut directly_vulnerable: Vec<String> = direct.into_iter().collect();
    directly_vulnerable.sort();

    let mut vulnerable_functions: Vec<String> = vulnerable.iter().cloned().collect();
    vulnerable_functions.sort();

    let direct_set: HashSet<&str> = directly_vulnerable.iter().map(String::as_str).collect();
    let mut indirectly_vulnerable: Vec<String> = vulnerable_functions
        .iter()
        .filter(|f| !direct_set.contains(f.as_str()))
        .cloned()
        .collect();
    indirectly_vulnerable.sort();

    let mut vulnerable_libraries: Vec<String> = vulnerable_libraries.to_vec();
    vulnerable_libraries.sort();
    vulnerable_libraries.dedup();

    ImpactAnalysis {
        directly_vulnerable,
        vulnerable_functions,
        indirectly_vulnerable,
        vulnerable_libraries,
        vulnerability_chains,
    }
}
