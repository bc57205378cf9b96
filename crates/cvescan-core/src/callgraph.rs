use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// A single call expression as it appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub function: String,
    pub line: usize,
    pub column: usize,
}

/// A node in the call graph. Function nodes are keyed by raw textual name
/// only — no linkage, no overload resolution, no namespace scoping beyond
/// what the source spelled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    /// Ordered, unique sequence of source paths a definition was seen in.
    pub files: Vec<PathBuf>,
    /// 1-based line of the *first-seen* definition; never overwritten by
    /// later definitions of the same name.
    pub line: usize,
    /// Ordered call sites in source-traversal order. Deliberately NOT
    /// deduplicated — duplicates here are source-fidelity, only the
    /// projected edge lists dedupe.
    pub calls: Vec<CallSite>,
}

impl FunctionInfo {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            line,
            calls: Vec::new(),
        }
    }

    /// Append `file` to `files` iff it isn't already recorded.
    pub fn record_file(&mut self, file: PathBuf) {
        if !self.files.contains(&file) {
            self.files.push(file);
        }
    }
}

/// A directed graph whose vertices are functions and whose edges represent
/// "caller contains a call to callee." Carries both a global view and
/// per-file projections, all order-independent with respect to parallel
/// file parsing (first-encounter order is a function of input file order).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallGraph {
    pub functions: HashMap<String, FunctionInfo>,
    /// caller -> ordered unique callee list.
    pub call_graph: HashMap<String, Vec<String>>,
    /// file -> ordered list of function names defined in that file.
    pub file_functions: HashMap<PathBuf, Vec<String>>,
    /// file -> caller -> ordered unique callee list.
    pub file_call_graphs: HashMap<PathBuf, HashMap<String, Vec<String>>>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `name` is a node, creating a `FunctionInfo` with `line = 0`
    /// if absent (the "defensive registration" path used when a caller is
    /// encountered before its own `function_definition` node).
    pub fn ensure_function(&mut self, name: &str) -> &mut FunctionInfo {
        self.functions
            .entry(name.to_string())
            .or_insert_with(|| FunctionInfo::new(name, 0));
        self.call_graph.entry(name.to_string()).or_default();
        self.functions.get_mut(name).unwrap()
    }

    /// Record that `caller` calls `callee`, in both the global and
    /// per-file projected edge maps, preserving first-encounter order and
    /// deduplicating the projected lists (never the raw `calls` list on
    /// `FunctionInfo`, which the caller appends to separately).
    pub fn add_edge(&mut self, file: &std::path::Path, caller: &str, callee: &str) {
        let global = self.call_graph.entry(caller.to_string()).or_default();
        if !global.iter().any(|c| c == callee) {
            global.push(callee.to_string());
        }

        let per_file = self
            .file_call_graphs
            .entry(file.to_path_buf())
            .or_default()
            .entry(caller.to_string())
            .or_default();
        if !per_file.iter().any(|c| c == callee) {
            per_file.push(callee.to_string());
        }
    }

    /// Record that `name` has a definition in `file`, updating
    /// `file_functions` with insertion-order uniqueness.
    pub fn record_file_function(&mut self, file: &std::path::Path, name: &str) {
        let names = self.file_functions.entry(file.to_path_buf()).or_default();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    /// All function names with at least one call-graph entry, as a set
    /// (used by the impact analyzer to distinguish in-graph callees from
    /// external/unresolved identifiers).
    pub fn function_names(&self) -> HashSet<&str> {
        self.functions.keys().map(|s| s.as_str()).collect()
    }

    pub fn callees_of(&self, caller: &str) -> &[String] {
        self.call_graph
            .get(caller)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn add_edge_dedupes_projected_lists_but_not_calls() {
        let mut graph = CallGraph::new();
        let file = Path::new("a.cpp");
        graph.ensure_function("run");
        graph.add_edge(file, "run", "helper");
        graph.add_edge(file, "run", "helper");
        graph.add_edge(file, "run", "other");

        assert_eq!(graph.call_graph["run"], vec!["helper", "other"]);
        assert_eq!(
            graph.file_call_graphs[Path::new("a.cpp")]["run"],
            vec!["helper", "other"]
        );
    }

    #[test]
    fn record_file_preserves_first_encounter_order_and_uniqueness() {
        let mut info = FunctionInfo::new("run", 1);
        info.record_file(std::path::PathBuf::from("a.cpp"));
        info.record_file(std::path::PathBuf::from("b.cpp"));
        info.record_file(std::path::PathBuf::from("a.cpp"));
        assert_eq!(
            info.files,
            vec![std::path::PathBuf::from("a.cpp"), std::path::PathBuf::from("b.cpp")]
        );
    }

    #[test]
    fn ensure_function_is_defensive_with_zero_line() {
        let mut graph = CallGraph::new();
        let info = graph.ensure_function("ghost");
        assert_eq!(info.line, 0);
        assert!(graph.call_graph.contains_key("ghost"));
    }
}
