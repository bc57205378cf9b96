//! Call-Graph Builder.
//!
//! Each file is parsed independently (so multiple files may run in
//! parallel) into an ordered list of traversal events, then every file's
//! events are replayed into the shared graph in input-list order. That
//! keeps the merge itself single-threaded and deterministic regardless of
//! which file happened to finish parsing first.

use crate::error::{CallGraphError, Result};
use crate::filter::is_retained_call;
use cvescan_core::{CallGraph, CallSite};
use std::path::{Path, PathBuf};
use tree_sitter::{Language, Node, Parser};

fn cpp_language() -> Language {
    tree_sitter_cpp::LANGUAGE.into()
}

#[derive(Debug)]
enum Event {
    Definition { name: String, line: usize },
    Call { caller: String, site: CallSite },
}

struct ParsedFile {
    path: PathBuf,
    events: Vec<Event>,
}

fn identifier_chain(node: Node, source: &[u8]) -> Vec<String> {
    match node.kind() {
        "identifier" | "field_identifier" | "namespace_identifier" => {
            vec![node.utf8_text(source).unwrap_or("").to_string()]
        }
        "field_expression" => {
            let mut chain = node
                .child_by_field_name("argument")
                .map(|n| identifier_chain(n, source))
                .unwrap_or_default();
            if let Some(field) = node.child_by_field_name("field") {
                chain.extend(identifier_chain(field, source));
            }
            chain
        }
        _ => Vec::new(),
    }
}

/// The callee name extraction rule: identifier, joined field_expression,
/// or qualified_identifier's full text.
fn extract_callee_name(function_node: Node, source: &[u8]) -> Option<String> {
    match function_node.kind() {
        "identifier" => function_node.utf8_text(source).ok().map(str::to_string),
        "field_expression" => {
            let chain = identifier_chain(function_node, source);
            (!chain.is_empty()).then(|| chain.join("::"))
        }
        "qualified_identifier" => function_node.utf8_text(source).ok().map(str::to_string),
        _ => None,
    }
}

/// The defined-name extraction rule: first `identifier` child inside a
/// `function_declarator` nested somewhere under `node`.
fn extract_defined_name(node: Node, source: &[u8]) -> Option<String> {
    let declarator = find_descendant(node, "function_declarator")?;
    let mut cursor = declarator.walk();
    for child in declarator.children(&mut cursor) {
        if child.kind() == "identifier" {
            return child.utf8_text(source).ok().map(str::to_string);
        }
    }
    None
}

fn find_descendant<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    if node.kind() == kind {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_descendant(child, kind) {
            return Some(found);
        }
    }
    None
}

fn walk(node: Node, source: &[u8], enclosing: Option<&str>, events: &mut Vec<Event>) {
    match node.kind() {
        "function_definition" => {
            if let Some(name) = extract_defined_name(node, source) {
                let line = node.start_position().row + 1;
                events.push(Event::Definition { name: name.clone(), line });

                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    walk(child, source, Some(&name), events);
                }
                return;
            }
        }
        "call_expression" => {
            if let Some(caller) = enclosing {
                if let Some(function_node) = node.child_by_field_name("function") {
                    if let Some(name) = extract_callee_name(function_node, source) {
                        let parent_kind = node.parent().map(|p| p.kind().to_string());
                        if is_retained_call(&name, parent_kind.as_deref()) {
                            let pos = node.start_position();
                            events.push(Event::Call {
                                caller: caller.to_string(),
                                site: CallSite {
                                    function: name,
                                    line: pos.row + 1,
                                    column: pos.column + 1,
                                },
                            });
                        }
                    }
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, source, enclosing, events);
    }
}

fn parse_file(path: &Path) -> Result<ParsedFile> {
    let source = std::fs::read(path).map_err(|e| CallGraphError::ReadFailed {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut parser = Parser::new();
    parser
        .set_language(&cpp_language())
        .map_err(|_| CallGraphError::GrammarInitFailed)?;

    let tree = parser.parse(&source, None).ok_or(CallGraphError::GrammarInitFailed)?;

    let mut events = Vec::new();
    walk(tree.root_node(), &source, None, &mut events);

    Ok(ParsedFile { path: path.to_path_buf(), events })
}

fn merge(graph: &mut CallGraph, parsed: ParsedFile) {
    let file = parsed.path;
    for event in parsed.events {
        match event {
            Event::Definition { name, line } => {
                let already_known = graph.functions.contains_key(&name);
                let info = graph.ensure_function(&name);
                if !already_known {
                    info.line = line;
                }
                info.record_file(file.clone());
                graph.record_file_function(&file, &name);
            }
            Event::Call { caller, site } => {
                let info = graph.ensure_function(&caller);
                info.calls.push(site.clone());
                graph.add_edge(&file, &caller, &site.function);
            }
        }
    }
}

/// Build the call graph over `files`, in input-list order. Files are
/// parsed independently (safe to parallelize with e.g. rayon) and merged
/// back sequentially in the same order, so the resulting graph is
/// order-independent with respect to parsing schedule.
pub fn build(files: &[PathBuf]) -> Result<CallGraph> {
    if files.is_empty() {
        return Err(CallGraphError::NoSources);
    }

    use rayon::prelude::*;
    let parsed: Vec<Option<ParsedFile>> = files
        .par_iter()
        .map(|path| match parse_file(path) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!("skipping {}: {e}", path.display());
                None
            }
        })
        .collect();

    let mut graph = CallGraph::new();
    for p in parsed.into_iter().flatten() {
        merge(&mut graph, p);
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_cpp(contents: &str) -> NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".cpp").tempfile().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    // direct vulnerability.
    #[test]
    fn s1_single_function_single_call() {
        let file = write_cpp("void run() { curl_easy_init(); }");
        let graph = build(&[file.path().to_path_buf()]).unwrap();

        assert!(graph.functions.contains_key("run"));
        assert_eq!(graph.call_graph["run"], vec!["curl_easy_init".to_string()]);
    }

    // indirect vulnerability.
    #[test]
    fn s2_three_level_chain() {
        let file = write_cpp(
            "void inner(){ openssl_sha256(); } void outer(){ inner(); } void top(){ outer(); }",
        );
        let graph = build(&[file.path().to_path_buf()]).unwrap();

        assert_eq!(graph.call_graph["inner"], vec!["openssl_sha256".to_string()]);
        assert_eq!(graph.call_graph["outer"], vec!["inner".to_string()]);
        assert_eq!(graph.call_graph["top"], vec!["outer".to_string()]);
    }

    #[test]
    fn type_casts_are_excluded_from_call_sites() {
        let file = write_cpp("void run() { int x = (int)value(); String(s); }");
        let graph = build(&[file.path().to_path_buf()]).unwrap();

        let callees = &graph.call_graph["run"];
        assert!(!callees.contains(&"String".to_string()));
    }

    #[test]
    fn repeated_definitions_collapse_to_one_node_and_keep_first_line() {
        let a = write_cpp("void run() { foo(); }");
        let b = write_cpp("void run() { bar(); }");
        let graph = build(&[a.path().to_path_buf(), b.path().to_path_buf()]).unwrap();

        assert_eq!(graph.functions["run"].files.len(), 2);
        assert_eq!(graph.call_graph["run"], vec!["foo".to_string(), "bar".to_string()]);
    }

    #[test]
    fn empty_file_list_is_rejected() {
        assert!(build(&[]).is_err());
    }

    #[test]
    fn unreadable_file_is_skipped_not_fatal() {
        let graph = build(&[PathBuf::from("/nonexistent/path/does-not-exist.cpp")]).unwrap();
        assert!(graph.functions.is_empty());
    }
}
