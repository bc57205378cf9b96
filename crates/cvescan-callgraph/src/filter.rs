//! Identifier Filter.
//!
//! Two pure predicates over a candidate callee string. Rules are
//! reproduced in the exact order and shape laid out by the original
//! classifier design — they materially affect the resulting graph, so the
//! cascade is encoded as an exhaustive ordered list of checks rather than
//! refactored into something "cleaner".

const CPP_KEYWORDS: &[&str] = &[
    "void", "bool", "char", "int", "float", "double", "long", "short", "signed", "unsigned",
    "wchar_t", "char8_t", "char16_t", "char32_t", "auto", "if", "else", "for", "while", "do",
    "switch", "case", "default", "break", "continue", "return", "goto", "static", "extern",
    "const", "constexpr", "mutable", "volatile", "register", "inline", "virtual", "explicit",
    "friend", "typedef", "typename", "namespace", "using", "class", "struct", "union", "enum",
    "public", "private", "protected", "template", "operator", "sizeof", "alignof", "static_cast",
    "dynamic_cast", "const_cast", "reinterpret_cast", "true", "false", "nullptr", "this", "new",
    "delete", "throw", "try", "catch", "noexcept", "decltype",
];

const BUILTIN_TYPE_NAMES: &[&str] = &["String", "Vector", "List", "Map", "Set", "Array", "Pair", "Tuple"];

const C_LIBRARY_WHITELIST: &[&str] = &[
    "memset", "memcpy", "malloc", "free", "printf", "scanf", "strlen", "strcpy", "strcmp",
    "fopen", "fclose", "fread", "deflate", "inflate", "accept", "bind", "connect", "listen",
];

const VERB_PREFIXES: &[&str] = &[
    "get", "set", "is", "has", "can", "should", "will", "create", "init", "start", "stop",
    "open", "close", "read", "write", "parse", "handle", "process", "fetch", "load", "save",
    "update", "delete", "insert", "query", "send", "receive", "connect", "disconnect", "bind",
];

/// True if `parent_kind` marks this as a cast context, or the name itself
/// "looks like a type" by shape.
pub fn is_type_cast(name: &str, parent_kind: Option<&str>) -> bool {
    if let Some(kind) = parent_kind {
        if matches!(kind, "cast_expression" | "type_descriptor" | "sized_type_specifier") {
            return true;
        }
    }
    looks_like_type(name)
}

fn looks_like_type(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if !first.is_uppercase() || name.contains("::") || name.contains('_') {
        return false;
    }
    if BUILTIN_TYPE_NAMES.contains(&name) {
        return true;
    }
    name.chars().count() < 12 && name.chars().skip(1).all(|c| !c.is_lowercase())
}

/// 1-based positions of the uppercase letter at each lowercase->uppercase
/// transition within `name` (used for rule 7's `i/length` ratio).
fn case_transitions(name: &str) -> Vec<usize> {
    let chars: Vec<char> = name.chars().collect();
    let mut transitions = Vec::new();
    for i in 1..chars.len() {
        if chars[i - 1].is_lowercase() && chars[i].is_uppercase() {
            transitions.push(i + 1);
        }
    }
    transitions
}

/// The 8-step validity cascade, each branch tagged with its rule number.
pub fn is_valid_call(name: &str) -> bool {
    // Rule 1
    if name.chars().count() <= 2 {
        return false;
    }

    // Rule 2
    let lower = name.to_lowercase();
    if CPP_KEYWORDS.contains(&lower.as_str()) {
        return false;
    }

    // Rule 3: all-uppercase, no underscore -> manifest constant
    let all_upper_no_underscore =
        !name.contains('_') && name.chars().all(|c| !c.is_alphabetic() || c.is_uppercase()) && name.chars().any(|c| c.is_alphabetic());
    if all_upper_no_underscore {
        return false;
    }

    // Rule 4
    if name.contains("::") {
        return true;
    }

    // Rule 5
    if name.contains('_') {
        let all_upper = name.chars().all(|c| !c.is_alphabetic() || c.is_uppercase());
        return !all_upper;
    }

    let first = name.chars().next().expect("checked non-empty above");

    // Rule 6
    if first.is_uppercase() {
        return true;
    }

    // Rule 7: first character lowercase
    let has_upper = name.chars().any(|c| c.is_uppercase());
    if !has_upper {
        if name.chars().count() >= 15 || name.chars().any(|c| c.is_ascii_digit()) {
            return true;
        }
        return C_LIBRARY_WHITELIST.contains(&name);
    }

    let transitions = case_transitions(name);
    match transitions.len() {
        0 => true, // default: accept (rule 8, reached via no lower->upper transition despite has_upper)
        1 => {
            let i = transitions[0];
            let len = name.chars().count();
            if (i as f64) / (len as f64) >= 0.35 {
                true
            } else {
                let prefix_len = i - 1;
                let prefix: String = name.chars().take(prefix_len).collect::<String>().to_lowercase();
                VERB_PREFIXES.contains(&prefix.as_str())
            }
        }
        _ => true,
    }
}

/// Combines both predicates the way the call-graph builder does at a
/// `call_expression` site: rejected if it looks like a cast, or fails the
/// validity cascade.
pub fn is_retained_call(name: &str, parent_kind: Option<&str>) -> bool {
    !is_type_cast(name, parent_kind) && is_valid_call(name)
}
