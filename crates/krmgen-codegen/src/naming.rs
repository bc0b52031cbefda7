//! Identifiers for generated modules and bindings

use std::collections::HashSet;

/// Rust keywords, strict and reserved
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Names the generated kind modules already use
const RESERVED_BINDINGS: &[&str] = &["all"];

/// Fallback binding for resources without `metadata.name`
pub const UNNAMED: &str = "unnamed";

/// snake_case form of a resource name or kind
///
/// `my-app.v2` becomes `my_app_v2`, `StatefulSet` becomes `stateful_set`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && i > 0 {
                let prev = chars[i - 1];
                let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
                if prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_lower)
                {
                    out.push('_');
                }
            }
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Turn arbitrary text into a usable binding name
pub fn binding_base(name: Option<&str>) -> String {
    let mut ident = name.map(to_snake_case).unwrap_or_default();
    if ident.is_empty() {
        ident = UNNAMED.to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "n_");
    }
    if RUST_KEYWORDS.contains(&ident.as_str()) || RESERVED_BINDINGS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Module name of a kind
pub fn module_name(kind: &str) -> String {
    let mut ident = to_snake_case(kind);
    if ident.is_empty() {
        ident = "kind".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "n_");
    }
    if RUST_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Hands out unique identifiers within one scope
#[derive(Debug, Default, Clone)]
pub struct IdentAllocator {
    taken: HashSet<String>,
}

impl IdentAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `base` if free, otherwise `base_1`, `base_2`, ... whichever is free first
    pub fn allocate(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{base}_{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
