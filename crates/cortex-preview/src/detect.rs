//! Static component lookup over React source.
//!
//! Generated React code is told not to use modules, so the preview cannot
//! import a component by name. The document footer guesses at runtime: the
//! default export if there is one, otherwise the first global whose name
//! starts with a capital and whose value is a function, in
//! `Object.keys(window)` order.
//!
//! This module mirrors that guess over the source text so the host can
//! report what the preview will most likely mount. It is a best-effort
//! heuristic, and deliberately fragile in the same places as the runtime:
//!
//! - only unindented (top-level) declarations count;
//! - `function X`, `class X` and `const|let|var X = <function or arrow>`
//!   are candidates, since Babel lowers all of them to globals;
//! - when several candidates exist the runtime pick depends on the engine's
//!   key enumeration order. The scan reports every candidate in source order
//!   and leaves the choice to the runtime rather than resolving it.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static DEFAULT_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|[;\s])(?:export\s+default\b|exports\.default\s*=)")
        .expect("default export pattern is valid")
});

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^(?:(?:async\s+)?function\s*\*?\s*([A-Z][\w$]*)\s*\(|class\s+([A-Z][\w$]*)\b|(?:const|let|var)\s+([A-Z][\w$]*)\s*=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*=>|[A-Za-z_$][\w$]*\s*=>|React\.(?:memo|forwardRef)\s*\())",
    )
    .expect("declaration pattern is valid")
});

/// What the preview footer is expected to mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentLookup {
    /// The source assigns a default export, which always wins.
    DefaultExport,
    /// A capitalized global. `others` lists further candidates in source
    /// order; when non-empty the runtime pick is ambiguous.
    Global {
        name: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        others: Vec<String>,
    },
    /// Nothing looks like a component; the preview will show
    /// "No component found".
    NotFound,
}

impl ComponentLookup {
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ComponentLookup::Global { others, .. } if !others.is_empty())
    }
}

/// Scan React source for the component the preview footer would pick.
pub fn scan_components(code: &str) -> ComponentLookup {
    if DEFAULT_EXPORT.is_match(code) {
        return ComponentLookup::DefaultExport;
    }

    let mut names: Vec<String> = Vec::new();
    for caps in DECLARATION.captures_iter(code) {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().to_string());
        if let Some(name) = name
            && !names.contains(&name)
        {
            names.push(name);
        }
    }

    let mut names = names.into_iter();
    match names.next() {
        Some(name) => ComponentLookup::Global {
            name,
            others: names.collect(),
        },
        None => ComponentLookup::NotFound,
    }
}
