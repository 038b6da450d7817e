// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Deduplicated store of injected runtime helper definitions.
//!
//! Templates that need shared runtime logic (a median function, a random
//! list item picker) request it through [`HelperPool::ensure`]. The first
//! request for a key allocates an identifier through the [`NameRegistry`]
//! and runs the build closure once to produce the definition's source text;
//! every later request returns the same identifier without rebuilding.
//! The assembler materializes all stored definitions, in first-use order,
//! ahead of the program body — so each definition appears exactly once no
//! matter how many blocks requested it.

use std::collections::HashMap;

use ecow::EcoString;

use super::names::{NameRegistry, Namespace};

/// One stored definition.
#[derive(Debug)]
struct HelperEntry {
    key: EcoString,
    source: EcoString,
}

/// Insertion-ordered helper definition store for one generation run.
#[derive(Debug, Default)]
pub struct HelperPool {
    entries: Vec<HelperEntry>,
    /// key → identifier, for entries registered through [`ensure`].
    ///
    /// [`ensure`]: HelperPool::ensure
    identifiers: HashMap<EcoString, EcoString>,
}

impl HelperPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identifier for `key`, building the definition on first use.
    ///
    /// If `key` is new, a fresh identifier is allocated from `names` and
    /// `build` is invoked exactly once with it to produce the definition
    /// source; the entry is stored at the current end of the pool. If `key`
    /// is already present, the stored identifier is returned and `build` is
    /// not invoked — callers pass a closure, not a pre-built string, so the
    /// identifier allocation and formatting work happen at most once per run.
    pub fn ensure(
        &mut self,
        key: &str,
        names: &mut NameRegistry,
        build: impl FnOnce(&str) -> String,
    ) -> EcoString {
        if let Some(identifier) = self.identifiers.get(key) {
            return identifier.clone();
        }
        let identifier = names.get_distinct_name(key, Namespace::Helper);
        let source = build(identifier.as_str());
        self.entries.push(HelperEntry {
            key: EcoString::from(key),
            source: trimmed(source),
        });
        self.identifiers.insert(EcoString::from(key), identifier.clone());
        identifier
    }

    /// Stores (or replaces) a raw definition with no identifier of its own.
    ///
    /// Used for the variable-declaration preamble and for captured procedure
    /// definitions, which manage their identifiers through the registry
    /// directly. Replacing keeps the entry's original position.
    pub fn define(&mut self, key: &str, source: impl Into<EcoString>) {
        let source = trimmed(source.into().to_string());
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.source = source;
            return;
        }
        self.entries.push(HelperEntry {
            key: EcoString::from(key),
            source,
        });
    }

    /// Whether any definitions have been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All stored definitions in insertion order, separated by blank lines.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push_str("\n\n");
            }
            out.push_str(&entry.source);
        }
        out
    }

    /// Drops every entry. Must be called before reusing the pool for another
    /// generation run.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.identifiers.clear();
    }
}

fn trimmed(source: String) -> EcoString {
    EcoString::from(source.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESERVED: &[&str] = &["for"];

    #[test]
    fn ensure_builds_once() {
        let mut names = NameRegistry::new(RESERVED);
        let mut pool = HelperPool::new();
        let mut builds = 0;

        let first = pool.ensure("median", &mut names, |name| {
            builds += 1;
            format!("var {name} = ...;")
        });
        let second = pool.ensure("median", &mut names, |name| {
            builds += 1;
            format!("var {name} = ...;")
        });

        assert_eq!(first, second);
        assert_eq!(builds, 1);
        assert_eq!(pool.render(), "var median = ...;");
    }

    #[test]
    fn render_preserves_first_use_order() {
        let mut names = NameRegistry::new(RESERVED);
        let mut pool = HelperPool::new();
        pool.ensure("alpha", &mut names, |name| format!("def {name}"));
        pool.ensure("beta", &mut names, |name| format!("def {name}"));
        pool.ensure("alpha", &mut names, |name| format!("redef {name}"));

        assert_eq!(pool.render(), "def alpha\n\ndef beta");
    }

    #[test]
    fn define_replaces_in_place() {
        let mut pool = HelperPool::new();
        pool.define("variables", "dynamic x;");
        pool.define("proc", "var p = ...;");
        pool.define("variables", "dynamic x;\ndynamic y;");

        assert_eq!(pool.render(), "dynamic x;\ndynamic y;\n\nvar p = ...;");
    }

    #[test]
    fn reset_clears_entries_and_identifiers() {
        let mut names = NameRegistry::new(RESERVED);
        let mut pool = HelperPool::new();
        pool.ensure("median", &mut names, |name| format!("var {name};"));
        pool.reset();
        assert!(pool.is_empty());
        assert_eq!(pool.render(), "");
    }
}
