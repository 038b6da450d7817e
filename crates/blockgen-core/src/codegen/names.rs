// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Identifier assignment for one generation run.
//!
//! The registry maps *logical names* — the symbolic names a user chose in the
//! editor — to emitted identifiers that are legal in the target language,
//! never collide with each other, and never collide with the target's
//! reserved words. Namespaces keep a variable called `total` and a procedure
//! called `total` apart: each gets its own identifier.
//!
//! Sanitization and disambiguation are total; every call returns a usable
//! identifier, at worst an ugly one.

use std::collections::{HashMap, HashSet};

use ecow::EcoString;

/// Which category a logical name belongs to.
///
/// The same user-chosen word may exist in several namespaces at once; the
/// registry guarantees the emitted identifiers still differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// User variables (including loop counters named by the user).
    Variable,
    /// User-defined procedures.
    Procedure,
    /// Generator-injected runtime helper functions.
    Helper,
}

/// Identifier database for a single generation run.
#[derive(Debug)]
pub struct NameRegistry {
    /// Reserved words of the target language; never emitted as identifiers.
    reserved: HashSet<&'static str>,
    /// Stable assignments: (namespace, logical name) → emitted identifier.
    assigned: HashMap<(Namespace, EcoString), EcoString>,
    /// Every identifier handed out so far, across all namespaces.
    used: HashSet<EcoString>,
}

impl NameRegistry {
    /// Creates an empty registry guarding the given reserved words.
    #[must_use]
    pub fn new(reserved_words: &'static [&'static str]) -> Self {
        Self {
            reserved: reserved_words.iter().copied().collect(),
            assigned: HashMap::new(),
            used: HashSet::new(),
        }
    }

    /// Returns the stable identifier for a logical name within a namespace.
    ///
    /// The first call for a key sanitizes the name and disambiguates it
    /// against the reserved words and every identifier already handed out;
    /// later calls return the cached identifier unchanged.
    pub fn get_name(&mut self, name: &str, namespace: Namespace) -> EcoString {
        let key = (namespace, EcoString::from(name));
        if let Some(existing) = self.assigned.get(&key) {
            return existing.clone();
        }
        let identifier = self.claim(&sanitize(name));
        self.assigned.insert(key, identifier.clone());
        identifier
    }

    /// Returns a fresh identifier derived from `seed`, never handed out
    /// before — even for repeated calls with the same seed.
    ///
    /// Used for generator-synthesized temporaries (loop counters, cached
    /// sub-expression values) that have no logical name of their own. The
    /// namespace only documents intent; freshness is global.
    pub fn get_distinct_name(&mut self, seed: &str, _namespace: Namespace) -> EcoString {
        self.claim(&sanitize(seed))
    }

    /// Forgets every assignment. Must be called before reusing the registry
    /// for another generation run.
    pub fn reset(&mut self) {
        self.assigned.clear();
        self.used.clear();
    }

    /// Picks the first unused, non-reserved identifier on the `base`,
    /// `base2`, `base3`, ... ladder and marks it used.
    fn claim(&mut self, base: &str) -> EcoString {
        let mut candidate = EcoString::from(base);
        let mut suffix = 2u32;
        while self.reserved.contains(candidate.as_str()) || self.used.contains(&candidate) {
            candidate = ecow::eco_format!("{base}{suffix}");
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Rewrites a logical name into a legal C# identifier shape.
///
/// Characters outside `[A-Za-z0-9_]` become `_`; a leading digit gets a `_`
/// prefix; an empty (or all-invalid) name falls back to `unnamed`.
fn sanitize(name: &str) -> EcoString {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        return EcoString::from("unnamed");
    }
    if out.as_bytes()[0].is_ascii_digit() {
        out.insert(0, '_');
    }
    EcoString::from(out)
}
