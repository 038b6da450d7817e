// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Utility functions shared by the block templates.
//!
//! The index helpers centralize the one-based-to-zero-based translation the
//! editor's position fields require: blocks count elements from 1 (and from
//! either end), C# indexes from 0. Every indexing template goes through
//! [`resolve_index`] or its two building blocks instead of spelling the
//! `- 1` arithmetic out locally.

use ecow::{EcoString, eco_format};

use super::{CodeGenError, Result};
use crate::block::Anchor;

/// Joins source lines with newlines; runtime helper bodies are written as
/// line lists, the way the assembled definitions read.
#[must_use]
pub(super) fn lines(parts: &[&str]) -> String {
    parts.join("\n")
}

/// Quotes a string as a C# string literal.
#[must_use]
pub(super) fn quote(text: &str) -> EcoString {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    EcoString::from(out)
}

/// Prefixes every non-empty line of `text` with `prefix`.
///
/// `text` may or may not end with a newline; the result always does when the
/// input is non-empty.
#[must_use]
pub(super) fn prefix_lines(text: &str, prefix: &str) -> String {
    let mut out = String::new();
    for line in text.split('\n') {
        if line.is_empty() {
            continue;
        }
        out.push_str(prefix);
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Whether `code` is a bare numeric literal.
#[must_use]
pub(super) fn is_number(code: &str) -> bool {
    !code.is_empty() && code.parse::<f64>().is_ok()
}

/// Whether `code` is a single identifier-shaped token (safe to re-evaluate).
#[must_use]
pub(super) fn is_simple_identifier(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Formats an `f64` the way numeric literals are emitted.
#[must_use]
pub(super) fn number_literal(value: f64) -> EcoString {
    eco_format!("{value}")
}

/// Translates a one-based offset expression to zero-based.
///
/// A numeric literal is folded right here (`"3"` → `"2"`); a dynamic
/// expression is decremented in the generated code, parenthesized so it can
/// be embedded anywhere (`"i"` → `"(i - 1)"`).
#[must_use]
pub(super) fn one_based_to_zero(at: &str) -> EcoString {
    if is_number(at) {
        // Folding is safe: the parse just succeeded.
        let n: f64 = at.parse().unwrap_or_default();
        return number_literal(n - 1.0);
    }
    eco_format!("({at} - 1)")
}

/// Zero-based index counted from the end: element 1-from-end is the last.
///
/// `length` is the full length expression of the subject (`list.Count`,
/// `text.Length`).
#[must_use]
pub(super) fn index_from_end(length: &str, at: &str) -> EcoString {
    eco_format!("{length} - {at}")
}

/// Resolves an anchored one-based position field to a zero-based C# index
/// expression.
///
/// `Random` has no static index; templates that accept it dispatch to a
/// runtime helper before calling here, so reaching it is an unsupported
/// combination.
pub(super) fn resolve_index(anchor: Anchor, at: &str, length: &str) -> Result<EcoString> {
    match anchor {
        Anchor::First => Ok(EcoString::from("0")),
        Anchor::Last => Ok(eco_format!("{length} - 1")),
        Anchor::FromStart => Ok(one_based_to_zero(at)),
        Anchor::FromEnd => Ok(index_from_end(length, at)),
        Anchor::Random => Err(CodeGenError::UnsupportedOperation {
            kind: "index anchor".to_string(),
            value: "RANDOM".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_escapes_specials() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(quote("back\\slash"), "\"back\\\\slash\"");
    }

    #[test]
    fn prefix_lines_skips_empty_lines() {
        assert_eq!(prefix_lines("a\nb\n", "// "), "// a\n// b\n");
        assert_eq!(prefix_lines("", "// "), "");
    }

    #[test]
    fn number_detection() {
        assert!(is_number("42"));
        assert!(is_number("-1.5"));
        assert!(!is_number("x + 1"));
        assert!(!is_number(""));
    }

    #[test]
    fn simple_identifier_detection() {
        assert!(is_simple_identifier("count2"));
        assert!(!is_simple_identifier("a + b"));
        assert!(!is_simple_identifier("list[0]"));
    }

    #[test]
    fn one_based_folding() {
        assert_eq!(one_based_to_zero("1"), "0");
        assert_eq!(one_based_to_zero("3"), "2");
        assert_eq!(one_based_to_zero("i"), "(i - 1)");
    }

    #[test]
    fn resolve_index_covers_static_anchors() {
        assert_eq!(
            resolve_index(Anchor::First, "1", "list.Count").unwrap(),
            "0"
        );
        assert_eq!(
            resolve_index(Anchor::Last, "1", "list.Count").unwrap(),
            "list.Count - 1"
        );
        assert_eq!(
            resolve_index(Anchor::FromStart, "2", "list.Count").unwrap(),
            "1"
        );
        assert_eq!(
            resolve_index(Anchor::FromEnd, "2", "list.Count").unwrap(),
            "list.Count - 2"
        );
        assert!(resolve_index(Anchor::Random, "1", "list.Count").is_err());
    }
}
