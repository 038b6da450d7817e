// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! List block templates.
//!
//! Lists are `List<dynamic>` at runtime. The editor's position fields are
//! one-based and anchored at either end; every static position funnels
//! through [`util::resolve_index`], and the random positions go through
//! injected runtime helpers that pick the index when the program runs.

use ecow::{EcoString, eco_format};

use super::precedence::Order;
use super::util;
use super::{CSharpGenerator, CodeGenError, Emitted, Result};
use crate::block::{AccessMode, Anchor, SearchEnd, Socket, WriteMode};

const EMPTY_LIST: &str = "new List<dynamic>()";

impl CSharpGenerator {
    /// A fresh empty list.
    pub(super) fn lists_create_empty(&mut self) -> Result<Emitted> {
        Ok(Emitted::new(EMPTY_LIST, Order::New))
    }

    /// Create a list with any number of elements of any type.
    pub(super) fn lists_create_with(&mut self, items: &[Socket]) -> Result<Emitted> {
        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            parts.push(self.value_or(item, Order::Comma, "null")?);
        }
        let joined = parts
            .iter()
            .map(EcoString::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Emitted::new(
            eco_format!("new List<dynamic> {{{joined}}}"),
            Order::Atomic,
        ))
    }

    /// Create a list with one element repeated.
    pub(super) fn lists_repeat(&mut self, item: &Socket, count: &Socket) -> Result<Emitted> {
        let helper = self.runtime_helper("lists_repeat", |name| {
            util::lines(&[
                &format!("var {name} = new Func<dynamic, int, List<dynamic>>((value, n) => {{"),
                "  var array = new List<dynamic>(n);",
                "  for (var i = 0; i < n; i++) {",
                "    array.Add(value);",
                "  }",
                "  return array;",
                "});",
            ])
        });
        let item = self.value_or(item, Order::Comma, "null")?;
        let count = self.value_or(count, Order::Comma, "0")?;
        Ok(Emitted::new(
            eco_format!("{helper}({item}, {count})"),
            Order::FunctionCall,
        ))
    }

    /// List length.
    pub(super) fn lists_length(&mut self, value: &Socket) -> Result<Emitted> {
        let list = self.value_or(value, Order::FunctionCall, EMPTY_LIST)?;
        Ok(Emitted::new(eco_format!("{list}.Count"), Order::Member))
    }

    /// Is the list empty?
    pub(super) fn lists_is_empty(&mut self, value: &Socket) -> Result<Emitted> {
        let list = self.value_or(value, Order::Member, EMPTY_LIST)?;
        Ok(Emitted::new(
            eco_format!("{list}.Count == 0"),
            Order::Equality,
        ))
    }

    /// Find an item in the list, one-based result (0 = not found).
    pub(super) fn lists_index_of(
        &mut self,
        end: SearchEnd,
        find: &Socket,
        value: &Socket,
    ) -> Result<Emitted> {
        let operator = match end {
            SearchEnd::First => "IndexOf",
            SearchEnd::Last => "LastIndexOf",
        };
        let needle = self.value_or(find, Order::None, "null")?;
        let list = self.value_or(value, Order::Member, EMPTY_LIST)?;
        Ok(Emitted::new(
            eco_format!("{list}.{operator}({needle}) + 1"),
            Order::Addition,
        ))
    }

    /// Read an element (Get), or read and remove it (GetRemove).
    pub(super) fn lists_get_index_value(
        &mut self,
        mode: AccessMode,
        anchor: Anchor,
        at: &Socket,
        list: &Socket,
    ) -> Result<Emitted> {
        let at = self.value_or(at, Order::UnaryNegation, "1")?;
        let list = self.value_or(list, Order::Member, EMPTY_LIST)?;

        if anchor == Anchor::Random {
            let helper = self.random_item_helper();
            let remove = mode == AccessMode::GetRemove;
            return Ok(Emitted::new(
                eco_format!("{helper}({list}, {remove})"),
                Order::FunctionCall,
            ));
        }

        let index = util::resolve_index(anchor, &at, &eco_format!("{list}.Count"))?;
        match mode {
            AccessMode::Get => Ok(Emitted::new(eco_format!("{list}[{index}]"), Order::Member)),
            AccessMode::GetRemove => {
                let helper = self.get_remove_at_helper();
                Ok(Emitted::new(
                    eco_format!("{helper}({list}, {index})"),
                    Order::FunctionCall,
                ))
            }
            AccessMode::Remove => Err(CodeGenError::UnsupportedOperation {
                kind: "lists_get_index".to_string(),
                value: "REMOVE used as a value".to_string(),
            }),
        }
    }

    /// Remove an element without producing a value.
    pub(super) fn lists_remove_index(
        &mut self,
        anchor: Anchor,
        at: &Socket,
        list: &Socket,
    ) -> Result<EcoString> {
        let at = self.value_or(at, Order::UnaryNegation, "1")?;
        let list = self.value_or(list, Order::Member, EMPTY_LIST)?;
        if anchor == Anchor::Random {
            let helper = self.random_item_helper();
            return Ok(eco_format!("{helper}({list}, true);\n"));
        }
        let index = util::resolve_index(anchor, &at, &eco_format!("{list}.Count"))?;
        Ok(eco_format!("{list}.RemoveAt({index});\n"))
    }

    /// Set or insert an element at an anchored position.
    pub(super) fn lists_set_index(
        &mut self,
        mode: WriteMode,
        anchor: Anchor,
        at: &Socket,
        list: &Socket,
        to: &Socket,
    ) -> Result<EcoString> {
        let list = self.value_or(list, Order::Member, EMPTY_LIST)?;
        let at = self.value_or(at, Order::None, "1")?;
        let value = self.value_or(to, Order::Assignment, "null")?;

        if anchor == Anchor::Random {
            // Pick the index once, then write through it.
            let x_var = self.distinct_name("tmp_x");
            let pick = eco_format!("var {x_var} = (new Random()).Next({list}.Count);\n");
            let write = match mode {
                WriteMode::Set => eco_format!("{list}[{x_var}] = {value};\n"),
                WriteMode::Insert => eco_format!("{list}.Insert({x_var}, {value});\n"),
            };
            return Ok(eco_format!("{pick}{write}"));
        }

        // `list.Add` is cheaper than inserting at the computed end.
        if anchor == Anchor::Last && mode == WriteMode::Insert {
            return Ok(eco_format!("{list}.Add({value});\n"));
        }
        let index = util::resolve_index(anchor, &at, &eco_format!("{list}.Count"))?;
        Ok(match mode {
            WriteMode::Set => eco_format!("{list}[{index}] = {value};\n"),
            WriteMode::Insert => eco_format!("{list}.Insert({index}, {value});\n"),
        })
    }

    /// Get a sublist between two anchored positions.
    pub(super) fn lists_get_sublist(
        &mut self,
        list: &Socket,
        where1: Anchor,
        at1: &Socket,
        where2: Anchor,
        at2: &Socket,
    ) -> Result<Emitted> {
        let list = self.value_or(list, Order::Member, EMPTY_LIST)?;
        if where1 == Anchor::First && where2 == Anchor::Last {
            return Ok(Emitted::new(
                eco_format!("new List<dynamic>({list})"),
                Order::FunctionCall,
            ));
        }
        let at1 = self.value_or(at1, Order::None, "1")?;
        let at2 = self.value_or(at2, Order::None, "1")?;
        let helper = self.runtime_helper("lists_get_sublist", |name| {
            util::lines(&[
                &format!(
                    "var {name} = new Func<List<dynamic>, string, int, string, int, List<dynamic>>((list, where1, at1, where2, at2) => {{"
                ),
                "  var getIndex = new Func<string, int, int>((where, at) => {",
                "    if (where == \"FROM_START\") {",
                "      at--;",
                "    } else if (where == \"FROM_END\") {",
                "      at = list.Count - at;",
                "    } else if (where == \"FIRST\") {",
                "      at = 0;",
                "    } else if (where == \"LAST\") {",
                "      at = list.Count - 1;",
                "    } else {",
                "      throw new ApplicationException(\"Unhandled option (lists_get_sublist).\");",
                "    }",
                "    return at;",
                "  });",
                "  at1 = getIndex(where1, at1);",
                "  at2 = getIndex(where2, at2);",
                "  return list.GetRange(at1, at2 - at1 + 1);",
                "});",
            ])
        });
        let code = eco_format!(
            "{helper}({list}, \"{}\", {at1}, \"{}\", {at2})",
            where1.keyword(),
            where2.keyword()
        );
        Ok(Emitted::new(code, Order::FunctionCall))
    }

    /// Shared helper: pick (and optionally remove) a random element.
    fn random_item_helper(&mut self) -> EcoString {
        self.runtime_helper("lists_get_random_item", |name| {
            util::lines(&[
                &format!("var {name} = new Func<List<dynamic>, bool, dynamic>((list, remove) => {{"),
                "  var x = (new Random()).Next(list.Count);",
                "  if (remove) {",
                "    var res = list[x];",
                "    list.RemoveAt(x);",
                "    return res;",
                "  } else {",
                "    return list[x];",
                "  }",
                "});",
            ])
        })
    }

    /// Shared helper: remove an element at an index and return it.
    fn get_remove_at_helper(&mut self) -> EcoString {
        self.runtime_helper("lists_get_remove_at", |name| {
            util::lines(&[
                &format!("var {name} = new Func<List<dynamic>, int, dynamic>((list, index) => {{"),
                "  var res = list[index];",
                "  list.RemoveAt(index);",
                "  return res;",
                "});",
            ])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::{CSharpGenerator, target};
    use crate::block::{AccessMode, Anchor, Block, BlockKind, WriteMode};

    fn generator() -> CSharpGenerator {
        CSharpGenerator::new(target::CSHARP)
    }

    fn list_var() -> Option<Box<Block>> {
        Some(Box::new(Block::new(BlockKind::VariableGet {
            name: "items".into(),
        })))
    }

    fn num(value: f64) -> Option<Box<Block>> {
        Some(Box::new(Block::new(BlockKind::MathNumber { value })))
    }

    #[test]
    fn get_index_folds_numeric_positions() {
        let mut generator = generator();
        let emitted = generator
            .lists_get_index_value(AccessMode::Get, Anchor::FromStart, &num(3.0), &list_var())
            .unwrap();
        assert_eq!(emitted.code, "items[2]");
    }

    #[test]
    fn get_index_from_end_counts_back_from_length() {
        let mut generator = generator();
        let emitted = generator
            .lists_get_index_value(AccessMode::Get, Anchor::FromEnd, &num(1.0), &list_var())
            .unwrap();
        assert_eq!(emitted.code, "items[items.Count - 1]");
    }

    #[test]
    fn remove_statement_uses_remove_at() {
        let mut generator = generator();
        let code = generator
            .lists_remove_index(Anchor::First, &None, &list_var())
            .unwrap();
        assert_eq!(code, "items.RemoveAt(0);\n");
    }

    #[test]
    fn insert_at_last_is_an_add() {
        let mut generator = generator();
        let code = generator
            .lists_set_index(
                WriteMode::Insert,
                Anchor::Last,
                &None,
                &list_var(),
                &num(7.0),
            )
            .unwrap();
        assert_eq!(code, "items.Add(7);\n");
    }

    #[test]
    fn random_set_picks_the_index_once() {
        let mut generator = generator();
        let code = generator
            .lists_set_index(
                WriteMode::Set,
                Anchor::Random,
                &None,
                &list_var(),
                &num(7.0),
            )
            .unwrap();
        assert_eq!(
            code,
            "var tmp_x = (new Random()).Next(items.Count);\nitems[tmp_x] = 7;\n"
        );
    }
}
