// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Text block templates.
//!
//! Strings are `dynamic` at runtime, so most operations map straight onto
//! `System.String` members. Character positions arrive one-based from the
//! editor and are normalized through [`util`]'s index helpers; positions
//! with no static index (random) go through injected runtime helpers.

use ecow::{EcoString, eco_format};

use super::precedence::Order;
use super::util::{self, quote};
use super::{CSharpGenerator, Emitted, Result};
use crate::block::{Anchor, SearchEnd, Socket, TextCase, TrimMode};

impl CSharpGenerator {
    /// Text literal.
    pub(super) fn text(&mut self, text: &str) -> Result<Emitted> {
        Ok(Emitted::new(quote(text), Order::Atomic))
    }

    /// A string made up of any number of elements of any type.
    pub(super) fn text_join(&mut self, items: &[Socket]) -> Result<Emitted> {
        match items {
            [] => Ok(Emitted::new("\"\"", Order::Atomic)),
            [only] => {
                let arg = self.value_or(only, Order::None, "\"\"")?;
                Ok(Emitted::new(
                    eco_format!("{arg}.ToString()"),
                    Order::FunctionCall,
                ))
            }
            _ => {
                let mut args = Vec::with_capacity(items.len());
                for item in items {
                    args.push(self.value_or(item, Order::Comma, "\"\"")?);
                }
                let code = eco_format!("String.Concat({})", join(&args));
                Ok(Emitted::new(code, Order::FunctionCall))
            }
        }
    }

    /// Append to a variable in place.
    pub(super) fn text_append(&mut self, var: &str, text: &Socket) -> Result<EcoString> {
        let name = self.variable_name(var);
        let arg = self.value_or(text, Order::None, "\"\"")?;
        Ok(eco_format!("{name} = String.Concat({name}, {arg});\n"))
    }

    /// String length.
    pub(super) fn text_length(&mut self, value: &Socket) -> Result<Emitted> {
        let arg = self.value_or(value, Order::FunctionCall, "\"\"")?;
        Ok(Emitted::new(eco_format!("{arg}.Length"), Order::Member))
    }

    /// Is the string empty?
    pub(super) fn text_is_empty(&mut self, value: &Socket) -> Result<Emitted> {
        let arg = self.value_or(value, Order::Member, "\"\"")?;
        Ok(Emitted::new(
            eco_format!("{arg}.Length == 0"),
            Order::Equality,
        ))
    }

    /// Search the text for a substring, one-based result (0 = not found).
    pub(super) fn text_index_of(
        &mut self,
        end: SearchEnd,
        find: &Socket,
        value: &Socket,
    ) -> Result<Emitted> {
        let operator = match end {
            SearchEnd::First => "IndexOf",
            SearchEnd::Last => "LastIndexOf",
        };
        let needle = self.value_or(find, Order::None, "\"\"")?;
        let haystack = self.value_or(value, Order::Member, "\"\"")?;
        Ok(Emitted::new(
            eco_format!("{haystack}.{operator}({needle}) + 1"),
            Order::Addition,
        ))
    }

    /// Extract a single character.
    pub(super) fn text_char_at(
        &mut self,
        anchor: Anchor,
        at: &Socket,
        value: &Socket,
    ) -> Result<Emitted> {
        let at = self.value_or(at, Order::UnaryNegation, "1")?;
        let text = self.value_or(value, Order::Member, "\"\"")?;
        let code = match anchor {
            Anchor::First => eco_format!("{text}.First()"),
            Anchor::Last => eco_format!("{text}.Last()"),
            Anchor::FromStart => {
                let index = util::one_based_to_zero(&at);
                eco_format!("{text}[{index}]")
            }
            Anchor::FromEnd => {
                let index = util::index_from_end(&eco_format!("{text}.Length"), &at);
                eco_format!("{text}[{index}]")
            }
            Anchor::Random => {
                let helper = self.runtime_helper("text_random_letter", |name| {
                    util::lines(&[
                        &format!("var {name} = new Func<string, char>((text) => {{"),
                        "  var x = (new Random()).Next(text.Length);",
                        "  return text[x];",
                        "});",
                    ])
                });
                eco_format!("{helper}({text})")
            }
        };
        Ok(Emitted::new(code, Order::FunctionCall))
    }

    /// Get a substring between two anchored positions.
    pub(super) fn text_get_substring(
        &mut self,
        text: &Socket,
        where1: Anchor,
        at1: &Socket,
        where2: Anchor,
        at2: &Socket,
    ) -> Result<Emitted> {
        let text = self.value_or(text, Order::Member, "\"\"")?;
        if where1 == Anchor::First && where2 == Anchor::Last {
            return Ok(Emitted::new(text, Order::FunctionCall));
        }
        let at1 = self.value_or(at1, Order::None, "1")?;
        let at2 = self.value_or(at2, Order::None, "1")?;
        let helper = self.runtime_helper("text_get_substring", |name| {
            util::lines(&[
                &format!(
                    "var {name} = new Func<string, string, int, string, int, string>((text, where1, at1, where2, at2) => {{"
                ),
                "  var getAt = new Func<string, int, int>((where, at) => {",
                "    if (where == \"FROM_START\") {",
                "      at--;",
                "    } else if (where == \"FROM_END\") {",
                "      at = text.Length - at;",
                "    } else if (where == \"FIRST\") {",
                "      at = 0;",
                "    } else if (where == \"LAST\") {",
                "      at = text.Length - 1;",
                "    } else {",
                "      throw new ApplicationException(\"Unhandled option (text_get_substring).\");",
                "    }",
                "    return at;",
                "  });",
                "  at1 = getAt(where1, at1);",
                "  at2 = getAt(where2, at2) + 1;",
                "  return text.Substring(at1, at2 - at1);",
                "});",
            ])
        });
        let code = eco_format!(
            "{helper}({text}, \"{}\", {at1}, \"{}\", {at2})",
            where1.keyword(),
            where2.keyword()
        );
        Ok(Emitted::new(code, Order::FunctionCall))
    }

    /// Change capitalization.
    pub(super) fn text_change_case(&mut self, case: TextCase, text: &Socket) -> Result<Emitted> {
        let code = match case {
            TextCase::Upper => {
                let arg = self.value_or(text, Order::Member, "\"\"")?;
                eco_format!("{arg}.ToUpper()")
            }
            TextCase::Lower => {
                let arg = self.value_or(text, Order::Member, "\"\"")?;
                eco_format!("{arg}.ToLower()")
            }
            TextCase::Title => {
                // Title case is not a native string member; define one.
                let helper = self.runtime_helper("text_to_title_case", |name| {
                    util::lines(&[
                        &format!("var {name} = new Func<string, string>((str) => {{"),
                        "  var buf = new StringBuilder(str.Length);",
                        "  var toUpper = true;",
                        "  foreach (var ch in str) {",
                        "    buf.Append(toUpper ? Char.ToUpper(ch) : ch);",
                        "    toUpper = Char.IsWhiteSpace(ch);",
                        "  }",
                        "  return buf.ToString();",
                        "});",
                    ])
                });
                let arg = self.value_or(text, Order::None, "\"\"")?;
                eco_format!("{helper}({arg})")
            }
        };
        Ok(Emitted::new(code, Order::FunctionCall))
    }

    /// Trim spaces.
    pub(super) fn text_trim(&mut self, mode: TrimMode, text: &Socket) -> Result<Emitted> {
        let operator = match mode {
            TrimMode::Left => "TrimStart",
            TrimMode::Right => "TrimEnd",
            TrimMode::Both => "Trim",
        };
        let arg = self.value_or(text, Order::Member, "\"\"")?;
        Ok(Emitted::new(
            eco_format!("{arg}.{operator}()"),
            Order::FunctionCall,
        ))
    }

    /// Print statement.
    pub(super) fn text_print(&mut self, text: &Socket) -> Result<EcoString> {
        let arg = self.value_or(text, Order::None, "\"\"")?;
        Ok(eco_format!("Console.WriteLine({arg});\n"))
    }

    /// Prompt the user for input, optionally parsed as a number.
    pub(super) fn text_prompt(&mut self, message: &str, numeric: bool) -> Result<Emitted> {
        let helper = self.runtime_helper("text_prompt_input", |name| {
            util::lines(&[
                &format!("var {name} = new Func<string, bool, dynamic>((msg, toNumber) => {{"),
                "  Console.WriteLine(msg);",
                "  var res = Console.ReadLine();",
                "  if (toNumber)",
                "    return Double.Parse(res);",
                "  return res;",
                "});",
            ])
        });
        let msg = quote(message);
        Ok(Emitted::new(
            eco_format!("{helper}({msg}, {numeric})"),
            Order::FunctionCall,
        ))
    }
}

fn join(args: &[EcoString]) -> String {
    args.iter()
        .map(EcoString::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
