// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! C# code generation for block programs.
//!
//! This module transforms a read-only [`Program`] tree into C# source text.
//! The engine has four load-bearing parts, each with a hard invariant:
//!
//! - [`precedence`] — a static binding-strength table; a child expression is
//!   parenthesized iff it binds looser than its context requires, so output
//!   is unambiguous with no redundant parentheses
//! - [`names`] — identifier assignment; the same logical name always maps to
//!   the same identifier within a run, two keys never collide, and reserved
//!   words are never emitted
//! - [`helpers`] — runtime helper injection; a helper definition is emitted
//!   exactly once per run no matter how many blocks request it
//! - the statement sequencer in this file — chains emit in link order, with
//!   each block's attached comments ahead of its code
//!
//! All per-run state lives in the generator constructed fresh by
//! [`generate_program`]; nothing leaks between runs.
//!
//! # Example
//!
//! ```
//! use blockgen_core::block::{ArithOp, Block, BlockKind, Program};
//! use blockgen_core::codegen::generate;
//!
//! let num = |value| Some(Box::new(Block::new(BlockKind::MathNumber { value })));
//! let sum = Block::new(BlockKind::MathArithmetic {
//!     op: ArithOp::Add,
//!     a: num(2.0),
//!     b: num(3.0),
//! });
//! let product = Block::new(BlockKind::MathArithmetic {
//!     op: ArithOp::Multiply,
//!     a: Some(Box::new(sum)),
//!     b: num(4.0),
//! });
//! let program = Program { variables: vec![], roots: vec![product] };
//! assert_eq!(generate(&program).unwrap(), "(2 + 3) * 4;\n");
//! ```

mod colour;
mod control;
pub mod helpers;
mod lists;
mod logic;
mod math;
pub mod names;
pub mod precedence;
mod procedures;
pub mod target;
#[cfg(test)]
mod tests;
mod text;
mod util;
mod variables;

use ecow::{EcoString, eco_format};
use thiserror::Error;

use crate::block::{Block, BlockKind, Program, Socket};
use self::helpers::HelperPool;
use self::names::{NameRegistry, Namespace};
use self::precedence::Order;
use self::target::TargetProfile;

/// Recursion ceiling for malformed (cyclic or absurdly deep) trees.
///
/// The editor guarantees acyclic trees, so this only exists to fail
/// predictably instead of overflowing the stack.
const MAX_DEPTH: usize = 256;

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum CodeGenError {
    /// A block kind was used in a position its configuration does not
    /// support (a statement in a value socket, or the reverse).
    #[error("unsupported operation: {kind} ({value})")]
    UnsupportedOperation {
        /// The offending block kind.
        kind: String,
        /// The offending mode or position.
        value: String,
    },

    /// The tree nests deeper than the defensive recursion ceiling; with a
    /// well-formed editor this means a cycle was wired in upstream.
    #[error("block tree exceeds the maximum nesting depth of {max_depth}")]
    MalformedTree {
        /// The depth limit that was exceeded.
        max_depth: usize,
    },
}

/// Result type for code generation operations.
pub type Result<T> = std::result::Result<T, CodeGenError>;

/// Options for a generation run.
#[derive(Debug, Clone, Copy)]
pub struct CodegenOptions {
    target: TargetProfile,
}

impl CodegenOptions {
    /// Default options: the C# target.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: target::CSHARP,
        }
    }

    /// Overrides the target profile (reserved words, comment prefix,
    /// indentation).
    #[must_use]
    pub fn with_target(mut self, target: TargetProfile) -> Self {
        self.target = target;
        self
    }
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates C# source for a block program.
///
/// This is the main entry point. A fresh generator is constructed for the
/// run, the workspace variables are declared, every root chain is sequenced
/// in order, and the assembled text (helper definitions first, body second)
/// is returned.
///
/// # Errors
///
/// Returns [`CodeGenError`] if a block sits in a position it does not
/// support, or if the tree nests past the defensive depth limit. No partial
/// output is produced on error.
pub fn generate_program(program: &Program, options: CodegenOptions) -> Result<String> {
    let mut generator = CSharpGenerator::new(options.target);
    generator.declare_variables(&program.variables);

    let mut body = String::new();
    for root in &program.roots {
        if root.produces_value() {
            // A naked top-level value: still generate it, terminated as an
            // expression statement so the output stays legal.
            let emitted = generator.emit_value(root)?;
            body.push_str(&generator.collected_comments(root));
            body.push_str(&generator.scrub_naked_value(&emitted.code));
        } else {
            body.push_str(&generator.block_to_code(root)?);
        }
    }

    Ok(generator.finish(&body))
}

/// Generates C# with default options. Convenience wrapper around
/// [`generate_program`].
///
/// # Errors
///
/// Returns [`CodeGenError`] if code generation fails.
pub fn generate(program: &Program) -> Result<String> {
    generate_program(program, CodegenOptions::new())
}

/// An emitted value expression: its code and the binding strength of its
/// outermost operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Emitted {
    pub(crate) code: EcoString,
    pub(crate) order: Order,
}

impl Emitted {
    pub(crate) fn new(code: impl Into<EcoString>, order: Order) -> Self {
        Self {
            code: code.into(),
            order,
        }
    }
}

/// What a statement template produced.
pub(crate) enum StatementCode {
    /// Newline-terminated statement code to splice into the chain.
    Code(EcoString),
    /// The template handled its own emission (and whatever follows) —
    /// procedure definitions store themselves in the helper pool.
    Captured,
}

/// C# code generator: the per-run generation context.
///
/// Owns exactly one [`NameRegistry`] and one [`HelperPool`]. Constructed
/// fresh per run by [`generate_program`]; a single instance must never be
/// shared between concurrent runs, and [`reset`](Self::reset) must be called
/// before reusing one sequentially.
pub(crate) struct CSharpGenerator {
    target: TargetProfile,
    names: NameRegistry,
    helpers: HelperPool,
    depth: usize,
}

impl CSharpGenerator {
    /// Creates a generator for one run against the given target.
    pub(crate) fn new(target: TargetProfile) -> Self {
        Self {
            target,
            names: NameRegistry::new(target.reserved_words),
            helpers: HelperPool::new(),
            depth: 0,
        }
    }

    /// Clears all per-run state so the generator can serve another run.
    #[allow(dead_code)] // part of the context contract; exercised in tests
    pub(crate) fn reset(&mut self) {
        self.names.reset();
        self.helpers.reset();
        self.depth = 0;
    }

    // --- expression emission ---

    /// Emits the child connected to a value socket, parenthesized when (and
    /// only when) it binds looser than `context` allows.
    ///
    /// Returns `Ok(None)` for an empty socket: an unconnected input is not
    /// an error, the caller substitutes a type-appropriate neutral default
    /// so an incomplete program still generates valid code.
    pub(crate) fn value_to_code(
        &mut self,
        socket: &Socket,
        context: Order,
    ) -> Result<Option<EcoString>> {
        let Some(block) = socket else {
            return Ok(None);
        };
        let emitted = self.emit_value(block)?;
        if emitted.order.needs_parens_in(context) {
            return Ok(Some(eco_format!("({})", emitted.code)));
        }
        Ok(Some(emitted.code))
    }

    /// [`value_to_code`](Self::value_to_code) with the permissive default
    /// applied: an empty socket emits `default`.
    pub(crate) fn value_or(
        &mut self,
        socket: &Socket,
        context: Order,
        default: &str,
    ) -> Result<EcoString> {
        Ok(self
            .value_to_code(socket, context)?
            .unwrap_or_else(|| EcoString::from(default)))
    }

    /// Dispatches a value-producing block to its template.
    pub(crate) fn emit_value(&mut self, block: &Block) -> Result<Emitted> {
        if !block.produces_value() {
            return Err(CodeGenError::UnsupportedOperation {
                kind: block.kind.name().to_string(),
                value: "statement block in a value socket".to_string(),
            });
        }
        self.enter()?;
        let result = self.dispatch_value(block);
        self.depth -= 1;
        result
    }

    fn dispatch_value(&mut self, block: &Block) -> Result<Emitted> {
        use BlockKind::*;
        match &block.kind {
            Text { text } => self.text(text),
            TextJoin { items } => self.text_join(items),
            TextLength { value } => self.text_length(value),
            TextIsEmpty { value } => self.text_is_empty(value),
            TextIndexOf { end, find, value } => self.text_index_of(*end, find, value),
            TextCharAt { anchor, at, value } => self.text_char_at(*anchor, at, value),
            TextGetSubstring {
                text,
                where1,
                at1,
                where2,
                at2,
            } => self.text_get_substring(text, *where1, at1, *where2, at2),
            TextChangeCase { case, text } => self.text_change_case(*case, text),
            TextTrim { mode, text } => self.text_trim(*mode, text),
            TextPrompt { message, numeric } => self.text_prompt(message, *numeric),
            VariableGet { name } => self.variables_get(name),
            MathNumber { value } => self.math_number(*value),
            MathArithmetic { op, a, b } => self.math_arithmetic(*op, a, b),
            MathSingle { op, num } => self.math_single(*op, num),
            MathConstant { constant } => self.math_constant(*constant),
            MathNumberProperty {
                property,
                number,
                divisor,
            } => self.math_number_property(*property, number, divisor),
            MathOnList { op, list } => self.math_on_list(*op, list),
            MathModulo { dividend, divisor } => self.math_modulo(dividend, divisor),
            MathConstrain { value, low, high } => self.math_constrain(value, low, high),
            MathRandomInt { from, to } => self.math_random_int(from, to),
            MathRandomFloat => self.math_random_float(),
            LogicCompare { op, a, b } => self.logic_compare(*op, a, b),
            LogicOperation { op, a, b } => self.logic_operation(*op, a, b),
            LogicNegate { value } => self.logic_negate(value),
            LogicBoolean { value } => self.logic_boolean(*value),
            LogicNull => self.logic_null(),
            LogicTernary {
                condition,
                then,
                otherwise,
            } => self.logic_ternary(condition, then, otherwise),
            ListsCreateEmpty => self.lists_create_empty(),
            ListsCreateWith { items } => self.lists_create_with(items),
            ListsRepeat { item, count } => self.lists_repeat(item, count),
            ListsLength { value } => self.lists_length(value),
            ListsIsEmpty { value } => self.lists_is_empty(value),
            ListsIndexOf { end, find, value } => self.lists_index_of(*end, find, value),
            ListsGetIndex {
                mode,
                anchor,
                at,
                list,
            } => self.lists_get_index_value(*mode, *anchor, at, list),
            ListsGetSublist {
                list,
                where1,
                at1,
                where2,
                at2,
            } => self.lists_get_sublist(list, *where1, at1, *where2, at2),
            ColourPicker { colour } => self.colour_picker(colour),
            ColourRandom => self.colour_random(),
            ColourRgb { red, green, blue } => self.colour_rgb(red, green, blue),
            ColourBlend {
                colour1,
                colour2,
                ratio,
            } => self.colour_blend(colour1, colour2, ratio),
            ProceduresCallReturn { name, args } => self.procedures_call_return(name, args),
            // produces_value() already routed statement kinds away.
            _ => Err(CodeGenError::UnsupportedOperation {
                kind: block.kind.name().to_string(),
                value: "statement block in a value socket".to_string(),
            }),
        }
    }

    // --- statement sequencing ---

    /// Sequences the statement chain headed by `block`: comments, code, and
    /// everything linked after it, in order.
    pub(crate) fn block_to_code(&mut self, block: &Block) -> Result<EcoString> {
        self.enter()?;
        let result = match self.dispatch_statement(block) {
            Err(e) => Err(e),
            Ok(StatementCode::Captured) => Ok(EcoString::new()),
            Ok(StatementCode::Code(code)) => self.scrub(block, &code),
        };
        self.depth -= 1;
        result
    }

    fn dispatch_statement(&mut self, block: &Block) -> Result<StatementCode> {
        use BlockKind::*;
        if block.produces_value() {
            return Err(CodeGenError::UnsupportedOperation {
                kind: block.kind.name().to_string(),
                value: "value block in a statement position".to_string(),
            });
        }
        let code = match &block.kind {
            TextAppend { var, text } => self.text_append(var, text)?,
            TextPrint { text } => self.text_print(text)?,
            VariableSet { name, value } => self.variables_set(name, value)?,
            MathChange { var, delta } => self.math_change(var, delta)?,
            ControlsIf {
                branches,
                else_body,
            } => self.controls_if(branches, else_body)?,
            ControlsRepeat { times, body } => self.controls_repeat(times, body)?,
            ControlsWhileUntil {
                until,
                condition,
                body,
            } => self.controls_while_until(*until, condition, body)?,
            ControlsFor {
                var,
                from,
                to,
                by,
                body,
            } => self.controls_for(var, from, to, by, body)?,
            ControlsForEach { var, list, body } => self.controls_for_each(var, list, body)?,
            ControlsFlow { flow } => self.controls_flow(*flow),
            ListsGetIndex {
                anchor, at, list, ..
            } => self.lists_remove_index(*anchor, at, list)?,
            ListsSetIndex {
                mode,
                anchor,
                at,
                list,
                to,
            } => self.lists_set_index(*mode, *anchor, at, list, to)?,
            ProceduresDef {
                name,
                params,
                body,
                ret,
            } => {
                self.procedures_def(block, name, params, body, ret)?;
                return Ok(StatementCode::Captured);
            }
            ProceduresCallNoReturn { name, args } => self.procedures_call_no_return(name, args)?,
            ProceduresIfReturn {
                condition,
                value,
                has_return,
            } => self.procedures_if_return(condition, value, *has_return)?,
            // dispatch_statement is only reached for statement kinds.
            _ => {
                return Err(CodeGenError::UnsupportedOperation {
                    kind: block.kind.name().to_string(),
                    value: "value block in a statement position".to_string(),
                });
            }
        };
        Ok(StatementCode::Code(code))
    }

    /// Emits the chain connected to a statement socket, indented one level.
    pub(crate) fn statement_to_code(&mut self, socket: &Socket) -> Result<EcoString> {
        let Some(block) = socket else {
            return Ok(EcoString::new());
        };
        let code = self.block_to_code(block)?;
        Ok(EcoString::from(util::prefix_lines(&code, self.target.indent)))
    }

    /// Common tasks after a statement template ran: prepend the block's
    /// comments, then append the code for the rest of the chain.
    ///
    /// Comments are collected for the block itself and for the value blocks
    /// plugged into it (including their value descendants). Nested statement
    /// chains keep their comments for their own sequencing pass.
    fn scrub(&mut self, block: &Block, code: &str) -> Result<EcoString> {
        let mut out = EcoString::new();
        out.push_str(&self.collected_comments(block));
        out.push_str(code);
        if let Some(next) = &block.next {
            out.push_str(&self.block_to_code(next)?);
        }
        Ok(out)
    }

    /// Comment text for a statement-position block: its own comment plus the
    /// comments of its value children and their value descendants, formatted
    /// as target-language comment lines.
    fn collected_comments(&self, block: &Block) -> String {
        let mut out = String::new();
        if let Some(comment) = &block.comment {
            out.push_str(&util::prefix_lines(comment, self.target.comment_prefix));
        }
        for child in block.value_children() {
            self.push_nested_comments(child, &mut out);
        }
        out
    }

    fn push_nested_comments(&self, block: &Block, out: &mut String) {
        if let Some(comment) = &block.comment {
            out.push_str(&util::prefix_lines(comment, self.target.comment_prefix));
        }
        for child in block.value_children() {
            self.push_nested_comments(child, out);
        }
    }

    /// Legalizes a top-level block with an output that isn't plugged into
    /// anything: a trailing semicolon turns it into an expression statement.
    fn scrub_naked_value(&self, code: &str) -> String {
        format!("{code};\n")
    }

    // --- names and helpers ---

    /// Stable identifier for a user variable.
    pub(crate) fn variable_name(&mut self, name: &str) -> EcoString {
        self.names.get_name(name, Namespace::Variable)
    }

    /// Stable identifier for a user procedure.
    pub(crate) fn procedure_name(&mut self, name: &str) -> EcoString {
        self.names.get_name(name, Namespace::Procedure)
    }

    /// Fresh generator-synthesized temporary, never emitted before.
    pub(crate) fn distinct_name(&mut self, seed: &str) -> EcoString {
        self.names.get_distinct_name(seed, Namespace::Variable)
    }

    /// Identifier of the runtime helper `key`, injecting its definition on
    /// first use. `build` receives the helper's identifier and returns the
    /// full definition source; it runs at most once per run.
    pub(crate) fn runtime_helper(
        &mut self,
        key: &str,
        build: impl FnOnce(&str) -> String,
    ) -> EcoString {
        self.helpers.ensure(key, &mut self.names, build)
    }

    /// Declares the workspace variable list as the first definitions entry,
    /// so every variable exists before any statement references it.
    fn declare_variables(&mut self, variables: &[EcoString]) {
        if variables.is_empty() {
            return;
        }
        let mut decls = String::new();
        for (i, var) in variables.iter().enumerate() {
            if i > 0 {
                decls.push('\n');
            }
            let name = self.variable_name(var);
            decls.push_str(&format!("dynamic {name};"));
        }
        self.helpers.define("variables", decls);
    }

    // --- assembly ---

    /// Final step of a run: helper definitions in first-use order, a blank
    /// gap, then the top-level code.
    fn finish(&self, code: &str) -> String {
        if self.helpers.is_empty() {
            return code.to_string();
        }
        format!("{}\n\n\n{code}", self.helpers.render())
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CodeGenError::MalformedTree {
                max_depth: MAX_DEPTH,
            });
        }
        Ok(())
    }
}
