// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Loading persisted block programs.
//!
//! The editor saves a program as JSON: a variable list plus a forest of
//! block nodes, each with a `kind` tag, field values, named input sockets,
//! an optional comment, and a `next` link. This module decodes that format
//! and converts it into the core crate's [`Block`] tree. Decoding is the
//! CLI's job — the generator itself never sees JSON.
//!
//! ```json
//! {
//!   "variables": ["score"],
//!   "blocks": [
//!     {
//!       "kind": "variables_set",
//!       "fields": { "var": "score" },
//!       "inputs": { "value": { "kind": "math_number", "fields": { "value": 42 } } }
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use blockgen_core::block::{
    AccessMode, Anchor, ArithOp, Block, BlockKind, CompareOp, FlowStatement, IfBranch,
    ListReduceOp, LogicOp, MathConstant, NumberProperty, Program, SearchEnd, Socket, TextCase,
    TrimMode, UnaryMathOp, WriteMode,
};
use ecow::EcoString;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors produced while decoding a program file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file is not valid JSON in the expected shape.
    #[error("invalid program file: {0}")]
    Json(#[from] serde_json::Error),

    /// A block carries a kind tag this build does not know.
    #[error("unknown block kind `{0}`")]
    UnknownKind(String),

    /// A block is missing a required field.
    #[error("block `{kind}` is missing required field `{field}`")]
    MissingField {
        /// The block kind.
        kind: String,
        /// The missing field name.
        field: String,
    },

    /// A field value is outside the kind's accepted set.
    #[error("block `{kind}` field `{field}` has unexpected value `{value}`")]
    InvalidField {
        /// The block kind.
        kind: String,
        /// The field name.
        field: String,
        /// The rejected value.
        value: String,
    },
}

/// A persisted program document.
#[derive(Debug, Deserialize)]
pub struct ProgramDoc {
    /// Workspace variables, in declaration order.
    #[serde(default)]
    pub variables: Vec<String>,
    /// Top-level chains.
    #[serde(default)]
    pub blocks: Vec<BlockDoc>,
}

/// One persisted block node.
#[derive(Debug, Deserialize)]
pub struct BlockDoc {
    /// Kind tag, e.g. `"math_arithmetic"`.
    pub kind: String,
    /// Editor-set field values.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    /// Named input sockets (value and statement inputs alike).
    #[serde(default)]
    pub inputs: BTreeMap<String, BlockDoc>,
    /// Variadic sockets (join items, list items, call arguments).
    #[serde(default)]
    pub items: Vec<BlockDoc>,
    /// `if`/`else if` arms of a `controls_if` block.
    #[serde(default)]
    pub branches: Vec<BranchDoc>,
    /// Comment attached in the editor.
    #[serde(default)]
    pub comment: Option<String>,
    /// The following statement block.
    #[serde(default)]
    pub next: Option<Box<BlockDoc>>,
}

/// One persisted `if` arm.
#[derive(Debug, Deserialize)]
pub struct BranchDoc {
    /// Condition socket.
    #[serde(default)]
    pub condition: Option<BlockDoc>,
    /// Statement body.
    #[serde(default)]
    pub body: Option<BlockDoc>,
}

/// Parses a program file from JSON text.
///
/// # Errors
///
/// Returns [`LoadError`] if the JSON is malformed, a block kind is unknown,
/// or a field value is out of range.
pub fn parse_str(source: &str) -> Result<Program, LoadError> {
    let doc: ProgramDoc = serde_json::from_str(source)?;
    let mut roots = Vec::with_capacity(doc.blocks.len());
    for block in &doc.blocks {
        roots.push(build_block(block)?);
    }
    Ok(Program {
        variables: doc.variables.iter().map(|v| v.as_str().into()).collect(),
        roots,
    })
}

fn build_block(doc: &BlockDoc) -> Result<Block, LoadError> {
    let mut block = Block::new(build_kind(doc)?);
    if let Some(comment) = &doc.comment {
        block.comment = Some(comment.as_str().into());
    }
    if let Some(next) = &doc.next {
        block.next = Some(Box::new(build_block(next)?));
    }
    Ok(block)
}

fn build_kind(doc: &BlockDoc) -> Result<BlockKind, LoadError> {
    let kind = match doc.kind.as_str() {
        // --- text ---
        "text" => BlockKind::Text {
            text: str_field(doc, "text")?,
        },
        "text_join" => BlockKind::TextJoin {
            items: items(doc)?,
        },
        "text_append" => BlockKind::TextAppend {
            var: str_field(doc, "var")?,
            text: input(doc, "text")?,
        },
        "text_length" => BlockKind::TextLength {
            value: input(doc, "value")?,
        },
        "text_is_empty" => BlockKind::TextIsEmpty {
            value: input(doc, "value")?,
        },
        "text_index_of" => BlockKind::TextIndexOf {
            end: search_end(doc, "end")?,
            find: input(doc, "find")?,
            value: input(doc, "value")?,
        },
        "text_char_at" => BlockKind::TextCharAt {
            anchor: anchor(doc, "where")?,
            at: input(doc, "at")?,
            value: input(doc, "value")?,
        },
        "text_get_substring" => BlockKind::TextGetSubstring {
            text: input(doc, "text")?,
            where1: anchor(doc, "where1")?,
            at1: input(doc, "at1")?,
            where2: anchor(doc, "where2")?,
            at2: input(doc, "at2")?,
        },
        "text_change_case" => BlockKind::TextChangeCase {
            case: match_field(doc, "case", &[
                ("UPPERCASE", TextCase::Upper),
                ("LOWERCASE", TextCase::Lower),
                ("TITLECASE", TextCase::Title),
            ])?,
            text: input(doc, "text")?,
        },
        "text_trim" => BlockKind::TextTrim {
            mode: match_field(doc, "mode", &[
                ("LEFT", TrimMode::Left),
                ("RIGHT", TrimMode::Right),
                ("BOTH", TrimMode::Both),
            ])?,
            text: input(doc, "text")?,
        },
        "text_print" => BlockKind::TextPrint {
            text: input(doc, "text")?,
        },
        "text_prompt" => BlockKind::TextPrompt {
            message: str_field(doc, "message")?,
            numeric: match_field(doc, "type", &[("TEXT", false), ("NUMBER", true)])?,
        },

        // --- variables ---
        "variables_get" => BlockKind::VariableGet {
            name: str_field(doc, "var")?,
        },
        "variables_set" => BlockKind::VariableSet {
            name: str_field(doc, "var")?,
            value: input(doc, "value")?,
        },

        // --- math ---
        "math_number" => BlockKind::MathNumber {
            value: f64_field(doc, "value")?,
        },
        "math_arithmetic" => BlockKind::MathArithmetic {
            op: match_field(doc, "op", &[
                ("ADD", ArithOp::Add),
                ("MINUS", ArithOp::Minus),
                ("MULTIPLY", ArithOp::Multiply),
                ("DIVIDE", ArithOp::Divide),
                ("POWER", ArithOp::Power),
            ])?,
            a: input(doc, "a")?,
            b: input(doc, "b")?,
        },
        "math_single" => BlockKind::MathSingle {
            op: match_field(doc, "op", &[
                ("NEG", UnaryMathOp::Neg),
                ("ABS", UnaryMathOp::Abs),
                ("ROOT", UnaryMathOp::Root),
                ("LN", UnaryMathOp::Ln),
                ("LOG10", UnaryMathOp::Log10),
                ("EXP", UnaryMathOp::Exp),
                ("POW10", UnaryMathOp::Pow10),
                ("ROUND", UnaryMathOp::Round),
                ("ROUNDUP", UnaryMathOp::RoundUp),
                ("ROUNDDOWN", UnaryMathOp::RoundDown),
                ("SIN", UnaryMathOp::Sin),
                ("COS", UnaryMathOp::Cos),
                ("TAN", UnaryMathOp::Tan),
                ("ASIN", UnaryMathOp::Asin),
                ("ACOS", UnaryMathOp::Acos),
                ("ATAN", UnaryMathOp::Atan),
            ])?,
            num: input(doc, "num")?,
        },
        "math_constant" => BlockKind::MathConstant {
            constant: match_field(doc, "constant", &[
                ("PI", MathConstant::Pi),
                ("E", MathConstant::E),
                ("GOLDEN_RATIO", MathConstant::GoldenRatio),
                ("SQRT2", MathConstant::Sqrt2),
                ("SQRT1_2", MathConstant::SqrtHalf),
                ("INFINITY", MathConstant::Infinity),
            ])?,
        },
        "math_number_property" => BlockKind::MathNumberProperty {
            property: match_field(doc, "property", &[
                ("EVEN", NumberProperty::Even),
                ("ODD", NumberProperty::Odd),
                ("PRIME", NumberProperty::Prime),
                ("WHOLE", NumberProperty::Whole),
                ("POSITIVE", NumberProperty::Positive),
                ("NEGATIVE", NumberProperty::Negative),
                ("DIVISIBLE_BY", NumberProperty::DivisibleBy),
            ])?,
            number: input(doc, "number")?,
            divisor: input(doc, "divisor")?,
        },
        "math_change" => BlockKind::MathChange {
            var: str_field(doc, "var")?,
            delta: input(doc, "delta")?,
        },
        "math_on_list" => BlockKind::MathOnList {
            op: match_field(doc, "op", &[
                ("SUM", ListReduceOp::Sum),
                ("MIN", ListReduceOp::Min),
                ("MAX", ListReduceOp::Max),
                ("AVERAGE", ListReduceOp::Average),
                ("MEDIAN", ListReduceOp::Median),
                ("MODE", ListReduceOp::Mode),
                ("STD_DEV", ListReduceOp::StdDev),
                ("RANDOM", ListReduceOp::Random),
            ])?,
            list: input(doc, "list")?,
        },
        "math_modulo" => BlockKind::MathModulo {
            dividend: input(doc, "dividend")?,
            divisor: input(doc, "divisor")?,
        },
        "math_constrain" => BlockKind::MathConstrain {
            value: input(doc, "value")?,
            low: input(doc, "low")?,
            high: input(doc, "high")?,
        },
        "math_random_int" => BlockKind::MathRandomInt {
            from: input(doc, "from")?,
            to: input(doc, "to")?,
        },
        "math_random_float" => BlockKind::MathRandomFloat,

        // --- logic ---
        "controls_if" => {
            let mut branches = Vec::with_capacity(doc.branches.len());
            for branch in &doc.branches {
                branches.push(IfBranch {
                    condition: optional(branch.condition.as_ref())?,
                    body: optional(branch.body.as_ref())?,
                });
            }
            BlockKind::ControlsIf {
                branches,
                else_body: input(doc, "else")?,
            }
        }
        "logic_compare" => BlockKind::LogicCompare {
            op: match_field(doc, "op", &[
                ("EQ", CompareOp::Eq),
                ("NEQ", CompareOp::Neq),
                ("LT", CompareOp::Lt),
                ("LTE", CompareOp::Lte),
                ("GT", CompareOp::Gt),
                ("GTE", CompareOp::Gte),
            ])?,
            a: input(doc, "a")?,
            b: input(doc, "b")?,
        },
        "logic_operation" => BlockKind::LogicOperation {
            op: match_field(doc, "op", &[("AND", LogicOp::And), ("OR", LogicOp::Or)])?,
            a: input(doc, "a")?,
            b: input(doc, "b")?,
        },
        "logic_negate" => BlockKind::LogicNegate {
            value: input(doc, "value")?,
        },
        "logic_boolean" => BlockKind::LogicBoolean {
            value: bool_field(doc, "value")?,
        },
        "logic_null" => BlockKind::LogicNull,
        "logic_ternary" => BlockKind::LogicTernary {
            condition: input(doc, "if")?,
            then: input(doc, "then")?,
            otherwise: input(doc, "else")?,
        },

        // --- control ---
        "controls_repeat" => BlockKind::ControlsRepeat {
            times: input(doc, "times")?,
            body: input(doc, "do")?,
        },
        "controls_while_until" => BlockKind::ControlsWhileUntil {
            until: match_field(doc, "mode", &[("WHILE", false), ("UNTIL", true)])?,
            condition: input(doc, "condition")?,
            body: input(doc, "do")?,
        },
        "controls_for" => BlockKind::ControlsFor {
            var: str_field(doc, "var")?,
            from: input(doc, "from")?,
            to: input(doc, "to")?,
            by: input(doc, "by")?,
            body: input(doc, "do")?,
        },
        "controls_for_each" => BlockKind::ControlsForEach {
            var: str_field(doc, "var")?,
            list: input(doc, "list")?,
            body: input(doc, "do")?,
        },
        "controls_flow" => BlockKind::ControlsFlow {
            flow: match_field(doc, "flow", &[
                ("BREAK", FlowStatement::Break),
                ("CONTINUE", FlowStatement::Continue),
            ])?,
        },

        // --- lists ---
        "lists_create_empty" => BlockKind::ListsCreateEmpty,
        "lists_create_with" => BlockKind::ListsCreateWith {
            items: items(doc)?,
        },
        "lists_repeat" => BlockKind::ListsRepeat {
            item: input(doc, "item")?,
            count: input(doc, "count")?,
        },
        "lists_length" => BlockKind::ListsLength {
            value: input(doc, "value")?,
        },
        "lists_is_empty" => BlockKind::ListsIsEmpty {
            value: input(doc, "value")?,
        },
        "lists_index_of" => BlockKind::ListsIndexOf {
            end: search_end(doc, "end")?,
            find: input(doc, "find")?,
            value: input(doc, "value")?,
        },
        "lists_get_index" => BlockKind::ListsGetIndex {
            mode: match_field(doc, "mode", &[
                ("GET", AccessMode::Get),
                ("GET_REMOVE", AccessMode::GetRemove),
                ("REMOVE", AccessMode::Remove),
            ])?,
            anchor: anchor(doc, "where")?,
            at: input(doc, "at")?,
            list: input(doc, "list")?,
        },
        "lists_set_index" => BlockKind::ListsSetIndex {
            mode: match_field(doc, "mode", &[
                ("SET", WriteMode::Set),
                ("INSERT", WriteMode::Insert),
            ])?,
            anchor: anchor(doc, "where")?,
            at: input(doc, "at")?,
            list: input(doc, "list")?,
            to: input(doc, "to")?,
        },
        "lists_get_sublist" => BlockKind::ListsGetSublist {
            list: input(doc, "list")?,
            where1: anchor(doc, "where1")?,
            at1: input(doc, "at1")?,
            where2: anchor(doc, "where2")?,
            at2: input(doc, "at2")?,
        },

        // --- colour ---
        "colour_picker" => BlockKind::ColourPicker {
            colour: str_field(doc, "colour")?,
        },
        "colour_random" => BlockKind::ColourRandom,
        "colour_rgb" => BlockKind::ColourRgb {
            red: input(doc, "red")?,
            green: input(doc, "green")?,
            blue: input(doc, "blue")?,
        },
        "colour_blend" => BlockKind::ColourBlend {
            colour1: input(doc, "colour1")?,
            colour2: input(doc, "colour2")?,
            ratio: input(doc, "ratio")?,
        },

        // --- procedures ---
        "procedures_def" => BlockKind::ProceduresDef {
            name: str_field(doc, "name")?,
            params: params(doc)?,
            body: input(doc, "body")?,
            ret: input(doc, "return")?,
        },
        "procedures_call_return" => BlockKind::ProceduresCallReturn {
            name: str_field(doc, "name")?,
            args: args(doc)?,
        },
        "procedures_call_no_return" => BlockKind::ProceduresCallNoReturn {
            name: str_field(doc, "name")?,
            args: args(doc)?,
        },
        "procedures_if_return" => BlockKind::ProceduresIfReturn {
            condition: input(doc, "condition")?,
            value: input(doc, "value")?,
            has_return: doc.inputs.contains_key("value"),
        },

        other => return Err(LoadError::UnknownKind(other.to_string())),
    };
    Ok(kind)
}

// --- decoding helpers ---

fn input(doc: &BlockDoc, name: &str) -> Result<Socket, LoadError> {
    match doc.inputs.get(name) {
        Some(child) => Ok(Some(Box::new(build_block(child)?))),
        None => Ok(None),
    }
}

fn optional(doc: Option<&BlockDoc>) -> Result<Socket, LoadError> {
    match doc {
        Some(child) => Ok(Some(Box::new(build_block(child)?))),
        None => Ok(None),
    }
}

fn items(doc: &BlockDoc) -> Result<Vec<Socket>, LoadError> {
    doc.items
        .iter()
        .map(|item| Ok(Some(Box::new(build_block(item)?))))
        .collect()
}

fn args(doc: &BlockDoc) -> Result<Vec<Socket>, LoadError> {
    items(doc)
}

fn field<'a>(doc: &'a BlockDoc, name: &str) -> Result<&'a Value, LoadError> {
    doc.fields.get(name).ok_or_else(|| LoadError::MissingField {
        kind: doc.kind.clone(),
        field: name.to_string(),
    })
}

fn str_field(doc: &BlockDoc, name: &str) -> Result<EcoString, LoadError> {
    let value = field(doc, name)?;
    value
        .as_str()
        .map(Into::into)
        .ok_or_else(|| invalid(doc, name, value))
}

fn f64_field(doc: &BlockDoc, name: &str) -> Result<f64, LoadError> {
    let value = field(doc, name)?;
    value.as_f64().ok_or_else(|| invalid(doc, name, value))
}

fn bool_field(doc: &BlockDoc, name: &str) -> Result<bool, LoadError> {
    let value = field(doc, name)?;
    value.as_bool().ok_or_else(|| invalid(doc, name, value))
}

fn params(doc: &BlockDoc) -> Result<Vec<EcoString>, LoadError> {
    let Some(value) = doc.fields.get("params") else {
        return Ok(Vec::new());
    };
    let list = value
        .as_array()
        .ok_or_else(|| invalid(doc, "params", value))?;
    list.iter()
        .map(|entry| {
            entry
                .as_str()
                .map(Into::into)
                .ok_or_else(|| invalid(doc, "params", entry))
        })
        .collect()
}

/// Decodes a closed keyword field through a keyword → value table.
fn match_field<T: Copy>(
    doc: &BlockDoc,
    name: &str,
    table: &[(&str, T)],
) -> Result<T, LoadError> {
    let value = field(doc, name)?;
    let keyword = value.as_str().ok_or_else(|| invalid(doc, name, value))?;
    table
        .iter()
        .find(|(candidate, _)| *candidate == keyword)
        .map(|(_, decoded)| *decoded)
        .ok_or_else(|| invalid(doc, name, value))
}

fn anchor(doc: &BlockDoc, name: &str) -> Result<Anchor, LoadError> {
    match_field(doc, name, &[
        ("FIRST", Anchor::First),
        ("LAST", Anchor::Last),
        ("FROM_START", Anchor::FromStart),
        ("FROM_END", Anchor::FromEnd),
        ("RANDOM", Anchor::Random),
    ])
}

fn search_end(doc: &BlockDoc, name: &str) -> Result<SearchEnd, LoadError> {
    match_field(doc, name, &[
        ("FIRST", SearchEnd::First),
        ("LAST", SearchEnd::Last),
    ])
}

fn invalid(doc: &BlockDoc, name: &str, value: &Value) -> LoadError {
    LoadError::InvalidField {
        kind: doc.kind.clone(),
        field: name.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockgen_core::codegen::generate;

    #[test]
    fn parses_and_generates_a_small_program() {
        let source = r#"{
            "variables": ["score"],
            "blocks": [
                {
                    "kind": "variables_set",
                    "fields": { "var": "score" },
                    "inputs": {
                        "value": {
                            "kind": "math_arithmetic",
                            "fields": { "op": "MULTIPLY" },
                            "inputs": {
                                "a": {
                                    "kind": "math_arithmetic",
                                    "fields": { "op": "ADD" },
                                    "inputs": {
                                        "a": { "kind": "math_number", "fields": { "value": 2 } },
                                        "b": { "kind": "math_number", "fields": { "value": 3 } }
                                    }
                                },
                                "b": { "kind": "math_number", "fields": { "value": 4 } }
                            }
                        }
                    },
                    "next": {
                        "kind": "text_print",
                        "inputs": {
                            "text": { "kind": "variables_get", "fields": { "var": "score" } }
                        }
                    }
                }
            ]
        }"#;
        let program = parse_str(source).unwrap();
        let code = generate(&program).unwrap();
        assert_eq!(
            code,
            "dynamic score;\n\n\nscore = (2 + 3) * 4;\nConsole.WriteLine(score);\n"
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let source = r#"{ "blocks": [ { "kind": "warp_drive" } ] }"#;
        let err = parse_str(source).unwrap_err();
        assert!(matches!(err, LoadError::UnknownKind(kind) if kind == "warp_drive"));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let source = r#"{ "blocks": [ { "kind": "variables_get" } ] }"#;
        let err = parse_str(source).unwrap_err();
        assert!(matches!(err, LoadError::MissingField { field, .. } if field == "var"));
    }

    #[test]
    fn out_of_range_keyword_is_rejected() {
        let source = r#"{
            "blocks": [
                { "kind": "math_arithmetic", "fields": { "op": "XOR" } }
            ]
        }"#;
        let err = parse_str(source).unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { value, .. } if value == "\"XOR\""));
    }

    #[test]
    fn empty_document_is_an_empty_program() {
        let program = parse_str("{}").unwrap();
        assert!(program.variables.is_empty());
        assert!(program.roots.is_empty());
    }
}
