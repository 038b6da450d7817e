// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Block tree definitions.
//!
//! A [`Block`] is one node of a visual program: an operation kind, zero or
//! more input sockets (each empty or holding a child block), block-specific
//! field values chosen in the editor, an optional attached comment, and an
//! optional `next` link chaining statement blocks into an ordered sequence.
//!
//! A block either *produces a value* (it can sit in a value socket) or is a
//! *statement* (it emits code as an effect in sequence) — never both. For the
//! index-access blocks the answer depends on the selected mode, but any one
//! configured block is exactly one of the two; see [`Block::produces_value`].
//!
//! Blocks are owned and mutated by the editor. The generator in
//! [`crate::codegen`] only ever reads them.

use ecow::EcoString;

/// An input socket: empty, or holding a connected child block.
pub type Socket = Option<Box<Block>>;

/// A complete block program handed over by the workspace.
///
/// `variables` is the workspace's declared variable list; the generator
/// emits a declaration preamble for it before any other output. `roots` are
/// the free-standing top-level chains, in workspace order. A root that
/// produces a value ("naked value") is legal and is emitted as an expression
/// statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    /// Variables declared in the workspace, in declaration order.
    pub variables: Vec<EcoString>,
    /// Top-level statement chains (or naked value blocks).
    pub roots: Vec<Block>,
}

/// A single block node.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The operation this block performs, with its sockets and fields.
    pub kind: BlockKind,
    /// Comment text attached to the block in the editor, if any.
    pub comment: Option<EcoString>,
    /// The following statement block in this chain.
    pub next: Option<Box<Block>>,
}

impl Block {
    /// Creates a block with no comment and no successor.
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            comment: None,
            next: None,
        }
    }

    /// Attaches a comment to this block.
    #[must_use]
    pub fn with_comment(mut self, text: impl Into<EcoString>) -> Self {
        self.comment = Some(text.into());
        self
    }

    /// Links `next` as the statement following this one.
    ///
    /// Returns `self` so chains can be built front to back.
    #[must_use]
    pub fn then(mut self, next: Block) -> Self {
        // Append at the end so `a.then(b).then(c)` reads in emission order.
        let mut tail = &mut self.next;
        while let Some(b) = tail {
            tail = &mut b.next;
        }
        *tail = Some(Box::new(next));
        self
    }

    /// Whether this block produces a value (as opposed to being a statement).
    #[must_use]
    pub fn produces_value(&self) -> bool {
        use BlockKind::*;
        match &self.kind {
            // Statement-only kinds.
            TextAppend { .. }
            | TextPrint { .. }
            | VariableSet { .. }
            | MathChange { .. }
            | ControlsIf { .. }
            | ControlsRepeat { .. }
            | ControlsWhileUntil { .. }
            | ControlsFor { .. }
            | ControlsForEach { .. }
            | ControlsFlow { .. }
            | ListsSetIndex { .. }
            | ProceduresDef { .. }
            | ProceduresCallNoReturn { .. }
            | ProceduresIfReturn { .. } => false,
            // Removal without retrieval is a statement; the other two access
            // modes produce the element.
            ListsGetIndex { mode, .. } => *mode != AccessMode::Remove,
            _ => true,
        }
    }

    /// Direct children sitting in *value* sockets, in socket order.
    ///
    /// Statement sockets (loop bodies, branch bodies) are not included; the
    /// sequencer visits those chains itself.
    #[must_use]
    pub fn value_children(&self) -> Vec<&Block> {
        use BlockKind::*;
        let mut out = Vec::new();
        match &self.kind {
            Text { .. }
            | TextPrompt { .. }
            | VariableGet { .. }
            | MathNumber { .. }
            | MathConstant { .. }
            | MathRandomFloat
            | LogicBoolean { .. }
            | LogicNull
            | ListsCreateEmpty
            | ColourPicker { .. }
            | ColourRandom
            | ControlsFlow { .. } => {}
            TextJoin { items } | ListsCreateWith { items } => {
                for item in items {
                    push(&mut out, item);
                }
            }
            TextAppend { text, .. }
            | TextLength { value: text }
            | TextIsEmpty { value: text }
            | TextChangeCase { text, .. }
            | TextTrim { text, .. }
            | TextPrint { text } => push(&mut out, text),
            TextIndexOf { find, value, .. } | ListsIndexOf { find, value, .. } => {
                push(&mut out, find);
                push(&mut out, value);
            }
            TextCharAt { at, value, .. } => {
                push(&mut out, at);
                push(&mut out, value);
            }
            TextGetSubstring { text, at1, at2, .. } => {
                push(&mut out, text);
                push(&mut out, at1);
                push(&mut out, at2);
            }
            VariableSet { value, .. } => push(&mut out, value),
            MathArithmetic { a, b, .. } | LogicCompare { a, b, .. } | LogicOperation { a, b, .. } => {
                push(&mut out, a);
                push(&mut out, b);
            }
            MathSingle { num, .. } => push(&mut out, num),
            MathNumberProperty {
                number, divisor, ..
            } => {
                push(&mut out, number);
                push(&mut out, divisor);
            }
            MathChange { delta, .. } => push(&mut out, delta),
            MathOnList { list, .. } => push(&mut out, list),
            MathModulo { dividend, divisor } => {
                push(&mut out, dividend);
                push(&mut out, divisor);
            }
            MathConstrain { value, low, high } => {
                push(&mut out, value);
                push(&mut out, low);
                push(&mut out, high);
            }
            MathRandomInt { from, to } => {
                push(&mut out, from);
                push(&mut out, to);
            }
            ControlsIf {
                branches,
                else_body: _,
            } => {
                for branch in branches {
                    push(&mut out, &branch.condition);
                }
            }
            LogicNegate { value } => push(&mut out, value),
            LogicTernary {
                condition,
                then,
                otherwise,
            } => {
                push(&mut out, condition);
                push(&mut out, then);
                push(&mut out, otherwise);
            }
            ControlsRepeat { times, .. } => push(&mut out, times),
            ControlsWhileUntil { condition, .. } => push(&mut out, condition),
            ControlsFor { from, to, by, .. } => {
                push(&mut out, from);
                push(&mut out, to);
                push(&mut out, by);
            }
            ControlsForEach { list, .. } => push(&mut out, list),
            ListsRepeat { item, count } => {
                push(&mut out, item);
                push(&mut out, count);
            }
            ListsLength { value } | ListsIsEmpty { value } => push(&mut out, value),
            ListsGetIndex { at, list, .. } => {
                push(&mut out, at);
                push(&mut out, list);
            }
            ListsSetIndex { at, list, to, .. } => {
                push(&mut out, at);
                push(&mut out, list);
                push(&mut out, to);
            }
            ListsGetSublist { list, at1, at2, .. } => {
                push(&mut out, list);
                push(&mut out, at1);
                push(&mut out, at2);
            }
            ColourRgb { red, green, blue } => {
                push(&mut out, red);
                push(&mut out, green);
                push(&mut out, blue);
            }
            ColourBlend {
                colour1,
                colour2,
                ratio,
            } => {
                push(&mut out, colour1);
                push(&mut out, colour2);
                push(&mut out, ratio);
            }
            ProceduresDef { ret, .. } => push(&mut out, ret),
            ProceduresCallReturn { args, .. } | ProceduresCallNoReturn { args, .. } => {
                for arg in args {
                    push(&mut out, arg);
                }
            }
            ProceduresIfReturn {
                condition, value, ..
            } => {
                push(&mut out, condition);
                push(&mut out, value);
            }
        }
        out
    }
}

fn push<'a>(out: &mut Vec<&'a Block>, socket: &'a Socket) {
    if let Some(block) = socket {
        out.push(block);
    }
}

/// One `if`/`else if` arm of a [`BlockKind::ControlsIf`] block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IfBranch {
    /// The arm's condition socket.
    pub condition: Socket,
    /// The arm's statement body.
    pub body: Socket,
}

/// The closed set of block operation kinds.
///
/// Each variant carries the sockets and editor-set field values the block
/// exposes. Value sockets hold value-producing children; statement sockets
/// (named `body`, `else_body`) hold the head of a nested statement chain.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    // --- text ---
    /// A string literal.
    Text { text: EcoString },
    /// Concatenation of any number of items.
    TextJoin { items: Vec<Socket> },
    /// Append text to a variable in place.
    TextAppend { var: EcoString, text: Socket },
    /// String length.
    TextLength { value: Socket },
    /// Whether the string is empty.
    TextIsEmpty { value: Socket },
    /// Find the first/last occurrence of a substring (one-based result).
    TextIndexOf {
        end: SearchEnd,
        find: Socket,
        value: Socket,
    },
    /// Extract a single character.
    TextCharAt {
        anchor: Anchor,
        at: Socket,
        value: Socket,
    },
    /// Extract a substring between two anchored positions.
    TextGetSubstring {
        text: Socket,
        where1: Anchor,
        at1: Socket,
        where2: Anchor,
        at2: Socket,
    },
    /// Upper/lower/title case conversion.
    TextChangeCase { case: TextCase, text: Socket },
    /// Trim whitespace from one or both ends.
    TextTrim { mode: TrimMode, text: Socket },
    /// Print to the console.
    TextPrint { text: Socket },
    /// Prompt the user for a string or a number.
    TextPrompt { message: EcoString, numeric: bool },

    // --- variables ---
    /// Variable reference.
    VariableGet { name: EcoString },
    /// Variable assignment.
    VariableSet { name: EcoString, value: Socket },

    // --- math ---
    /// A numeric literal.
    MathNumber { value: f64 },
    /// Binary arithmetic, including power.
    MathArithmetic { op: ArithOp, a: Socket, b: Socket },
    /// Single-operand math functions, including negation.
    MathSingle { op: UnaryMathOp, num: Socket },
    /// Well-known constants.
    MathConstant { constant: MathConstant },
    /// Number classification checks (even, prime, divisible-by, ...).
    MathNumberProperty {
        property: NumberProperty,
        number: Socket,
        divisor: Socket,
    },
    /// Add a delta to a variable in place.
    MathChange { var: EcoString, delta: Socket },
    /// Aggregate over a list (sum, median, random item, ...).
    MathOnList { op: ListReduceOp, list: Socket },
    /// Remainder.
    MathModulo { dividend: Socket, divisor: Socket },
    /// Clamp a value between two limits.
    MathConstrain {
        value: Socket,
        low: Socket,
        high: Socket,
    },
    /// Random integer in an inclusive range.
    MathRandomInt { from: Socket, to: Socket },
    /// Random fraction in [0, 1).
    MathRandomFloat,

    // --- logic ---
    /// `if` / `else if` / `else`.
    ControlsIf {
        branches: Vec<IfBranch>,
        else_body: Socket,
    },
    /// Comparison.
    LogicCompare { op: CompareOp, a: Socket, b: Socket },
    /// Logical conjunction/disjunction.
    LogicOperation { op: LogicOp, a: Socket, b: Socket },
    /// Logical negation.
    LogicNegate { value: Socket },
    /// Boolean literal.
    LogicBoolean { value: bool },
    /// The null literal.
    LogicNull,
    /// Ternary conditional.
    LogicTernary {
        condition: Socket,
        then: Socket,
        otherwise: Socket,
    },

    // --- control ---
    /// Repeat the body a number of times.
    ControlsRepeat { times: Socket, body: Socket },
    /// Loop while (or until) a condition holds.
    ControlsWhileUntil {
        until: bool,
        condition: Socket,
        body: Socket,
    },
    /// Counted loop over a variable.
    ControlsFor {
        var: EcoString,
        from: Socket,
        to: Socket,
        by: Socket,
        body: Socket,
    },
    /// Iterate over the elements of a list.
    ControlsForEach {
        var: EcoString,
        list: Socket,
        body: Socket,
    },
    /// `break` / `continue`.
    ControlsFlow { flow: FlowStatement },

    // --- lists ---
    /// A fresh empty list.
    ListsCreateEmpty,
    /// A list built from any number of items.
    ListsCreateWith { items: Vec<Socket> },
    /// A list with one element repeated.
    ListsRepeat { item: Socket, count: Socket },
    /// List length.
    ListsLength { value: Socket },
    /// Whether the list is empty.
    ListsIsEmpty { value: Socket },
    /// Find an item in the list (one-based result).
    ListsIndexOf {
        end: SearchEnd,
        find: Socket,
        value: Socket,
    },
    /// Read (and optionally remove) an element at an anchored position.
    ListsGetIndex {
        mode: AccessMode,
        anchor: Anchor,
        at: Socket,
        list: Socket,
    },
    /// Write or insert an element at an anchored position.
    ListsSetIndex {
        mode: WriteMode,
        anchor: Anchor,
        at: Socket,
        list: Socket,
        to: Socket,
    },
    /// Copy a sub-range between two anchored positions.
    ListsGetSublist {
        list: Socket,
        where1: Anchor,
        at1: Socket,
        where2: Anchor,
        at2: Socket,
    },

    // --- colour ---
    /// A colour chosen in the editor, as an HTML colour string.
    ColourPicker { colour: EcoString },
    /// A random colour.
    ColourRandom,
    /// A colour from RGB percentages.
    ColourRgb {
        red: Socket,
        green: Socket,
        blue: Socket,
    },
    /// A blend of two colours by ratio.
    ColourBlend {
        colour1: Socket,
        colour2: Socket,
        ratio: Socket,
    },

    // --- procedures ---
    /// A procedure definition; its emission is captured into the helper
    /// definitions rather than inlined into the surrounding chain.
    ProceduresDef {
        name: EcoString,
        params: Vec<EcoString>,
        body: Socket,
        ret: Socket,
    },
    /// Call a procedure that returns a value.
    ProceduresCallReturn { name: EcoString, args: Vec<Socket> },
    /// Call a procedure with no return value.
    ProceduresCallNoReturn { name: EcoString, args: Vec<Socket> },
    /// Conditionally return from inside a procedure.
    ProceduresIfReturn {
        condition: Socket,
        value: Socket,
        has_return: bool,
    },
}

impl BlockKind {
    /// A stable display name for this kind, used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        use BlockKind::*;
        match self {
            Text { .. } => "text",
            TextJoin { .. } => "text_join",
            TextAppend { .. } => "text_append",
            TextLength { .. } => "text_length",
            TextIsEmpty { .. } => "text_is_empty",
            TextIndexOf { .. } => "text_index_of",
            TextCharAt { .. } => "text_char_at",
            TextGetSubstring { .. } => "text_get_substring",
            TextChangeCase { .. } => "text_change_case",
            TextTrim { .. } => "text_trim",
            TextPrint { .. } => "text_print",
            TextPrompt { .. } => "text_prompt",
            VariableGet { .. } => "variables_get",
            VariableSet { .. } => "variables_set",
            MathNumber { .. } => "math_number",
            MathArithmetic { .. } => "math_arithmetic",
            MathSingle { .. } => "math_single",
            MathConstant { .. } => "math_constant",
            MathNumberProperty { .. } => "math_number_property",
            MathChange { .. } => "math_change",
            MathOnList { .. } => "math_on_list",
            MathModulo { .. } => "math_modulo",
            MathConstrain { .. } => "math_constrain",
            MathRandomInt { .. } => "math_random_int",
            MathRandomFloat => "math_random_float",
            ControlsIf { .. } => "controls_if",
            LogicCompare { .. } => "logic_compare",
            LogicOperation { .. } => "logic_operation",
            LogicNegate { .. } => "logic_negate",
            LogicBoolean { .. } => "logic_boolean",
            LogicNull => "logic_null",
            LogicTernary { .. } => "logic_ternary",
            ControlsRepeat { .. } => "controls_repeat",
            ControlsWhileUntil { .. } => "controls_while_until",
            ControlsFor { .. } => "controls_for",
            ControlsForEach { .. } => "controls_for_each",
            ControlsFlow { .. } => "controls_flow",
            ListsCreateEmpty => "lists_create_empty",
            ListsCreateWith { .. } => "lists_create_with",
            ListsRepeat { .. } => "lists_repeat",
            ListsLength { .. } => "lists_length",
            ListsIsEmpty { .. } => "lists_is_empty",
            ListsIndexOf { .. } => "lists_index_of",
            ListsGetIndex { .. } => "lists_get_index",
            ListsSetIndex { .. } => "lists_set_index",
            ListsGetSublist { .. } => "lists_get_sublist",
            ColourPicker { .. } => "colour_picker",
            ColourRandom => "colour_random",
            ColourRgb { .. } => "colour_rgb",
            ColourBlend { .. } => "colour_blend",
            ProceduresDef { .. } => "procedures_def",
            ProceduresCallReturn { .. } => "procedures_call_return",
            ProceduresCallNoReturn { .. } => "procedures_call_no_return",
            ProceduresIfReturn { .. } => "procedures_if_return",
        }
    }
}

/// Search from the first or the last occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEnd {
    First,
    Last,
}

/// Reference point for one-based index fields.
///
/// `FromStart` and `FromEnd` pair with an `at` socket holding the one-based
/// offset; the others stand alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    First,
    Last,
    FromStart,
    FromEnd,
    Random,
}

impl Anchor {
    /// The wire keyword for this anchor, used when a runtime helper resolves
    /// the position dynamically.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Anchor::First => "FIRST",
            Anchor::Last => "LAST",
            Anchor::FromStart => "FROM_START",
            Anchor::FromEnd => "FROM_END",
            Anchor::Random => "RANDOM",
        }
    }
}

/// Case conversion selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextCase {
    Upper,
    Lower,
    Title,
}

/// Trim selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimMode {
    Left,
    Right,
    Both,
}

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Minus,
    Multiply,
    Divide,
    Power,
}

/// Single-operand math operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryMathOp {
    Neg,
    Abs,
    Root,
    Ln,
    Log10,
    Exp,
    Pow10,
    Round,
    RoundUp,
    RoundDown,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

/// Well-known mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathConstant {
    Pi,
    E,
    GoldenRatio,
    Sqrt2,
    SqrtHalf,
    Infinity,
}

/// Number classification selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberProperty {
    Even,
    Odd,
    Prime,
    Whole,
    Positive,
    Negative,
    DivisibleBy,
}

/// List aggregate selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListReduceOp {
    Sum,
    Min,
    Max,
    Average,
    Median,
    Mode,
    StdDev,
    Random,
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// Logical connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    And,
    Or,
}

/// Loop flow statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStatement {
    Break,
    Continue,
}

/// Element access mode for [`BlockKind::ListsGetIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Read the element.
    Get,
    /// Read the element and remove it from the list.
    GetRemove,
    /// Remove the element without producing a value.
    Remove,
}

/// Element write mode for [`BlockKind::ListsSetIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// Overwrite the element in place.
    Set,
    /// Insert a new element, shifting the rest.
    Insert,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sock(block: Block) -> Socket {
        Some(Box::new(block))
    }

    #[test]
    fn statements_do_not_produce_values() {
        let print = Block::new(BlockKind::TextPrint { text: None });
        assert!(!print.produces_value());

        let number = Block::new(BlockKind::MathNumber { value: 1.0 });
        assert!(number.produces_value());
    }

    #[test]
    fn get_index_value_depends_on_mode() {
        let get = Block::new(BlockKind::ListsGetIndex {
            mode: AccessMode::Get,
            anchor: Anchor::First,
            at: None,
            list: None,
        });
        assert!(get.produces_value());

        let remove = Block::new(BlockKind::ListsGetIndex {
            mode: AccessMode::Remove,
            anchor: Anchor::First,
            at: None,
            list: None,
        });
        assert!(!remove.produces_value());
    }

    #[test]
    fn then_appends_at_chain_tail() {
        let chain = Block::new(BlockKind::TextPrint { text: None })
            .then(Block::new(BlockKind::ControlsFlow {
                flow: FlowStatement::Break,
            }))
            .then(Block::new(BlockKind::ControlsFlow {
                flow: FlowStatement::Continue,
            }));

        let second = chain.next.as_ref().unwrap();
        let third = second.next.as_ref().unwrap();
        assert_eq!(second.kind.name(), "controls_flow");
        assert!(third.next.is_none());
    }

    #[test]
    fn value_children_skip_statement_sockets() {
        let repeat = Block::new(BlockKind::ControlsRepeat {
            times: sock(Block::new(BlockKind::MathNumber { value: 3.0 })),
            body: sock(Block::new(BlockKind::TextPrint { text: None })),
        });
        let children = repeat.value_children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind.name(), "math_number");
    }

    #[test]
    fn value_children_include_every_value_socket() {
        let constrain = Block::new(BlockKind::MathConstrain {
            value: sock(Block::new(BlockKind::MathNumber { value: 5.0 })),
            low: None,
            high: sock(Block::new(BlockKind::MathNumber { value: 9.0 })),
        });
        assert_eq!(constrain.value_children().len(), 2);
    }
}
