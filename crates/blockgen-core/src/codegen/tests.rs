// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Tests for C# code generation.

use super::precedence::Order;
use super::*;
use crate::block::*;

fn sock(block: Block) -> Socket {
    Some(Box::new(block))
}

fn num(value: f64) -> Block {
    Block::new(BlockKind::MathNumber { value })
}

fn text(s: &str) -> Block {
    Block::new(BlockKind::Text { text: s.into() })
}

fn var_get(name: &str) -> Block {
    Block::new(BlockKind::VariableGet { name: name.into() })
}

fn var_set(name: &str, value: Block) -> Block {
    Block::new(BlockKind::VariableSet {
        name: name.into(),
        value: sock(value),
    })
}

fn arith(op: ArithOp, a: Block, b: Block) -> Block {
    Block::new(BlockKind::MathArithmetic {
        op,
        a: sock(a),
        b: sock(b),
    })
}

fn print(value: Option<Block>) -> Block {
    Block::new(BlockKind::TextPrint {
        text: value.map(Box::new),
    })
}

fn program(roots: Vec<Block>) -> Program {
    Program {
        variables: vec![],
        roots,
    }
}

// --- precedence-directed parenthesization ---

#[test]
fn addition_under_multiplication_is_wrapped() {
    let tree = arith(
        ArithOp::Multiply,
        arith(ArithOp::Add, num(2.0), num(3.0)),
        num(4.0),
    );
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(code, "(2 + 3) * 4;\n");
}

#[test]
fn multiplication_under_addition_is_bare() {
    let tree = arith(
        ArithOp::Add,
        arith(ArithOp::Multiply, num(2.0), num(3.0)),
        num(4.0),
    );
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(code, "2 * 3 + 4;\n");
}

#[test]
fn value_to_code_wraps_iff_child_is_looser() {
    let mut generator = CSharpGenerator::new(target::CSHARP);
    let add = sock(arith(ArithOp::Add, num(2.0), num(3.0)));

    let wrapped = generator
        .value_to_code(&add, Order::Multiplication)
        .unwrap()
        .unwrap();
    assert_eq!(wrapped, "(2 + 3)");

    let equal = generator.value_to_code(&add, Order::Addition).unwrap().unwrap();
    assert_eq!(equal, "2 + 3");

    let unconstrained = generator.value_to_code(&add, Order::None).unwrap().unwrap();
    assert_eq!(unconstrained, "2 + 3");
}

#[test]
fn empty_sockets_fall_back_to_neutral_defaults() {
    let tree = Block::new(BlockKind::MathArithmetic {
        op: ArithOp::Multiply,
        a: None,
        b: None,
    });
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(code, "0.0 * 0.0;\n");
}

#[test]
fn negating_a_negative_inserts_a_space() {
    let tree = Block::new(BlockKind::MathSingle {
        op: UnaryMathOp::Neg,
        num: sock(num(-3.0)),
    });
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(code, "- -3;\n");
}

#[test]
fn chained_negation_never_lexes_as_decrement() {
    let inner = Block::new(BlockKind::MathSingle {
        op: UnaryMathOp::Neg,
        num: sock(num(3.0)),
    });
    let outer = Block::new(BlockKind::MathSingle {
        op: UnaryMathOp::Neg,
        num: sock(inner),
    });
    let code = generate(&program(vec![outer])).unwrap();
    assert!(!code.contains("--"), "generated decrement token: {code}");
    assert_eq!(code, "- -3;\n");
}

#[test]
fn power_has_no_operator_and_compiles_to_a_call() {
    let tree = arith(ArithOp::Power, num(2.0), num(8.0));
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(code, "Math.Pow(2, 8);\n");
}

// --- helper injection ---

#[test]
fn shared_helper_is_defined_once_for_many_call_sites() {
    let random_item = |list: &str| {
        Block::new(BlockKind::MathOnList {
            op: ListReduceOp::Random,
            list: sock(var_get(list)),
        })
    };
    let roots = vec![
        var_set("a", random_item("items")),
        var_set("b", random_item("items")),
    ];
    let code = generate(&program(roots)).unwrap();

    assert_eq!(
        code.matches("var math_random_item = new Func").count(),
        1,
        "helper must be defined exactly once: {code}"
    );
    assert_eq!(
        code.matches("math_random_item(items)").count(),
        2,
        "both call sites must reference the same identifier: {code}"
    );
}

#[test]
fn prompt_helper_is_not_rebuilt_per_block() {
    let prompt = |msg: &str| {
        Block::new(BlockKind::TextPrompt {
            message: msg.into(),
            numeric: false,
        })
    };
    let roots = vec![var_set("a", prompt("first?")), var_set("b", prompt("second?"))];
    let code = generate(&program(roots)).unwrap();
    assert_eq!(code.matches("var text_prompt_input = new Func").count(), 1);
    assert!(code.contains("text_prompt_input(\"first?\", false)"));
    assert!(code.contains("text_prompt_input(\"second?\", false)"));
}

#[test]
fn helper_definitions_keep_first_use_order() {
    let median = Block::new(BlockKind::MathOnList {
        op: ListReduceOp::Median,
        list: sock(var_get("items")),
    });
    let random = Block::new(BlockKind::MathOnList {
        op: ListReduceOp::Random,
        list: sock(var_get("items")),
    });
    let code = generate(&program(vec![var_set("m", median), var_set("r", random)])).unwrap();
    let median_pos = code.find("var math_median").unwrap();
    let random_pos = code.find("var math_random_item").unwrap();
    assert!(median_pos < random_pos);
}

#[test]
fn assembler_separates_definitions_from_body() {
    let tree = var_set(
        "m",
        Block::new(BlockKind::MathOnList {
            op: ListReduceOp::Median,
            list: None,
        }),
    );
    let code = generate(&program(vec![tree])).unwrap();
    let (definitions, body) = code.split_once("\n\n\n").unwrap();
    assert!(definitions.starts_with("var math_median = new Func"));
    assert_eq!(body, "m = math_median(new List<dynamic>());\n");
}

// --- names ---

#[test]
fn reserved_word_variables_are_disambiguated_consistently() {
    let program = Program {
        variables: vec!["class".into()],
        roots: vec![var_set(
            "class",
            arith(ArithOp::Add, var_get("class"), num(1.0)),
        )],
    };
    let code = generate(&program).unwrap();
    assert_eq!(code, "dynamic class2;\n\n\nclass2 = class2 + 1;\n");
}

#[test]
fn variable_preamble_precedes_every_other_definition() {
    let program = Program {
        variables: vec!["x".into(), "y".into()],
        roots: vec![var_set(
            "x",
            Block::new(BlockKind::MathOnList {
                op: ListReduceOp::Median,
                list: None,
            }),
        )],
    };
    let code = generate(&program).unwrap();
    assert!(
        code.starts_with("dynamic x;\ndynamic y;\n\nvar math_median"),
        "preamble must come first: {code}"
    );
}

#[test]
fn synthesized_loop_counters_avoid_user_variables() {
    // A user variable literally named `count` must not be captured by the
    // repeat template's synthesized counter.
    let repeat = Block::new(BlockKind::ControlsRepeat {
        times: sock(num(3.0)),
        body: sock(var_set("count", num(0.0))),
    });
    let code = generate(&program(vec![var_set("count", num(0.0)), repeat])).unwrap();
    assert!(code.contains("for (var count2 = 0; count2 < 3; count2++)"));
    assert!(code.contains("  count = 0;\n"));
}

// --- statement sequencing and comments ---

#[test]
fn chain_emits_comments_then_code_in_link_order() {
    let chain = print(Some(text("a")))
        .with_comment("first")
        .then(var_set("x", num(1.0)).with_comment("second"))
        .then(print(None).with_comment("third"));
    let code = generate(&program(vec![chain])).unwrap();
    assert_eq!(
        code,
        "// first\nConsole.WriteLine(\"a\");\n\
         // second\nx = 1;\n\
         // third\nConsole.WriteLine(\"\");\n"
    );
}

#[test]
fn value_child_comments_are_hoisted_above_the_statement() {
    let commented = text("hi").with_comment("the greeting");
    let code = generate(&program(vec![print(Some(commented))])).unwrap();
    assert_eq!(code, "// the greeting\nConsole.WriteLine(\"hi\");\n");
}

#[test]
fn nested_statement_comments_stay_with_their_own_chain() {
    let body = print(None).with_comment("inner");
    let when = Block::new(BlockKind::ControlsWhileUntil {
        until: false,
        condition: sock(Block::new(BlockKind::LogicBoolean { value: true })),
        body: sock(body),
    });
    let code = generate(&program(vec![when])).unwrap();
    assert_eq!(
        code,
        "while (true) {\n  // inner\n  Console.WriteLine(\"\");\n}\n"
    );
}

#[test]
fn multiline_comments_prefix_every_line() {
    let chain = print(None).with_comment("line one\nline two");
    let code = generate(&program(vec![chain])).unwrap();
    assert!(code.starts_with("// line one\n// line two\n"));
}

#[test]
fn naked_value_roots_become_expression_statements() {
    let code = generate(&program(vec![num(42.0)])).unwrap();
    assert_eq!(code, "42;\n");
}

#[test]
fn empty_program_generates_empty_output() {
    let code = generate(&program(vec![])).unwrap();
    assert_eq!(code, "");
}

// --- control flow shapes ---

#[test]
fn if_elseif_else_shape() {
    let branches = vec![
        IfBranch {
            condition: sock(Block::new(BlockKind::LogicBoolean { value: true })),
            body: sock(print(Some(text("a")))),
        },
        IfBranch {
            condition: sock(Block::new(BlockKind::LogicBoolean { value: false })),
            body: sock(print(Some(text("b")))),
        },
    ];
    let tree = Block::new(BlockKind::ControlsIf {
        branches,
        else_body: sock(print(Some(text("c")))),
    });
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(
        code,
        "if (true) {\n  Console.WriteLine(\"a\");\n} else if (false) {\n  Console.WriteLine(\"b\");\n} else {\n  Console.WriteLine(\"c\");\n}\n"
    );
}

#[test]
fn for_loop_with_numeric_bounds_uses_the_fast_path() {
    let tree = Block::new(BlockKind::ControlsFor {
        var: "i".into(),
        from: sock(num(1.0)),
        to: sock(num(10.0)),
        by: sock(num(1.0)),
        body: sock(print(Some(var_get("i")))),
    });
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(
        code,
        "for (i = 1; i <= 10; i++) {\n  Console.WriteLine(i);\n}\n"
    );
}

#[test]
fn descending_numeric_for_loop_counts_down() {
    let tree = Block::new(BlockKind::ControlsFor {
        var: "i".into(),
        from: sock(num(10.0)),
        to: sock(num(1.0)),
        by: sock(num(1.0)),
        body: None,
    });
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(code, "for (i = 10; i >= 1; i--) {\n}\n");
}

#[test]
fn for_loop_with_computed_bounds_caches_them() {
    let tree = Block::new(BlockKind::ControlsFor {
        var: "i".into(),
        from: sock(arith(ArithOp::Add, var_get("a"), num(1.0))),
        to: sock(arith(ArithOp::Add, var_get("b"), num(1.0))),
        by: sock(var_get("step")),
        body: None,
    });
    let code = generate(&program(vec![tree])).unwrap();
    assert!(code.contains("var i_start = a + 1;\n"));
    assert!(code.contains("var i_end = b + 1;\n"));
    assert!(code.contains("var i_inc = Math.Abs(step);\n"));
    assert!(code.contains("if (i_start > i_end) {\n  i_inc = -i_inc;\n}\n"));
    assert!(code.contains("i_inc >= 0 ? i <= i_end : i >= i_end"));
}

#[test]
fn repeat_caches_a_computed_count() {
    let tree = Block::new(BlockKind::ControlsRepeat {
        times: sock(arith(ArithOp::Add, var_get("n"), num(1.0))),
        body: None,
    });
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(
        code,
        "var repeat_end = n + 1;\nfor (var count = 0; count < repeat_end; count++) {\n}\n"
    );
}

#[test]
fn for_each_caches_a_computed_list() {
    let computed = Block::new(BlockKind::ListsCreateWith {
        items: vec![sock(num(1.0)), sock(num(2.0))],
    });
    let tree = Block::new(BlockKind::ControlsForEach {
        var: "item".into(),
        list: sock(computed),
        body: None,
    });
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(
        code,
        "var item_list = new List<dynamic> {1, 2};\nforeach (var item in item_list) {\n}\n"
    );
}

#[test]
fn for_each_over_a_variable_iterates_directly() {
    let tree = Block::new(BlockKind::ControlsForEach {
        var: "item".into(),
        list: sock(var_get("items")),
        body: None,
    });
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(code, "foreach (var item in items) {\n}\n");
}

// --- text ---

#[test]
fn text_join_shapes() {
    let join = |items: Vec<Socket>| Block::new(BlockKind::TextJoin { items });

    let empty = generate(&program(vec![join(vec![])])).unwrap();
    assert_eq!(empty, "\"\";\n");

    let single = generate(&program(vec![join(vec![sock(text("a"))])])).unwrap();
    assert_eq!(single, "\"a\".ToString();\n");

    let many = generate(&program(vec![join(vec![
        sock(text("a")),
        sock(text("b")),
        sock(text("c")),
    ])]))
    .unwrap();
    assert_eq!(many, "String.Concat(\"a\", \"b\", \"c\");\n");
}

#[test]
fn char_at_folds_numeric_positions() {
    let tree = Block::new(BlockKind::TextCharAt {
        anchor: Anchor::FromStart,
        at: sock(num(3.0)),
        value: sock(var_get("word")),
    });
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(code, "word[2];\n");
}

#[test]
fn substring_of_first_to_last_is_the_text_itself() {
    let tree = Block::new(BlockKind::TextGetSubstring {
        text: sock(var_get("word")),
        where1: Anchor::First,
        at1: None,
        where2: Anchor::Last,
        at2: None,
    });
    let code = generate(&program(vec![tree])).unwrap();
    assert_eq!(code, "word;\n");
}

#[test]
fn text_literals_are_quoted_and_escaped() {
    let code = generate(&program(vec![print(Some(text("say \"hi\"\n")))])).unwrap();
    assert_eq!(code, "Console.WriteLine(\"say \\\"hi\\\"\\n\");\n");
}

// --- procedures ---

#[test]
fn procedure_definitions_are_captured_not_inlined() {
    let def = Block::new(BlockKind::ProceduresDef {
        name: "double".into(),
        params: vec!["n".into()],
        body: None,
        ret: sock(arith(ArithOp::Multiply, var_get("n"), num(2.0))),
    });
    let call = var_set(
        "y",
        Block::new(BlockKind::ProceduresCallReturn {
            name: "double".into(),
            args: vec![sock(num(10.0))],
        }),
    );
    let code = generate(&program(vec![def, call])).unwrap();
    // `double` is reserved, so the procedure gets a disambiguated name,
    // shared between the definition and the call site.
    assert_eq!(
        code,
        "var double2 = new Func<dynamic, dynamic>((n) => {\n  return n * 2;\n});\n\n\ny = double2(10);\n"
    );
}

#[test]
fn statements_linked_after_a_definition_are_captured_with_it() {
    let def = Block::new(BlockKind::ProceduresDef {
        name: "noop".into(),
        params: vec![],
        body: None,
        ret: None,
    })
    .then(print(Some(text("tail"))));
    let code = generate(&program(vec![def, var_set("x", num(1.0))])).unwrap();
    let (definitions, body) = code.split_once("\n\n\n").unwrap();
    assert!(definitions.contains("var noop = new Action(() => {"));
    assert!(definitions.contains("Console.WriteLine(\"tail\");"));
    assert_eq!(body, "x = 1;\n");
}

#[test]
fn void_procedure_with_parameters_uses_a_typed_action() {
    let def = Block::new(BlockKind::ProceduresDef {
        name: "log".into(),
        params: vec!["msg".into(), "level".into()],
        body: sock(print(Some(var_get("msg")))),
        ret: None,
    });
    let code = generate(&program(vec![def])).unwrap();
    assert!(code.contains("var log = new Action<dynamic, dynamic>((msg, level) => {"));
}

#[test]
fn if_return_emits_both_forms() {
    let with_value = Block::new(BlockKind::ProceduresIfReturn {
        condition: sock(Block::new(BlockKind::LogicBoolean { value: true })),
        value: sock(num(0.0)),
        has_return: true,
    });
    let without = Block::new(BlockKind::ProceduresIfReturn {
        condition: None,
        value: None,
        has_return: false,
    });
    let code = generate(&program(vec![with_value, without])).unwrap();
    assert_eq!(
        code,
        "if (true) {\n  return 0;\n}\nif (false) {\n  return;\n}\n"
    );
}

// --- error handling ---

#[test]
fn statement_block_in_a_value_socket_is_an_error() {
    let tree = Block::new(BlockKind::MathArithmetic {
        op: ArithOp::Add,
        a: sock(print(None)),
        b: sock(num(1.0)),
    });
    let err = generate(&program(vec![tree])).unwrap_err();
    match err {
        CodeGenError::UnsupportedOperation { kind, .. } => assert_eq!(kind, "text_print"),
        other => panic!("expected UnsupportedOperation, got {other:?}"),
    }
}

#[test]
fn value_block_linked_as_a_statement_is_an_error() {
    let chain = print(None).then(num(42.0));
    let err = generate(&program(vec![chain])).unwrap_err();
    assert!(matches!(err, CodeGenError::UnsupportedOperation { .. }));
}

#[test]
fn runaway_nesting_fails_instead_of_overflowing() {
    let mut block = Block::new(BlockKind::LogicBoolean { value: true });
    for _ in 0..300 {
        block = Block::new(BlockKind::LogicNegate { value: sock(block) });
    }
    let err = generate(&program(vec![block])).unwrap_err();
    assert!(matches!(err, CodeGenError::MalformedTree { .. }));
}

#[test]
fn errors_abort_the_run_without_partial_output() {
    // The first root would emit fine; the second errors. The caller gets
    // only the error.
    let bad = Block::new(BlockKind::MathArithmetic {
        op: ArithOp::Add,
        a: sock(print(None)),
        b: None,
    });
    let result = generate(&program(vec![var_set("x", num(1.0)), bad]));
    assert!(result.is_err());
}

// --- generation context lifecycle ---

#[test]
fn fresh_runs_do_not_leak_names_or_helpers() {
    let make = || {
        program(vec![var_set(
            "x",
            Block::new(BlockKind::MathOnList {
                op: ListReduceOp::Random,
                list: None,
            }),
        )])
    };
    let first = generate(&make()).unwrap();
    let second = generate(&make()).unwrap();
    // Identical programs generate identical output; nothing from the first
    // run (names, helper identifiers) bleeds into the second.
    assert_eq!(first, second);
    assert!(second.contains("var math_random_item = new Func"));
}

#[test]
fn reset_clears_a_reused_generator() {
    let mut generator = CSharpGenerator::new(target::CSHARP);
    let first = generator.runtime_helper("math_median", |name| format!("var {name};"));
    generator.reset();
    let second = generator.runtime_helper("math_median", |name| format!("var {name};"));
    // After reset the same key re-registers the same identifier instead of
    // a suffixed one.
    assert_eq!(first, second);
}
