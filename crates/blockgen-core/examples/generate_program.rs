// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Example demonstrating the code generation API.
//!
//! Builds a small block program by hand — the way the visual editor would
//! hand one over — and prints the generated C#.

use blockgen_core::block::{
    ArithOp, Block, BlockKind, CompareOp, IfBranch, ListReduceOp, Program,
};
use blockgen_core::codegen::generate;

fn sock(block: Block) -> Option<Box<Block>> {
    Some(Box::new(block))
}

fn num(value: f64) -> Block {
    Block::new(BlockKind::MathNumber { value })
}

fn main() {
    // score := random item of samples
    let pick = Block::new(BlockKind::MathOnList {
        op: ListReduceOp::Random,
        list: sock(Block::new(BlockKind::VariableGet {
            name: "samples".into(),
        })),
    });
    let assign = Block::new(BlockKind::VariableSet {
        name: "score".into(),
        value: sock(pick),
    })
    .with_comment("Pick one sample to report.");

    // if score > 9 { print "high" } else { print "low" }
    let compare = Block::new(BlockKind::LogicCompare {
        op: CompareOp::Gt,
        a: sock(Block::new(BlockKind::VariableGet {
            name: "score".into(),
        })),
        b: sock(num(9.0)),
    });
    let report = Block::new(BlockKind::ControlsIf {
        branches: vec![IfBranch {
            condition: sock(compare),
            body: sock(Block::new(BlockKind::TextPrint {
                text: sock(Block::new(BlockKind::Text {
                    text: "high".into(),
                })),
            })),
        }],
        else_body: sock(Block::new(BlockKind::TextPrint {
            text: sock(Block::new(BlockKind::Text { text: "low".into() })),
        })),
    });

    // A naked value at top level: (2 + 3) * 4
    let naked = Block::new(BlockKind::MathArithmetic {
        op: ArithOp::Multiply,
        a: sock(Block::new(BlockKind::MathArithmetic {
            op: ArithOp::Add,
            a: sock(num(2.0)),
            b: sock(num(3.0)),
        })),
        b: sock(num(4.0)),
    });

    let program = Program {
        variables: vec!["samples".into(), "score".into()],
        roots: vec![assign.then(report), naked],
    };

    match generate(&program) {
        Ok(code) => println!("{code}"),
        Err(e) => eprintln!("generation failed: {e}"),
    }
}
