// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Blockgen code-emission core.
//!
//! This crate turns a tree of connected program blocks — the internal
//! representation of a visual program — into syntactically valid C# source
//! text. It contains:
//!
//! - The block data model ([`block`]): a closed set of block kinds, each
//!   carrying its input sockets, field values, and `next` link
//! - The code generator ([`codegen`]): precedence-directed expression
//!   emission, statement sequencing, identifier management, and runtime
//!   helper injection
//!
//! The editor/workspace that builds and mutates block trees, and the storage
//! format they are loaded from, live outside this crate; blocks arrive here
//! read-only and leave as one generated program text per run.

pub mod block;
pub mod codegen;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::block::{Block, BlockKind, Program, Socket};
    pub use crate::codegen::{CodeGenError, CodegenOptions, generate, generate_program};
}
