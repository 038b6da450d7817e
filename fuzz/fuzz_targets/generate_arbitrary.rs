// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for loader and generator crash safety testing.
//!
//! This target feeds arbitrary byte sequences through the program-file
//! loader and, when a program decodes, runs a full generation over it. Both
//! stages must handle all input gracefully, producing either output or an
//! error — never a panic.
//!
//! # Success Criteria
//!
//! The pipeline passes fuzzing if:
//! - It never panics on any input (including invalid UTF-8)
//! - Decoding always returns a Program or a LoadError
//! - Generation always returns code or a CodeGenError
//!
//! # Corpus Seeding
//!
//! The corpus in `fuzz/corpus/generate_arbitrary/` contains the `.json`
//! program files from `crates/blockgen-cli/demos/`, providing realistic
//! starting points for mutation.

#![no_main]

use blockgen_cli::program_file;
use blockgen_core::codegen::generate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only test valid UTF-8 (the loader expects strings)
    if let Ok(source) = std::str::from_utf8(data) {
        if let Ok(program) = program_file::parse_str(source) {
            // Success = no panic. We don't care whether generation
            // succeeds, only that it returns.
            let _ = generate(&program);
        }
    }
});
