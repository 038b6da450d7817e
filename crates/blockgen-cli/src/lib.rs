// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shared pieces of the blockgen CLI.
//!
//! The program-file loader lives in the library crate so the fuzz targets
//! and integration tests can drive exactly the code path the `blockgen`
//! binary uses.

pub mod program_file;
