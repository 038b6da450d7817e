// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Variable block templates.
//!
//! Both templates resolve the user's chosen name through the name registry,
//! so a variable shadowing a C# keyword (or clashing with a procedure of the
//! same name) reads and writes the same disambiguated identifier everywhere.

use ecow::{EcoString, eco_format};

use super::precedence::Order;
use super::{CSharpGenerator, Emitted, Result};
use crate::block::Socket;

impl CSharpGenerator {
    /// Variable getter.
    pub(super) fn variables_get(&mut self, name: &str) -> Result<Emitted> {
        Ok(Emitted::new(self.variable_name(name), Order::Atomic))
    }

    /// Variable setter.
    pub(super) fn variables_set(&mut self, name: &str, value: &Socket) -> Result<EcoString> {
        let value = self.value_or(value, Order::Assignment, "null")?;
        let name = self.variable_name(name);
        Ok(eco_format!("{name} = {value};\n"))
    }
}
