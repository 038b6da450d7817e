// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Procedure block templates.
//!
//! A procedure definition does not emit into the chain that contains it: the
//! whole definition — comments, parameters, captured body, and anything
//! linked after the definition block — is stored as a definitions entry, and
//! the definition template signals "captured" so the sequencer emits nothing
//! at the block's own position. Call sites then reference the definition by
//! its registered identifier, which is shared with no variable.

use ecow::{EcoString, eco_format};

use super::precedence::Order;
use super::{CSharpGenerator, Emitted, Result};
use crate::block::{Block, Socket};

impl CSharpGenerator {
    /// Define a procedure, with or without a return value.
    ///
    /// Stores the full definition in the pool keyed by the procedure's
    /// emitted identifier; the caller short-circuits the chain.
    pub(super) fn procedures_def(
        &mut self,
        block: &Block,
        name: &str,
        params: &[EcoString],
        body: &Socket,
        ret: &Socket,
    ) -> Result<()> {
        let func_name = self.procedure_name(name);
        let branch = self.statement_to_code(body)?;

        let return_value = self.value_to_code(ret, Order::None)?;
        let return_code = match &return_value {
            Some(value) => eco_format!("  return {value};\n"),
            None => EcoString::new(),
        };

        let mut args = Vec::with_capacity(params.len());
        for param in params {
            args.push(self.variable_name(param));
        }
        let arg_list = args
            .iter()
            .map(EcoString::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        // Func<> carries one type per parameter plus the result; Action<>
        // only the parameters; a no-arg void procedure is a bare Action.
        let mut type_args: Vec<&str> = params.iter().map(|_| "dynamic").collect();
        let delegate = if return_value.is_some() {
            type_args.push("dynamic");
            eco_format!("Func<{}>", type_args.join(", "))
        } else if type_args.is_empty() {
            EcoString::from("Action")
        } else {
            eco_format!("Action<{}>", type_args.join(", "))
        };

        let code = eco_format!(
            "var {func_name} = new {delegate}(({arg_list}) => {{\n{branch}{return_code}}});\n"
        );
        // Scrub so the definition keeps its comments and captures whatever
        // was linked after the definition block.
        let full = self.scrub(block, &code)?;
        self.helpers.define(&func_name, full);
        Ok(())
    }

    /// Call a procedure with a return value.
    pub(super) fn procedures_call_return(
        &mut self,
        name: &str,
        args: &[Socket],
    ) -> Result<Emitted> {
        let func_name = self.procedure_name(name);
        let args = self.call_arguments(args)?;
        Ok(Emitted::new(
            eco_format!("{func_name}({args})"),
            Order::FunctionCall,
        ))
    }

    /// Call a procedure with no return value.
    pub(super) fn procedures_call_no_return(
        &mut self,
        name: &str,
        args: &[Socket],
    ) -> Result<EcoString> {
        let func_name = self.procedure_name(name);
        let args = self.call_arguments(args)?;
        Ok(eco_format!("{func_name}({args});\n"))
    }

    /// Conditionally return a value from a procedure.
    pub(super) fn procedures_if_return(
        &mut self,
        condition: &Socket,
        value: &Socket,
        has_return: bool,
    ) -> Result<EcoString> {
        let condition = self.value_or(condition, Order::None, "false")?;
        let mut code = eco_format!("if ({condition}) {{\n");
        if has_return {
            let value = self.value_or(value, Order::None, "null")?;
            code.push_str(&eco_format!("  return {value};\n"));
        } else {
            code.push_str("  return;\n");
        }
        code.push_str("}\n");
        Ok(code)
    }

    fn call_arguments(&mut self, args: &[Socket]) -> Result<String> {
        let mut parts = Vec::with_capacity(args.len());
        for arg in args {
            parts.push(self.value_or(arg, Order::Comma, "null")?);
        }
        Ok(parts
            .iter()
            .map(EcoString::as_str)
            .collect::<Vec<_>>()
            .join(", "))
    }
}
