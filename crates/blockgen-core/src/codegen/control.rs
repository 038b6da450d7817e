// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Loop block templates.
//!
//! Loop bounds the user wired in as expressions are evaluated once and
//! cached in generator-synthesized variables, so a bound that reads a
//! variable (or calls a prompt helper) is not re-evaluated every iteration.
//! Synthesized counters come from the name registry's distinct-name path and
//! can never collide with user variables.

use ecow::{EcoString, eco_format};

use super::precedence::Order;
use super::util::{is_number, is_simple_identifier};
use super::{CSharpGenerator, Result};
use crate::block::{FlowStatement, Socket};

impl CSharpGenerator {
    /// Repeat n times.
    pub(super) fn controls_repeat(&mut self, times: &Socket, body: &Socket) -> Result<EcoString> {
        let repeats = self.value_or(times, Order::Assignment, "0")?;
        let branch = self.statement_to_code(body)?;
        let loop_var = self.distinct_name("count");
        let mut code = EcoString::new();
        let end_var = if is_simple_identifier(&repeats) || is_number(&repeats) {
            repeats
        } else {
            // Cache the repeat count so it is only evaluated once.
            let end_var = self.distinct_name("repeat_end");
            code.push_str(&eco_format!("var {end_var} = {repeats};\n"));
            end_var
        };
        code.push_str(&eco_format!(
            "for (var {loop_var} = 0; {loop_var} < {end_var}; {loop_var}++) {{\n{branch}}}\n"
        ));
        Ok(code)
    }

    /// Do while/until loop.
    pub(super) fn controls_while_until(
        &mut self,
        until: bool,
        condition: &Socket,
        body: &Socket,
    ) -> Result<EcoString> {
        let context = if until { Order::LogicalNot } else { Order::None };
        let mut argument = self.value_or(condition, context, "false")?;
        let branch = self.statement_to_code(body)?;
        if until {
            argument = eco_format!("!{argument}");
        }
        Ok(eco_format!("while ({argument}) {{\n{branch}}}\n"))
    }

    /// For loop over a user variable.
    pub(super) fn controls_for(
        &mut self,
        var: &str,
        from: &Socket,
        to: &Socket,
        by: &Socket,
        body: &Socket,
    ) -> Result<EcoString> {
        let variable = self.variable_name(var);
        let from = self.value_or(from, Order::Assignment, "0")?;
        let to = self.value_or(to, Order::Assignment, "0")?;
        let by = self.value_or(by, Order::Assignment, "1")?;
        let branch = self.statement_to_code(body)?;

        if is_number(&from) && is_number(&to) && is_number(&by) {
            // All bounds are simple numbers: direction is known here.
            let up = from.parse::<f64>().unwrap_or_default() <= to.parse::<f64>().unwrap_or_default();
            let step = by.parse::<f64>().unwrap_or_default().abs();
            let comparison = if up { "<=" } else { ">=" };
            let increment = if (step - 1.0).abs() < f64::EPSILON {
                if up {
                    eco_format!("{variable}++")
                } else {
                    eco_format!("{variable}--")
                }
            } else if up {
                eco_format!("{variable} += {step}")
            } else {
                eco_format!("{variable} -= {step}")
            };
            return Ok(eco_format!(
                "for ({variable} = {from}; {variable} {comparison} {to}; {increment}) {{\n{branch}}}\n"
            ));
        }

        // Cache non-trivial bounds to variables to prevent repeated look-ups,
        // and determine the loop direction at start in case a bound changes
        // during loop execution.
        let mut code = EcoString::new();
        let start_var = if is_simple_identifier(&from) || is_number(&from) {
            from
        } else {
            let start_var = self.distinct_name(&format!("{var}_start"));
            code.push_str(&eco_format!("var {start_var} = {from};\n"));
            start_var
        };
        let end_var = if is_simple_identifier(&to) || is_number(&to) {
            to
        } else {
            let end_var = self.distinct_name(&format!("{var}_end"));
            code.push_str(&eco_format!("var {end_var} = {to};\n"));
            end_var
        };
        let inc_var = self.distinct_name(&format!("{var}_inc"));
        if is_number(&by) {
            let step = by.parse::<f64>().unwrap_or_default().abs();
            code.push_str(&eco_format!("var {inc_var} = {step};\n"));
        } else {
            code.push_str(&eco_format!("var {inc_var} = Math.Abs({by});\n"));
        }
        code.push_str(&eco_format!("if ({start_var} > {end_var}) {{\n"));
        code.push_str(&eco_format!("  {inc_var} = -{inc_var};\n"));
        code.push_str("}\n");
        code.push_str(&eco_format!(
            "for ({variable} = {start_var};\n     {inc_var} >= 0 ? {variable} <= {end_var} : {variable} >= {end_var};\n     {variable} += {inc_var}) {{\n{branch}}}\n"
        ));
        Ok(code)
    }

    /// For-each loop over a list.
    pub(super) fn controls_for_each(
        &mut self,
        var: &str,
        list: &Socket,
        body: &Socket,
    ) -> Result<EcoString> {
        let variable = self.variable_name(var);
        let list = self.value_or(list, Order::Assignment, "new List<dynamic>()")?;
        let branch = self.statement_to_code(body)?;
        if is_simple_identifier(&list) {
            return Ok(eco_format!(
                "foreach (var {variable} in {list}) {{\n{branch}}}\n"
            ));
        }
        // The list is more complicated than a simple variable; cache it so
        // it is only evaluated once.
        let list_var = self.distinct_name(&format!("{var}_list"));
        Ok(eco_format!(
            "var {list_var} = {list};\nforeach (var {variable} in {list_var}) {{\n{branch}}}\n"
        ))
    }

    /// Flow statements: continue, break.
    pub(super) fn controls_flow(&mut self, flow: FlowStatement) -> EcoString {
        match flow {
            FlowStatement::Break => EcoString::from("break;\n"),
            FlowStatement::Continue => EcoString::from("continue;\n"),
        }
    }
}

// Loop bodies are statement sockets; their emission shares the value-socket
// machinery only through `statement_to_code`, so give it a smoke test here.
#[cfg(test)]
mod tests {
    use super::super::{CSharpGenerator, target};
    use crate::block::{Block, BlockKind, FlowStatement};

    #[test]
    fn flow_statements() {
        let mut generator = CSharpGenerator::new(target::CSHARP);
        assert_eq!(generator.controls_flow(FlowStatement::Break), "break;\n");
        assert_eq!(
            generator.controls_flow(FlowStatement::Continue),
            "continue;\n"
        );
    }

    #[test]
    fn nested_bodies_indent_one_level_per_depth() {
        let mut generator = CSharpGenerator::new(target::CSHARP);
        let inner = Block::new(BlockKind::ControlsFlow {
            flow: FlowStatement::Break,
        });
        let body = Some(Box::new(inner));
        let code = generator
            .controls_while_until(false, &None, &body)
            .unwrap();
        assert_eq!(code, "while (false) {\n  break;\n}\n");
    }

    #[test]
    fn until_mode_negates_the_condition() {
        let mut generator = CSharpGenerator::new(target::CSHARP);
        let code = generator.controls_while_until(true, &None, &None).unwrap();
        assert_eq!(code, "while (!false) {\n}\n");
    }
}
