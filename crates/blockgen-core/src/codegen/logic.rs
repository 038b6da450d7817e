// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Logic and conditional block templates.

use ecow::{EcoString, eco_format};

use super::precedence::Order;
use super::{CSharpGenerator, Emitted, Result};
use crate::block::{CompareOp, IfBranch, LogicOp, Socket};

impl CSharpGenerator {
    /// If/elseif/else condition.
    pub(super) fn controls_if(
        &mut self,
        branches: &[IfBranch],
        else_body: &Socket,
    ) -> Result<EcoString> {
        let mut code = EcoString::new();
        for (i, branch) in branches.iter().enumerate() {
            let condition = self.value_or(&branch.condition, Order::None, "false")?;
            let body = self.statement_to_code(&branch.body)?;
            if i > 0 {
                code.push_str(" else ");
            }
            code.push_str(&eco_format!("if ({condition}) {{\n{body}}}"));
        }
        if branches.is_empty() {
            // All condition sockets were removed in the editor; keep the
            // else body reachable rather than dropping it.
            let body = self.statement_to_code(else_body)?;
            code.push_str(&eco_format!("if (false) {{\n}} else {{\n{body}}}"));
        } else if else_body.is_some() {
            let body = self.statement_to_code(else_body)?;
            code.push_str(&eco_format!(" else {{\n{body}}}"));
        }
        code.push('\n');
        Ok(code)
    }

    /// Comparison operator.
    pub(super) fn logic_compare(&mut self, op: CompareOp, a: &Socket, b: &Socket) -> Result<Emitted> {
        let (operator, order) = match op {
            CompareOp::Eq => ("==", Order::Equality),
            CompareOp::Neq => ("!=", Order::Equality),
            CompareOp::Lt => ("<", Order::Relational),
            CompareOp::Lte => ("<=", Order::Relational),
            CompareOp::Gt => (">", Order::Relational),
            CompareOp::Gte => (">=", Order::Relational),
        };
        let left = self.value_or(a, order, "null")?;
        let right = self.value_or(b, order, "null")?;
        Ok(Emitted::new(
            eco_format!("{left} {operator} {right}"),
            order,
        ))
    }

    /// Operations 'and', 'or'.
    pub(super) fn logic_operation(&mut self, op: LogicOp, a: &Socket, b: &Socket) -> Result<Emitted> {
        let (operator, order) = match op {
            LogicOp::And => ("&&", Order::LogicalAnd),
            LogicOp::Or => ("||", Order::LogicalOr),
        };
        let left = self.value_or(a, order, "false")?;
        let right = self.value_or(b, order, "false")?;
        Ok(Emitted::new(
            eco_format!("{left} {operator} {right}"),
            order,
        ))
    }

    /// Negation.
    pub(super) fn logic_negate(&mut self, value: &Socket) -> Result<Emitted> {
        let arg = self.value_or(value, Order::LogicalNot, "false")?;
        Ok(Emitted::new(eco_format!("!{arg}"), Order::LogicalNot))
    }

    /// Boolean values true and false.
    pub(super) fn logic_boolean(&mut self, value: bool) -> Result<Emitted> {
        Ok(Emitted::new(
            if value { "true" } else { "false" },
            Order::Atomic,
        ))
    }

    /// Null data type.
    pub(super) fn logic_null(&mut self) -> Result<Emitted> {
        Ok(Emitted::new("null", Order::Atomic))
    }

    /// Ternary operator.
    pub(super) fn logic_ternary(
        &mut self,
        condition: &Socket,
        then: &Socket,
        otherwise: &Socket,
    ) -> Result<Emitted> {
        let condition = self.value_or(condition, Order::Conditional, "false")?;
        let then = self.value_or(then, Order::Conditional, "null")?;
        let otherwise = self.value_or(otherwise, Order::Conditional, "null")?;
        Ok(Emitted::new(
            eco_format!("{condition} ? {then} : {otherwise}"),
            Order::Conditional,
        ))
    }
}
