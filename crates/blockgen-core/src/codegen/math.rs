// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Math block templates.
//!
//! Numbers are emitted as `double` arithmetic. Power has no C# operator and
//! compiles to `Math.Pow`; negation is the one non-associative case the
//! precedence table cannot express, handled here by inserting a separating
//! space so a negated negative never lexes as `--`.

use ecow::{EcoString, eco_format};

use super::precedence::Order;
use super::util::{self, number_literal};
use super::{CSharpGenerator, Emitted, Result};
use crate::block::{ArithOp, ListReduceOp, MathConstant, NumberProperty, Socket, UnaryMathOp};

impl CSharpGenerator {
    /// Numeric literal.
    pub(super) fn math_number(&mut self, value: f64) -> Result<Emitted> {
        Ok(Emitted::new(number_literal(value), Order::Atomic))
    }

    /// Basic arithmetic operators, and power.
    pub(super) fn math_arithmetic(
        &mut self,
        op: ArithOp,
        a: &Socket,
        b: &Socket,
    ) -> Result<Emitted> {
        let (operator, order) = match op {
            ArithOp::Add => (" + ", Order::Addition),
            ArithOp::Minus => (" - ", Order::Subtraction),
            ArithOp::Multiply => (" * ", Order::Multiplication),
            ArithOp::Divide => (" / ", Order::Division),
            // Power requires a special case since C# has no operator for it.
            ArithOp::Power => {
                let left = self.value_or(a, Order::Comma, "0.0")?;
                let right = self.value_or(b, Order::Comma, "0.0")?;
                return Ok(Emitted::new(
                    eco_format!("Math.Pow({left}, {right})"),
                    Order::FunctionCall,
                ));
            }
        };
        let left = self.value_or(a, order, "0.0")?;
        let right = self.value_or(b, order, "0.0")?;
        Ok(Emitted::new(eco_format!("{left}{operator}{right}"), order))
    }

    /// Math operators with a single operand.
    pub(super) fn math_single(&mut self, op: UnaryMathOp, num: &Socket) -> Result<Emitted> {
        if op == UnaryMathOp::Neg {
            return self.math_negate(num);
        }

        let arg = match op {
            UnaryMathOp::Sin | UnaryMathOp::Cos | UnaryMathOp::Tan => {
                self.value_or(num, Order::Division, "0")?
            }
            _ => self.value_or(num, Order::None, "0.0")?,
        };

        let (code, order) = match op {
            UnaryMathOp::Abs => (eco_format!("Math.Abs({arg})"), Order::FunctionCall),
            UnaryMathOp::Root => (eco_format!("Math.Sqrt({arg})"), Order::FunctionCall),
            UnaryMathOp::Ln => (eco_format!("Math.Log({arg})"), Order::FunctionCall),
            UnaryMathOp::Log10 => (eco_format!("Math.Log10({arg})"), Order::FunctionCall),
            UnaryMathOp::Exp => (eco_format!("Math.Exp({arg})"), Order::FunctionCall),
            UnaryMathOp::Pow10 => (eco_format!("Math.Pow({arg}, 10)"), Order::FunctionCall),
            UnaryMathOp::Round => (eco_format!("Math.Round({arg})"), Order::FunctionCall),
            UnaryMathOp::RoundUp => (eco_format!("Math.Ceiling({arg})"), Order::FunctionCall),
            UnaryMathOp::RoundDown => (eco_format!("Math.Floor({arg})"), Order::FunctionCall),
            UnaryMathOp::Sin => (
                eco_format!("Math.Sin({arg} / 180 * Math.PI)"),
                Order::FunctionCall,
            ),
            UnaryMathOp::Cos => (
                eco_format!("Math.Cos({arg} / 180 * Math.PI)"),
                Order::FunctionCall,
            ),
            UnaryMathOp::Tan => (
                eco_format!("Math.Tan({arg} / 180 * Math.PI)"),
                Order::FunctionCall,
            ),
            // The degree conversion leaves a division outermost for these.
            UnaryMathOp::Asin => (eco_format!("Math.Asin({arg}) / Math.PI * 180"), Order::Division),
            UnaryMathOp::Acos => (eco_format!("Math.Acos({arg}) / Math.PI * 180"), Order::Division),
            UnaryMathOp::Atan => (eco_format!("Math.Atan({arg}) / Math.PI * 180"), Order::Division),
            UnaryMathOp::Neg => return self.math_negate(num),
        };
        Ok(Emitted::new(code, order))
    }

    /// Unary negation.
    ///
    /// Negation gets its own precedence, and chained negation needs a
    /// separating space: `--3` would lex as a decrement token.
    fn math_negate(&mut self, num: &Socket) -> Result<Emitted> {
        let mut arg = self.value_or(num, Order::UnaryNegation, "0.0")?;
        if arg.starts_with('-') {
            arg = eco_format!(" {arg}");
        }
        Ok(Emitted::new(eco_format!("-{arg}"), Order::UnaryNegation))
    }

    /// Constants: PI, E, the Golden Ratio, sqrt(2), 1/sqrt(2), INFINITY.
    pub(super) fn math_constant(&mut self, constant: MathConstant) -> Result<Emitted> {
        let (code, order) = match constant {
            MathConstant::Pi => ("Math.PI", Order::Member),
            MathConstant::E => ("Math.E", Order::Member),
            MathConstant::GoldenRatio => ("(1 + Math.Sqrt(5)) / 2", Order::Division),
            MathConstant::Sqrt2 => ("Math.Sqrt(2)", Order::FunctionCall),
            MathConstant::SqrtHalf => ("Math.Sqrt(1.0 / 2)", Order::FunctionCall),
            MathConstant::Infinity => ("double.PositiveInfinity", Order::Member),
        };
        Ok(Emitted::new(code, order))
    }

    /// Check if a number is even, odd, prime, whole, positive, negative, or
    /// divisible by another number.
    pub(super) fn math_number_property(
        &mut self,
        property: NumberProperty,
        number: &Socket,
        divisor: &Socket,
    ) -> Result<Emitted> {
        let number = self.value_or(number, Order::Modulus, "double.NaN")?;
        let (code, order) = match property {
            NumberProperty::Even => (eco_format!("{number} % 2 == 0"), Order::Equality),
            NumberProperty::Odd => (eco_format!("{number} % 2 == 1"), Order::Equality),
            NumberProperty::Whole => (eco_format!("{number} % 1 == 0"), Order::Equality),
            NumberProperty::Positive => (eco_format!("{number} > 0"), Order::Relational),
            NumberProperty::Negative => (eco_format!("{number} < 0"), Order::Relational),
            NumberProperty::DivisibleBy => {
                let divisor = self.value_or(divisor, Order::Modulus, "double.NaN")?;
                (eco_format!("{number} % {divisor} == 0"), Order::Equality)
            }
            NumberProperty::Prime => return self.math_is_prime(&number),
        };
        Ok(Emitted::new(code, order))
    }

    /// Primality check; not a one-liner test, so a helper is injected.
    fn math_is_prime(&mut self, number: &str) -> Result<Emitted> {
        let helper = self.runtime_helper("math_is_prime", |name| {
            util::lines(&[
                &format!("var {name} = new Func<double, bool>((n) => {{"),
                "  // https://en.wikipedia.org/wiki/Primality_test#Naive_methods",
                "  if (n == 2.0 || n == 3.0)",
                "    return true;",
                "  if (double.IsNaN(n) || n <= 1 || n % 1 != 0.0 || n % 2 == 0.0 || n % 3 == 0.0)",
                "    return false;",
                "  // Check all the numbers of form 6k +/- 1, up to sqrt(n).",
                "  for (var x = 6; x <= Math.Sqrt(n) + 1; x += 6) {",
                "    if (n % (x - 1) == 0.0 || n % (x + 1) == 0.0)",
                "      return false;",
                "  }",
                "  return true;",
                "});",
            ])
        });
        Ok(Emitted::new(
            eco_format!("{helper}({number})"),
            Order::FunctionCall,
        ))
    }

    /// Add a delta to a variable in place.
    pub(super) fn math_change(&mut self, var: &str, delta: &Socket) -> Result<EcoString> {
        let delta = self.value_or(delta, Order::Addition, "0.0")?;
        let name = self.variable_name(var);
        Ok(eco_format!(
            "{name} = ({name}.GetType().Name == \"Double\" ? {name} : 0.0) + {delta};\n"
        ))
    }

    /// Math functions applied to a list.
    pub(super) fn math_on_list(&mut self, op: ListReduceOp, list: &Socket) -> Result<Emitted> {
        const EMPTY: &str = "new List<dynamic>()";
        let code = match op {
            ListReduceOp::Sum => {
                let list = self.value_or(list, Order::Member, EMPTY)?;
                eco_format!("{list}.Aggregate((x, y) => x + y)")
            }
            ListReduceOp::Min => {
                let list = self.value_or(list, Order::Member, EMPTY)?;
                eco_format!("{list}.Min()")
            }
            ListReduceOp::Max => {
                let list = self.value_or(list, Order::Member, EMPTY)?;
                eco_format!("{list}.Max()")
            }
            ListReduceOp::Average => {
                let list = self.value_or(list, Order::Member, EMPTY)?;
                eco_format!("{list}.Average()")
            }
            ListReduceOp::Median => {
                let helper = self.runtime_helper("math_median", |name| {
                    util::lines(&[
                        &format!("var {name} = new Func<List<dynamic>, dynamic>((vals) => {{"),
                        "  vals.Sort();",
                        "  if (vals.Count % 2 == 0)",
                        "    return (vals[vals.Count / 2 - 1] + vals[vals.Count / 2]) / 2;",
                        "  else",
                        "    return vals[(vals.Count - 1) / 2];",
                        "});",
                    ])
                });
                let list = self.value_or(list, Order::None, EMPTY)?;
                eco_format!("{helper}({list})")
            }
            ListReduceOp::Mode => {
                // A list can have more than one mode, so the result is a list.
                let helper = self.runtime_helper("math_modes", |name| {
                    util::lines(&[
                        &format!(
                            "var {name} = new Func<List<dynamic>, List<dynamic>>((values) => {{"
                        ),
                        "  var modes = new List<dynamic>();",
                        "  var counts = new Dictionary<double, int>();",
                        "  var maxCount = 0;",
                        "  foreach (var value in values) {",
                        "    int storedCount;",
                        "    if (counts.TryGetValue(value, out storedCount)) {",
                        "      maxCount = Math.Max(maxCount, ++counts[value]);",
                        "    }",
                        "    else {",
                        "      counts.Add(value, 1);",
                        "      maxCount = 1;",
                        "    }",
                        "  }",
                        "  foreach (var pair in counts) {",
                        "    if (pair.Value == maxCount)",
                        "      modes.Add(pair.Key);",
                        "  }",
                        "  return modes;",
                        "});",
                    ])
                });
                let list = self.value_or(list, Order::None, EMPTY)?;
                eco_format!("{helper}({list})")
            }
            ListReduceOp::StdDev => {
                let helper = self.runtime_helper("math_standard_deviation", |name| {
                    util::lines(&[
                        &format!("var {name} = new Func<List<dynamic>, double>((numbers) => {{"),
                        "  var n = numbers.Count;",
                        "  var mean = numbers.Average(val => val);",
                        "  var variance = 0.0;",
                        "  for (var j = 0; j < n; j++) {",
                        "    variance += Math.Pow(numbers[j] - mean, 2);",
                        "  }",
                        "  variance = variance / n;",
                        "  return Math.Sqrt(variance);",
                        "});",
                    ])
                });
                let list = self.value_or(list, Order::None, EMPTY)?;
                eco_format!("{helper}({list})")
            }
            ListReduceOp::Random => {
                let helper = self.runtime_helper("math_random_item", |name| {
                    util::lines(&[
                        &format!("var {name} = new Func<List<dynamic>, dynamic>((list) => {{"),
                        "  var x = (new Random()).Next(list.Count);",
                        "  return list[x];",
                        "});",
                    ])
                });
                let list = self.value_or(list, Order::None, EMPTY)?;
                eco_format!("{helper}({list})")
            }
        };
        Ok(Emitted::new(code, Order::FunctionCall))
    }

    /// Remainder computation.
    pub(super) fn math_modulo(&mut self, dividend: &Socket, divisor: &Socket) -> Result<Emitted> {
        let dividend = self.value_or(dividend, Order::Modulus, "0.0")?;
        let divisor = self.value_or(divisor, Order::Modulus, "0.0")?;
        Ok(Emitted::new(
            eco_format!("{dividend} % {divisor}"),
            Order::Modulus,
        ))
    }

    /// Constrain a number between two limits.
    pub(super) fn math_constrain(
        &mut self,
        value: &Socket,
        low: &Socket,
        high: &Socket,
    ) -> Result<Emitted> {
        let value = self.value_or(value, Order::Comma, "0.0")?;
        let low = self.value_or(low, Order::Comma, "0.0")?;
        let high = self.value_or(high, Order::Comma, "double.PositiveInfinity")?;
        Ok(Emitted::new(
            eco_format!("Math.Min(Math.Max({value}, {low}), {high})"),
            Order::FunctionCall,
        ))
    }

    /// Random integer between two bounds, inclusive.
    pub(super) fn math_random_int(&mut self, from: &Socket, to: &Socket) -> Result<Emitted> {
        let from = self.value_or(from, Order::Comma, "0")?;
        let to = self.value_or(to, Order::Comma, "0")?;
        let helper = self.runtime_helper("math_random_int", |name| {
            util::lines(&[
                &format!("var {name} = new Func<int, int, int>((a, b) => {{"),
                "  if (a > b) {",
                "    // Swap a and b to ensure a is smaller.",
                "    var c = a;",
                "    a = b;",
                "    b = c;",
                "  }",
                "  return a + (new Random()).Next(b - a + 1);",
                "});",
            ])
        });
        Ok(Emitted::new(
            eco_format!("{helper}({from}, {to})"),
            Order::FunctionCall,
        ))
    }

    /// Random fraction between 0 and 1.
    pub(super) fn math_random_float(&mut self) -> Result<Emitted> {
        Ok(Emitted::new(
            "(new Random()).NextDouble()",
            Order::FunctionCall,
        ))
    }
}
