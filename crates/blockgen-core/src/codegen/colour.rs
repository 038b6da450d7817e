// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Colour block templates.
//!
//! Colours are `System.Drawing.Color` values; everything beyond the literal
//! picker is an injected runtime helper.

use ecow::eco_format;

use super::precedence::Order;
use super::util;
use super::{CSharpGenerator, Emitted, Result};
use crate::block::Socket;

impl CSharpGenerator {
    /// Colour picker literal.
    pub(super) fn colour_picker(&mut self, colour: &str) -> Result<Emitted> {
        Ok(Emitted::new(
            eco_format!("ColorTranslator.FromHtml(\"{colour}\")"),
            Order::FunctionCall,
        ))
    }

    /// Generate a random colour.
    pub(super) fn colour_random(&mut self) -> Result<Emitted> {
        let helper = self.runtime_helper("colour_random", |name| {
            util::lines(&[
                &format!("var {name} = new Func<Color>(() => {{"),
                "  var random = new Random();",
                "  var res = Color.FromArgb(1, random.Next(256), random.Next(256), random.Next(256));",
                "  return res;",
                "});",
            ])
        });
        Ok(Emitted::new(eco_format!("{helper}()"), Order::FunctionCall))
    }

    /// Compose a colour from RGB components expressed as percentages.
    pub(super) fn colour_rgb(
        &mut self,
        red: &Socket,
        green: &Socket,
        blue: &Socket,
    ) -> Result<Emitted> {
        let red = self.value_or(red, Order::Comma, "0")?;
        let green = self.value_or(green, Order::Comma, "0")?;
        let blue = self.value_or(blue, Order::Comma, "0")?;
        let helper = self.runtime_helper("colour_rgb", |name| {
            util::lines(&[
                &format!("var {name} = new Func<dynamic, dynamic, dynamic, Color>((r, g, b) => {{"),
                "  r = (int)Math.Round(Math.Max(Math.Min((int)r, 100), 0) * 2.55);",
                "  g = (int)Math.Round(Math.Max(Math.Min((int)g, 100), 0) * 2.55);",
                "  b = (int)Math.Round(Math.Max(Math.Min((int)b, 100), 0) * 2.55);",
                "  var res = Color.FromArgb(1, r, g, b);",
                "  return res;",
                "});",
            ])
        });
        Ok(Emitted::new(
            eco_format!("{helper}({red}, {green}, {blue})"),
            Order::FunctionCall,
        ))
    }

    /// Blend two colours together by ratio.
    pub(super) fn colour_blend(
        &mut self,
        colour1: &Socket,
        colour2: &Socket,
        ratio: &Socket,
    ) -> Result<Emitted> {
        let colour1 = self.value_or(colour1, Order::Comma, "Color.Black")?;
        let colour2 = self.value_or(colour2, Order::Comma, "Color.Black")?;
        let ratio = self.value_or(ratio, Order::Comma, "0.5")?;
        let helper = self.runtime_helper("colour_blend", |name| {
            util::lines(&[
                &format!("var {name} = new Func<Color, Color, double, Color>((c1, c2, ratio) => {{"),
                "  ratio = Math.Max(Math.Min((double)ratio, 1), 0);",
                "  var r = (int)Math.Round(c1.R * (1 - ratio) + c2.R * ratio);",
                "  var g = (int)Math.Round(c1.G * (1 - ratio) + c2.G * ratio);",
                "  var b = (int)Math.Round(c1.B * (1 - ratio) + c2.B * ratio);",
                "  var res = Color.FromArgb(1, r, g, b);",
                "  return res;",
                "});",
            ])
        });
        Ok(Emitted::new(
            eco_format!("{helper}({colour1}, {colour2}, {ratio})"),
            Order::FunctionCall,
        ))
    }
}
