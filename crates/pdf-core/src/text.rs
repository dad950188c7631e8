//! Text content-stream generation

use crate::document::Color;
use crate::Align;

/// State needed to emit one text run
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Measured width of the run in points, for alignment
    pub text_width: f64,
    /// Fill color (RGB)
    pub color: Color,
}

/// Generate the PDF operators for one positioned text run
///
/// Emits BT/rg/Tf/Td/Tj/ET. `x` and `y` are PDF coordinates (points,
/// origin bottom-left); alignment shifts the pen left by half or the full
/// measured width.
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let x_offset = match align {
        Align::Left => 0.0,
        Align::Center => -ctx.text_width / 2.0,
        Align::Right => -ctx.text_width,
    };
    let final_x = x + x_offset;

    let mut ops = String::new();
    ops.push_str("BT\n");
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));
    ops.push_str(&format!("{final_x} {y} Td\n"));
    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}
