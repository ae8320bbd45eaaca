//! Helpers shared across tool definitions.

use rmcp::model::{CallToolResult, Content};

/// Create a result holding a single text block.
///
/// Domain-level failures ("not found", "cannot divide by zero") are also
/// reported this way: they are answers, not protocol errors.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Render a number the way JavaScript's `String(number)` does.
///
/// Integral values carry no fractional part, non-finite values are spelled
/// out, and magnitudes outside `[1e-6, 1e21)` use exponent notation with an
/// explicit sign (`1e+21`, `1.5e-7`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        // Covers negative zero.
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        value.to_string()
    }
}

/// Text of the first content block of a result.
#[cfg(test)]
pub fn first_text(result: &CallToolResult) -> String {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => text.text.clone(),
        _ => panic!("Expected text content"),
    }
}
