//! Approximate text measurement for node sizing.
//!
//! Canvas text metrics are not available off the render thread, so node widths
//! are estimated from a per-character weight table. Consumers must treat the
//! result as a layout hint, not a guarantee of visual fit.

const BASE_FONT_SIZE: f64 = 16.0;
const LABEL_PADDING: f64 = 60.0;

/// Width of one character in em units, for a medium-weight sans font.
fn char_weight(c: char) -> f64 {
	match c {
		'i' | 'l' | 'I' => 0.3,
		'j' | 'f' => 0.35,
		't' | 'r' => 0.4,
		'm' | 'w' => 1.0,
		'M' | 'W' => 1.1,
		_ => 0.6,
	}
}

/// Estimate the rendered pixel width of a node label.
///
/// An empty label yields the fixed padding, never zero.
pub fn estimate_text_width(label: &str) -> f64 {
	let em: f64 = label.chars().map(char_weight).sum();
	em * BASE_FONT_SIZE + LABEL_PADDING
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_label_yields_padding_floor() {
		let floor = estimate_text_width("");
		assert!(floor > 0.0);
		for label in ["a", "i", "W", "hello world", "Data Loading"] {
			assert!(estimate_text_width(label) >= floor);
		}
	}

	#[test]
	fn width_grows_with_repetition() {
		let mut prev = estimate_text_width("");
		for n in 1..10 {
			let w = estimate_text_width(&"x".repeat(n));
			assert!(w > prev);
			prev = w;
		}
	}

	#[test]
	fn narrow_chars_measure_less_than_wide() {
		assert!(estimate_text_width("iiii") < estimate_text_width("MMMM"));
	}
}
