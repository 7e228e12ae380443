//! # Text Measurement
//!
//! Line breaking and height measurement for every block type.
//!
//! Measurement is split in two: a [`TextMeasure`] implementation answers
//! "how wide is this character in this style?", and the provided
//! [`TextMeasure::measure`] method turns that into wrapped lines. Blocks call
//! `measure` twice per placement (once to plan, once to render), so it must
//! stay pure.

pub mod metrics;

pub use metrics::{FixedAdvance, StandardMetrics};

use crate::error::{QuireError, Result};
use crate::style::TextStyle;

/// The result of wrapping a string against a maximum width.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredText {
    pub lines: Vec<String>,
    pub line_height: f64,
    pub total_height: f64,
}

/// A source of character advance widths.
pub trait TextMeasure {
    /// Advance width of `ch` in points at `style`.
    fn char_width(&self, ch: char, style: &TextStyle) -> f64;

    /// Width of a string on a single line.
    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        text.chars().map(|ch| self.char_width(ch, style)).sum()
    }

    /// Greedily wrap `text` into lines no wider than `max_width`.
    ///
    /// Lines break at whitespace only. Runs of whitespace collapse to a single
    /// space, and `\n` always starts a new line. A word wider than
    /// `max_width` gets a line of its own and is left intact.
    fn measure(&self, text: &str, style: &TextStyle, max_width: f64) -> Result<MeasuredText> {
        if !(max_width > 0.0) {
            return Err(QuireError::MeasurementContractViolation { max_width });
        }

        let space = self.char_width(' ', style);
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut line = String::new();
            let mut line_width = 0.0;

            for word in paragraph.split_whitespace() {
                let word_width = self.text_width(word, style);
                if line.is_empty() {
                    line.push_str(word);
                    line_width = word_width;
                } else if line_width + space + word_width <= max_width {
                    line.push(' ');
                    line.push_str(word);
                    line_width += space + word_width;
                } else {
                    lines.push(std::mem::take(&mut line));
                    line.push_str(word);
                    line_width = word_width;
                }
            }

            lines.push(line);
        }

        let line_height = style.line_advance();
        let total_height = lines.len() as f64 * line_height;
        Ok(MeasuredText {
            lines,
            line_height,
            total_height,
        })
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn char_width(&self, ch: char, style: &TextStyle) -> f64 {
        (**self).char_width(ch, style)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for Box<T> {
    fn char_width(&self, ch: char, style: &TextStyle) -> f64 {
        (**self).char_width(ch, style)
    }
}
