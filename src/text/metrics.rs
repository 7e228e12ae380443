//! Built-in advance widths.
//!
//! `StandardMetrics` carries the Helvetica and Helvetica-Bold AFM widths for
//! printable ASCII (units per 1000 em). Anything outside that range falls
//! back to the width of a digit, which is close enough for layout decisions
//! and keeps the engine free of font files.

use super::TextMeasure;
use crate::style::TextStyle;

/// Helvetica widths for U+0020..=U+007E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold widths for U+0020..=U+007E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

const FALLBACK: u16 = 556;
const BULLET: u16 = 350;

/// Helvetica metrics, the default text measure.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

impl TextMeasure for StandardMetrics {
    fn char_width(&self, ch: char, style: &TextStyle) -> f64 {
        let table = if style.bold {
            &HELVETICA_BOLD
        } else {
            &HELVETICA
        };
        let units = match ch {
            ' '..='~' => table[ch as usize - 0x20],
            '\u{2022}' => BULLET,
            '\u{00A0}' => table[0],
            _ => FALLBACK,
        };
        units as f64 / 1000.0 * style.font_size
    }
}

/// Every character advances by the same fraction of the font size.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance {
    pub em: f64,
}

impl FixedAdvance {
    pub fn new(em: f64) -> Self {
        Self { em }
    }
}

impl Default for FixedAdvance {
    fn default() -> Self {
        // Courier
        Self::new(0.6)
    }
}

impl TextMeasure for FixedAdvance {
    fn char_width(&self, _ch: char, style: &TextStyle) -> f64 {
        self.em * style.font_size
    }
}
