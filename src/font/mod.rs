//! # Font Metrics
//!
//! Advance widths read from a TrueType/OpenType font, for callers who want
//! line breaks to match the font their rendering backend will embed.
//!
//! Only horizontal advances are used. There is no shaping or kerning: the
//! engine decides where blocks go, not how glyphs are set.

use std::collections::HashMap;
use std::path::Path;

use base64::Engine as _;

use crate::error::{QuireError, Result};
use crate::style::TextStyle;
use crate::text::TextMeasure;

/// Advance widths parsed from a font file.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    pub family: Option<String>,
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    /// Extra advance applied to every glyph when a style asks for bold and
    /// the font has no bold face of its own (units per em).
    pub synthetic_bold: u16,
}

impl FontMetrics {
    /// Parse metrics from raw font data.
    pub fn from_font_data(data: &[u8]) -> Result<Self> {
        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|e| QuireError::FontError(format!("failed to parse font: {}", e)))?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;

        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    if ch == '0' {
                        default_advance = advance;
                    }
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        let family = face
            .names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::FAMILY && name.is_unicode())
            .and_then(|name| name.to_string());

        log::debug!(
            "Loaded font {:?}: {} glyph advances, {} units/em",
            family,
            advance_widths.len(),
            units_per_em
        );

        Ok(Self {
            family,
            units_per_em,
            advance_widths,
            default_advance,
            synthetic_bold: units_per_em / 40,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_font_data(&data)
    }

    /// Load a font given as base64 text or a data URI
    /// (`data:font/ttf;base64,...`).
    pub fn from_base64(src: &str) -> Result<Self> {
        let data = decode_font_src(src)?;
        Self::from_font_data(&data)
    }
}

impl TextMeasure for FontMetrics {
    fn char_width(&self, ch: char, style: &TextStyle) -> f64 {
        let mut units = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        if style.bold {
            units = units.saturating_add(self.synthetic_bold);
        }
        (units as f64 / self.units_per_em as f64) * style.font_size
    }
}

/// Decode base64 font data, stripping a data URI prefix if present.
pub fn decode_font_src(src: &str) -> Result<Vec<u8>> {
    let payload = match src.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => src,
    };
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| QuireError::FontError(format!("invalid base64 font data: {}", e)))
}
