//! # Style System
//!
//! The small set of visual properties a report needs: text styles, colors,
//! and the report palette. Quire has no cascade: every block resolves its
//! style directly from [`LayoutConfig`](crate::model::LayoutConfig).

use serde::{Deserialize, Serialize};

/// Style of one run of text. A `Text` draw command carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub color: Color,
    /// Line height as a multiplier of font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
}

fn default_line_height() -> f64 {
    1.2
}

impl TextStyle {
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            bold: false,
            color: Color::BLACK,
            line_height: default_line_height(),
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    /// Height of one wrapped line in points.
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build a color from 0-255 channel values.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Colors shared by every block of a report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palette {
    /// Title banners.
    pub primary: Color,
    /// Panel borders and panel headings.
    pub accent: Color,
    /// Panel backgrounds and alternate table rows.
    pub light: Color,
    /// Body text.
    pub text: Color,
    /// Muted notes.
    pub muted: Color,
    /// Table header background.
    pub header_fill: Color,
    /// Table grid lines.
    pub rule: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Color::rgb8(31, 41, 55),
            accent: Color::rgb8(59, 130, 246),
            light: Color::rgb8(243, 244, 246),
            text: Color::rgb8(17, 24, 39),
            muted: Color::rgb8(100, 100, 100),
            header_fill: Color::rgb8(251, 146, 60),
            rule: Color::rgb8(200, 200, 200),
        }
    }
}
