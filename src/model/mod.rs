//! # Report Model
//!
//! The input side of the engine: content blocks and the layout configuration
//! they are flowed against. Everything here is plain data, produced once per
//! composition pass and only ever read by the layout engine.
//!
//! Blocks are a closed set. The flow controller treats five of them as
//! unbreakable units and splits only [`ContentBlock::Table`], between rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{QuireError, Result};
use crate::style::{Color, Palette, TextStyle};

/// One discrete unit of report content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBlock {
    /// A heading. Level 1 is the document title, level 2 a section header.
    Heading { text: String, level: u8 },

    /// A wrapped run of narrative text.
    Paragraph { text: String },

    /// A small paragraph in the muted palette color, for captions and
    /// footnotes.
    Note { text: String },

    /// A list of items, each starting with a bullet or, when `ordered`,
    /// with its 1-based number.
    BulletList {
        items: Vec<String>,
        #[serde(default)]
        ordered: bool,
    },

    /// A shaded panel of label/value rows.
    KeyValuePanel { rows: Vec<(String, String)> },

    /// A data table. The only block that may span pages.
    Table {
        columns: Vec<ColumnSpec>,
        rows: Vec<Vec<String>>,
    },

    /// Start a fresh page.
    SectionBreak,
}

impl ContentBlock {
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        ContentBlock::Heading {
            text: text.into(),
            level,
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph { text: text.into() }
    }

    pub fn note(text: impl Into<String>) -> Self {
        ContentBlock::Note { text: text.into() }
    }

    pub fn bullets<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContentBlock::BulletList {
            items: items.into_iter().map(Into::into).collect(),
            ordered: false,
        }
    }

    pub fn numbered<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContentBlock::BulletList {
            items: items.into_iter().map(Into::into).collect(),
            ordered: true,
        }
    }

    pub fn key_values<I, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ContentBlock::KeyValuePanel {
            rows: rows.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn table(columns: Vec<ColumnSpec>, rows: Vec<Vec<String>>) -> Self {
        ContentBlock::Table { columns, rows }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Heading { .. } => BlockKind::Heading,
            ContentBlock::Paragraph { .. } => BlockKind::Paragraph,
            ContentBlock::Note { .. } => BlockKind::Note,
            ContentBlock::BulletList { .. } => BlockKind::BulletList,
            ContentBlock::KeyValuePanel { .. } => BlockKind::KeyValuePanel,
            ContentBlock::Table { .. } => BlockKind::Table,
            ContentBlock::SectionBreak => BlockKind::SectionBreak,
        }
    }

    /// Can the flow controller place part of this block on one page and the
    /// rest on the next?
    pub fn is_splittable(&self) -> bool {
        matches!(self, ContentBlock::Table { .. })
    }
}

/// Discriminant of [`ContentBlock`], recorded on every placed block group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Heading,
    Paragraph,
    Note,
    BulletList,
    KeyValuePanel,
    Table,
    SectionBreak,
}

/// Column definition for tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub header: String,
    /// Relative share of the table width.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl ColumnSpec {
    pub fn new(header: impl Into<String>, weight: f64) -> Self {
        Self {
            header: header.into(),
            weight,
        }
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Typography for one heading level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingPreset {
    pub font_size: f64,
    pub spacing_before: f64,
    pub spacing_after: f64,
    /// Text color. Defaults to the palette's text color.
    #[serde(default)]
    pub color: Option<Color>,
    /// Full-width banner drawn behind the heading.
    #[serde(default)]
    pub fill: Option<Color>,
}

impl HeadingPreset {
    pub fn new(font_size: f64, spacing_before: f64, spacing_after: f64) -> Self {
        Self {
            font_size,
            spacing_before,
            spacing_after,
            color: None,
            fill: None,
        }
    }

    pub fn with_banner(mut self, fill: Color, color: Color) -> Self {
        self.fill = Some(fill);
        self.color = Some(color);
        self
    }
}

/// Page geometry and typography for one composition pass.
///
/// All lengths are in points (1/72 inch). Every field has a default, so a
/// JSON config only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    /// Uniform margin on all four edges.
    pub margin: f64,
    /// Heading typography by level. Kept ordered so lookups are stable.
    pub heading_level_presets: BTreeMap<u8, HeadingPreset>,
    /// Shade every other body row of a table.
    pub table_alternate_row_shading: bool,

    pub body_font_size: f64,
    pub note_font_size: f64,
    pub table_font_size: f64,
    /// Line height multiplier for all text.
    pub line_height: f64,
    /// Trailing space after every placed block.
    pub block_spacing: f64,
    /// Horizontal offset of list item text from the marker.
    pub list_indent: f64,
    pub list_item_gap: f64,
    /// Inner padding of panels and heading banners.
    pub panel_padding: f64,
    /// Share of the panel width given to the label column.
    pub kv_label_fraction: f64,
    pub cell_padding: f64,
    pub palette: Palette,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::for_page_size(PageSize::A4)
    }
}

impl LayoutConfig {
    pub fn for_page_size(size: PageSize) -> Self {
        let (page_width, page_height) = size.dimensions();
        let palette = Palette::default();
        Self {
            page_width,
            page_height,
            margin: 54.0, // ~0.75 inch
            heading_level_presets: default_heading_presets(&palette),
            table_alternate_row_shading: true,
            body_font_size: 10.0,
            note_font_size: 9.0,
            table_font_size: 9.0,
            line_height: 1.2,
            block_spacing: 8.0,
            list_indent: 12.0,
            list_item_gap: 2.0,
            panel_padding: 8.0,
            kv_label_fraction: 0.35,
            cell_padding: 4.0,
            palette,
        }
    }

    /// Parse a (possibly partial) configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f64 {
        self.page_height - 2.0 * self.margin
    }

    /// Reject settings that cannot produce a layout. Runs before any block
    /// is measured.
    pub fn validate(&self) -> Result<()> {
        positive("pageWidth", self.page_width)?;
        positive("pageHeight", self.page_height)?;
        positive("margin", self.margin)?;
        if self.content_width() <= 0.0 {
            return Err(invalid(format!(
                "content width {} is not positive (pageWidth {} with margin {})",
                self.content_width(),
                self.page_width,
                self.margin
            )));
        }
        if self.content_height() <= 0.0 {
            return Err(invalid(format!(
                "content height {} is not positive (pageHeight {} with margin {})",
                self.content_height(),
                self.page_height,
                self.margin
            )));
        }
        positive("bodyFontSize", self.body_font_size)?;
        positive("noteFontSize", self.note_font_size)?;
        positive("tableFontSize", self.table_font_size)?;
        positive("lineHeight", self.line_height)?;
        non_negative("blockSpacing", self.block_spacing)?;
        non_negative("listItemGap", self.list_item_gap)?;
        non_negative("listIndent", self.list_indent)?;
        non_negative("panelPadding", self.panel_padding)?;
        non_negative("cellPadding", self.cell_padding)?;
        if !(self.kv_label_fraction > 0.0 && self.kv_label_fraction < 1.0) {
            return Err(invalid(format!(
                "kvLabelFraction must be between 0 and 1, got {}",
                self.kv_label_fraction
            )));
        }
        if self.list_indent >= self.content_width() {
            return Err(invalid("listIndent leaves no room for list text".to_string()));
        }
        if 2.0 * self.panel_padding >= self.content_width() {
            return Err(invalid("panelPadding leaves no room for panel text".to_string()));
        }
        for (level, preset) in &self.heading_level_presets {
            positive(&format!("headingLevelPresets[{}].fontSize", level), preset.font_size)?;
            non_negative(
                &format!("headingLevelPresets[{}].spacingBefore", level),
                preset.spacing_before,
            )?;
            non_negative(
                &format!("headingLevelPresets[{}].spacingAfter", level),
                preset.spacing_after,
            )?;
        }
        Ok(())
    }

    /// Preset for a heading level: the configured level itself, else the
    /// nearest configured level with a smaller number, else the smallest
    /// configured level.
    pub fn heading_preset(&self, level: u8) -> HeadingPreset {
        self.heading_level_presets
            .range(..=level)
            .next_back()
            .or_else(|| self.heading_level_presets.iter().next())
            .map(|(_, preset)| *preset)
            .unwrap_or_else(|| HeadingPreset::new(self.body_font_size * 1.4, 6.0, 4.0))
    }

    pub fn heading_style(&self, preset: &HeadingPreset) -> TextStyle {
        TextStyle::new(preset.font_size)
            .bold()
            .with_color(preset.color.unwrap_or(self.palette.text))
            .with_line_height(self.line_height)
    }

    pub fn body_style(&self) -> TextStyle {
        TextStyle::new(self.body_font_size)
            .with_color(self.palette.text)
            .with_line_height(self.line_height)
    }

    pub fn note_style(&self) -> TextStyle {
        TextStyle::new(self.note_font_size)
            .with_color(self.palette.muted)
            .with_line_height(self.line_height)
    }

    pub fn table_style(&self) -> TextStyle {
        TextStyle::new(self.table_font_size)
            .with_color(self.palette.text)
            .with_line_height(self.line_height)
    }

    pub fn table_header_style(&self) -> TextStyle {
        TextStyle::new(self.table_font_size)
            .bold()
            .with_color(Color::WHITE)
            .with_line_height(self.line_height)
    }
}

fn default_heading_presets(palette: &Palette) -> BTreeMap<u8, HeadingPreset> {
    let mut presets = BTreeMap::new();
    presets.insert(
        1,
        HeadingPreset::new(24.0, 0.0, 10.0).with_banner(palette.primary, Color::WHITE),
    );
    presets.insert(
        2,
        HeadingPreset::new(16.0, 0.0, 8.0).with_banner(palette.primary, Color::WHITE),
    );
    let mut h3 = HeadingPreset::new(11.0, 6.0, 4.0);
    h3.color = Some(palette.accent);
    presets.insert(3, h3);
    presets
}

fn invalid(msg: String) -> QuireError {
    QuireError::InvalidConfiguration(msg)
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be positive, got {}", name, value)))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must not be negative, got {}", name, value)))
    }
}
