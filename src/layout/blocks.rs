//! Measuring and rendering of individual blocks.
//!
//! `required_height` and `render` share one code path: the height a block
//! asks for is exactly the height its draw commands consume, so planning and
//! rendering cannot disagree.

use crate::error::Result;
use crate::model::{ContentBlock, LayoutConfig};
use crate::style::TextStyle;
use crate::text::TextMeasure;

use super::table::TableLayout;
use super::DrawCommand;

/// Draw commands for one block plus the vertical space they consume.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rendered {
    pub commands: Vec<DrawCommand>,
    pub height: f64,
}

impl ContentBlock {
    /// Height this block needs at `content_width`.
    ///
    /// For tables this is the height of the whole table with one header row.
    /// It only serves the "fits entirely" check; the splitter sizes tables
    /// row by row.
    pub fn required_height(
        &self,
        config: &LayoutConfig,
        metrics: &dyn TextMeasure,
        content_width: f64,
    ) -> Result<f64> {
        match self {
            ContentBlock::SectionBreak => Ok(0.0),
            ContentBlock::Table { columns, .. } if columns.is_empty() => Ok(0.0),
            ContentBlock::Table { columns, rows } => {
                let table = TableLayout::measure(config, metrics, columns, rows, content_width)?;
                Ok(table.total_height())
            }
            _ => Ok(self.render(config, metrics, 0.0, 0.0, content_width)?.height),
        }
    }

    /// Render this block with its top-left corner at (`x`, `y`).
    pub fn render(
        &self,
        config: &LayoutConfig,
        metrics: &dyn TextMeasure,
        x: f64,
        y: f64,
        content_width: f64,
    ) -> Result<Rendered> {
        match self {
            ContentBlock::Heading { text, level } => {
                render_heading(config, metrics, text, *level, x, y, content_width)
            }
            ContentBlock::Paragraph { text } => {
                render_text(metrics, text, config.body_style(), x, y, content_width)
            }
            ContentBlock::Note { text } => {
                render_text(metrics, text, config.note_style(), x, y, content_width)
            }
            ContentBlock::BulletList { items, ordered } => {
                render_list(config, metrics, items, *ordered, x, y, content_width)
            }
            ContentBlock::KeyValuePanel { rows } => {
                render_key_values(config, metrics, rows, x, y, content_width)
            }
            ContentBlock::Table { columns, .. } if columns.is_empty() => Ok(Rendered::default()),
            ContentBlock::Table { columns, rows } => {
                let table = TableLayout::measure(config, metrics, columns, rows, content_width)?;
                Ok(table.render_segment(config, 0..rows.len(), x, y))
            }
            ContentBlock::SectionBreak => Ok(Rendered::default()),
        }
    }
}

fn render_text(
    metrics: &dyn TextMeasure,
    text: &str,
    style: TextStyle,
    x: f64,
    y: f64,
    width: f64,
) -> Result<Rendered> {
    let measured = metrics.measure(text, &style, width)?;
    Ok(Rendered {
        height: measured.total_height,
        commands: vec![DrawCommand::Text {
            x,
            y,
            lines: measured.lines,
            style,
            line_height: measured.line_height,
        }],
    })
}

fn render_heading(
    config: &LayoutConfig,
    metrics: &dyn TextMeasure,
    text: &str,
    level: u8,
    x: f64,
    y: f64,
    width: f64,
) -> Result<Rendered> {
    let preset = config.heading_preset(level);
    let style = config.heading_style(&preset);
    let pad = if preset.fill.is_some() {
        config.panel_padding
    } else {
        0.0
    };

    let measured = metrics.measure(text, &style, width - 2.0 * pad)?;
    let box_height = measured.total_height + 2.0 * pad;
    let top = y + preset.spacing_before;

    let mut commands = Vec::with_capacity(2);
    if let Some(fill) = preset.fill {
        commands.push(DrawCommand::Rect {
            x,
            y: top,
            width,
            height: box_height,
            fill: Some(fill),
            stroke: None,
        });
    }
    commands.push(DrawCommand::Text {
        x: x + pad,
        y: top + pad,
        lines: measured.lines,
        style,
        line_height: measured.line_height,
    });

    Ok(Rendered {
        commands,
        height: preset.spacing_before + box_height + preset.spacing_after,
    })
}

fn render_list(
    config: &LayoutConfig,
    metrics: &dyn TextMeasure,
    items: &[String],
    ordered: bool,
    x: f64,
    y: f64,
    width: f64,
) -> Result<Rendered> {
    let style = config.body_style();
    let markers: Vec<String> = (1..=items.len())
        .map(|n| {
            if ordered {
                format!("{}.", n)
            } else {
                "\u{2022}".to_string()
            }
        })
        .collect();

    // Long numbered lists ("10.", "100.") push the text column right so no
    // marker runs into its item. Capped at half the width.
    let widest = markers
        .iter()
        .map(|m| metrics.text_width(m, &style))
        .fold(0.0, f64::max);
    let indent = (widest + metrics.char_width(' ', &style))
        .min(width * 0.5)
        .max(config.list_indent);
    let text_x = x + indent;
    let text_width = width - indent;

    let mut commands = Vec::with_capacity(items.len() * 2);
    let mut offset = 0.0;
    for (i, (item, marker)) in items.iter().zip(markers).enumerate() {
        if i > 0 {
            offset += config.list_item_gap;
        }
        let measured = metrics.measure(item, &style, text_width)?;
        commands.push(DrawCommand::Text {
            x,
            y: y + offset,
            lines: vec![marker],
            style,
            line_height: measured.line_height,
        });
        commands.push(DrawCommand::Text {
            x: text_x,
            y: y + offset,
            lines: measured.lines,
            style,
            line_height: measured.line_height,
        });
        offset += measured.total_height;
    }

    Ok(Rendered {
        commands,
        height: offset,
    })
}

fn render_key_values(
    config: &LayoutConfig,
    metrics: &dyn TextMeasure,
    rows: &[(String, String)],
    x: f64,
    y: f64,
    width: f64,
) -> Result<Rendered> {
    if rows.is_empty() {
        return Ok(Rendered::default());
    }

    let pad = config.panel_padding;
    let inner_width = width - 2.0 * pad;
    let label_width = inner_width * config.kv_label_fraction;
    let value_width = inner_width - label_width;
    let value_style = config.body_style();
    let label_style = value_style.bold();

    // Background goes first so text paints over it; its height is patched
    // once the rows are measured.
    let mut commands = vec![DrawCommand::Rect {
        x,
        y,
        width,
        height: 0.0,
        fill: Some(config.palette.light),
        stroke: Some(config.palette.accent),
    }];

    let mut offset = pad;
    for (i, (label, value)) in rows.iter().enumerate() {
        if i > 0 {
            offset += config.list_item_gap;
        }
        let label_text = metrics.measure(label, &label_style, label_width)?;
        let value_text = metrics.measure(value, &value_style, value_width)?;
        let row_height = label_text.total_height.max(value_text.total_height);

        commands.push(DrawCommand::Text {
            x: x + pad,
            y: y + offset,
            lines: label_text.lines,
            style: label_style,
            line_height: label_text.line_height,
        });
        commands.push(DrawCommand::Text {
            x: x + pad + label_width,
            y: y + offset,
            lines: value_text.lines,
            style: value_style,
            line_height: value_text.line_height,
        });
        offset += row_height;
    }

    let height = offset + pad;
    if let Some(DrawCommand::Rect { height: h, .. }) = commands.first_mut() {
        *h = height;
    }

    Ok(Rendered { commands, height })
}
