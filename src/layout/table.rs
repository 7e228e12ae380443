//! # Table Flow
//!
//! Tables are the one block that may span pages. The splitter:
//!
//! 1. Resolves column widths once, from the column weights, and keeps them
//!    for every page the table touches
//! 2. Measures the header row and every body row at those widths
//! 3. Fills each page with as many whole rows as fit, closes the page, and
//!    repeats the header row at the top of the next one
//!
//! A row is never split. A row too tall for a fresh page is placed alone
//! under its header and reported as an overflow.

use std::ops::Range;

use crate::error::Result;
use crate::model::{ColumnSpec, ContentBlock, LayoutConfig};
use crate::style::{Color, TextStyle};
use crate::text::{MeasuredText, TextMeasure};

use super::blocks::Rendered;
use super::page_break::{decide_break, BreakDecision};
use super::{DrawCommand, Flow, FlowItem};

/// Narrowest width cell text is wrapped against. Columns narrower than their
/// padding still get their text, overflowing the cell instead of failing.
const MIN_CELL_TEXT_WIDTH: f64 = 1.0;

/// Split `available_width` between columns in proportion to their weights.
///
/// Non-finite and negative weights count as zero. If no column has a
/// positive weight the width is shared evenly.
pub fn resolve_column_widths(columns: &[ColumnSpec], available_width: f64) -> Vec<f64> {
    if columns.is_empty() {
        return Vec::new();
    }

    let weights: Vec<f64> = columns
        .iter()
        .map(|c| {
            if c.weight.is_finite() && c.weight > 0.0 {
                c.weight
            } else {
                0.0
            }
        })
        .collect();
    let total: f64 = weights.iter().sum();

    if total <= 0.0 {
        return vec![available_width / columns.len() as f64; columns.len()];
    }

    weights
        .iter()
        .map(|w| available_width * (w / total))
        .collect()
}

struct RowLayout {
    cells: Vec<MeasuredText>,
    height: f64,
}

/// Measure one row. Missing trailing cells are empty; extra cells are
/// ignored.
fn measure_row<'a>(
    metrics: &dyn TextMeasure,
    widths: &[f64],
    pad: f64,
    mut texts: impl Iterator<Item = &'a str>,
    style: &TextStyle,
) -> Result<RowLayout> {
    let mut cells = Vec::with_capacity(widths.len());
    let mut tallest: f64 = 0.0;
    for &width in widths {
        let text = texts.next().unwrap_or("");
        let inner = (width - 2.0 * pad).max(MIN_CELL_TEXT_WIDTH);
        let measured = metrics.measure(text, style, inner)?;
        tallest = tallest.max(measured.total_height);
        cells.push(measured);
    }
    Ok(RowLayout {
        cells,
        height: tallest + 2.0 * pad,
    })
}

/// A table measured against a fixed content width.
pub struct TableLayout {
    widths: Vec<f64>,
    header: RowLayout,
    body: Vec<RowLayout>,
    cell_padding: f64,
    alternate_shading: bool,
    header_fill: Color,
    shade_fill: Color,
    rule: Color,
}

impl TableLayout {
    pub fn measure(
        config: &LayoutConfig,
        metrics: &dyn TextMeasure,
        columns: &[ColumnSpec],
        rows: &[Vec<String>],
        content_width: f64,
    ) -> Result<Self> {
        let widths = resolve_column_widths(columns, content_width);
        let pad = config.cell_padding;

        let header = measure_row(
            metrics,
            &widths,
            pad,
            columns.iter().map(|c| c.header.as_str()),
            &config.table_header_style(),
        )?;
        let body_style = config.table_style();
        let body = rows
            .iter()
            .map(|row| measure_row(metrics, &widths, pad, row.iter().map(String::as_str), &body_style))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            widths,
            header,
            body,
            cell_padding: pad,
            alternate_shading: config.table_alternate_row_shading,
            header_fill: config.palette.header_fill,
            shade_fill: config.palette.light,
            rule: config.palette.rule,
        })
    }

    pub fn column_widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn header_height(&self) -> f64 {
        self.header.height
    }

    pub fn row_height(&self, row: usize) -> f64 {
        self.body[row].height
    }

    /// One header plus every body row.
    pub fn total_height(&self) -> f64 {
        self.header.height + self.body.iter().map(|r| r.height).sum::<f64>()
    }

    /// Heights of the rows still to place, starting at `next`, with the
    /// repeated header folded into the first one so a header never ends up
    /// alone at the bottom of a page.
    fn pending_heights(&self, next: usize) -> Vec<f64> {
        if next >= self.body.len() {
            return vec![self.header.height];
        }
        let mut heights: Vec<f64> = self.body[next..].iter().map(|r| r.height).collect();
        heights[0] += self.header.height;
        heights
    }

    /// Draw commands for the header plus body rows `rows`, top-left corner at
    /// (`x`, `y`).
    pub fn render_segment(
        &self,
        config: &LayoutConfig,
        rows: Range<usize>,
        x: f64,
        y: f64,
    ) -> Rendered {
        let header_style = config.table_header_style();
        let body_style = config.table_style();
        let total_width: f64 = self.widths.iter().sum();

        let mut column_boundaries = Vec::with_capacity(self.widths.len() + 1);
        let mut col_offset = 0.0;
        column_boundaries.push(x);
        for w in &self.widths {
            col_offset += w;
            column_boundaries.push(x + col_offset);
        }

        let mut row_offsets = Vec::with_capacity(rows.len() + 2);
        let mut offset = 0.0;
        row_offsets.push(offset);
        offset += self.header.height;
        row_offsets.push(offset);
        for row in rows.clone() {
            offset += self.body[row].height;
            row_offsets.push(offset);
        }

        let mut commands = Vec::new();
        commands.push(DrawCommand::Rect {
            x,
            y,
            width: total_width,
            height: self.header.height,
            fill: Some(self.header_fill),
            stroke: None,
        });
        if self.alternate_shading {
            for (i, row) in rows.clone().enumerate() {
                if row % 2 == 1 {
                    commands.push(DrawCommand::Rect {
                        x,
                        y: y + row_offsets[i + 1],
                        width: total_width,
                        height: self.body[row].height,
                        fill: Some(self.shade_fill),
                        stroke: None,
                    });
                }
            }
        }
        commands.push(DrawCommand::TableGrid {
            x,
            y,
            column_boundaries: column_boundaries.clone(),
            row_boundaries: row_offsets.iter().map(|o| y + o).collect(),
            stroke: self.rule,
        });

        self.push_cells(&mut commands, &self.header, &column_boundaries, y, header_style);
        for (i, row) in rows.enumerate() {
            let top = y + row_offsets[i + 1];
            self.push_cells(&mut commands, &self.body[row], &column_boundaries, top, body_style);
        }

        Rendered {
            commands,
            height: offset,
        }
    }

    fn push_cells(
        &self,
        commands: &mut Vec<DrawCommand>,
        row: &RowLayout,
        column_boundaries: &[f64],
        top: f64,
        style: TextStyle,
    ) {
        for (col, cell) in row.cells.iter().enumerate() {
            if cell.lines.iter().all(|l| l.is_empty()) {
                continue;
            }
            commands.push(DrawCommand::Text {
                x: column_boundaries[col] + self.cell_padding,
                y: top + self.cell_padding,
                lines: cell.lines.clone(),
                style,
                line_height: cell.line_height,
            });
        }
    }
}

impl Flow<'_> {
    /// Place a table, splitting it between rows across as many pages as it
    /// needs.
    pub(super) fn place_table(&mut self, item: &FlowItem<'_>) -> Result<()> {
        let ContentBlock::Table { columns, rows } = item.content else {
            return Ok(());
        };
        if columns.is_empty() {
            log::debug!("Table block {} has no columns, skipping", item.block);
            return Ok(());
        }

        let engine = self.engine;
        let config = &engine.config;
        let table = TableLayout::measure(
            config,
            engine.metrics.as_ref(),
            columns,
            rows,
            self.cursor.content_width,
        )?;

        let mut next = 0;
        loop {
            let heights = table.pending_heights(next);
            let decision = decide_break(
                self.cursor.remaining_height(),
                &heights,
                true,
                self.cursor.is_fresh(),
                1,
            );
            let end = match decision {
                BreakDecision::Place => rows.len(),
                BreakDecision::Split {
                    items_on_current_page,
                } => next + items_on_current_page,
                BreakDecision::Overflow => {
                    let row = (next < rows.len()).then_some(next);
                    self.warn_overflow(item, row, heights[0]);
                    (next + 1).min(rows.len())
                }
                BreakDecision::MoveToNextPage => {
                    log::debug!(
                        "Table block {} row {} does not fit on page {}",
                        item.block,
                        next,
                        self.cursor.page_index + 1
                    );
                    self.break_page();
                    continue;
                }
            };

            let rendered = table.render_segment(
                config,
                next..end,
                self.cursor.content_x,
                self.cursor.abs_y(),
            );
            log::debug!(
                "Table block {}: rows {}..{} on page {}",
                item.block,
                next,
                end,
                self.cursor.page_index + 1
            );
            self.cursor.push_group(item, rendered, Some(next..end));
            next = end;

            if next >= rows.len() {
                self.cursor.advance_spacing(config.block_spacing);
                return Ok(());
            }
            self.break_page();
        }
    }
}
