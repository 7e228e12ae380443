//! # Page-Aware Flow Layout
//!
//! This is the heart of Quire.
//!
//! The engine never lays content out on an unbounded canvas and slices it
//! afterwards. It walks the block stream with a cursor on a page of known
//! size and, before placing anything, asks whether it fits:
//!
//! 1. Open a page with known dimensions and remaining space
//! 2. Measure the next block against the content width
//! 3. If it fits: render it at the cursor and advance the cursor
//! 4. If it doesn't fit: close the page, open a fresh one and retry there
//! 5. If it doesn't fit even on a fresh page: place it anyway, mark the
//!    page as overflowed and report a [`ContentOverflowWarning`]
//! 6. Tables split between rows and repeat their header row on every page
//!
//! Every block type goes through the same loop, so nothing can be drawn
//! past the bottom margin without a warning saying so.

pub mod blocks;
pub mod page_break;
pub mod table;

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::error::Result;
use crate::model::{BlockKind, ContentBlock, LayoutConfig};
use crate::style::{Color, TextStyle};
use crate::text::{StandardMetrics, TextMeasure};

use blocks::Rendered;
use page_break::{decide_break, BreakDecision, FIT_EPSILON};

/// A finished, paginated document. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the laid-out pages for a rendering backend.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A fully laid-out page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub index: usize,
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Draw commands in paint order.
    pub commands: Vec<DrawCommand>,
    /// Which commands belong to which input block.
    pub groups: Vec<BlockGroup>,
    /// Vertical space consumed below the top margin, including block spacing.
    pub used_height: f64,
    /// Content on this page runs past the bottom margin.
    pub overflowed: bool,
}

impl Page {
    pub fn content_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    /// Commands of one placed group.
    pub fn group_commands(&self, group: &BlockGroup) -> &[DrawCommand] {
        &self.commands[group.commands.clone()]
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// The commands one block (or one table segment) produced on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockGroup {
    /// Index of the section the block came from.
    pub section: usize,
    /// Index of the block within its section.
    pub block: usize,
    pub kind: BlockKind,
    /// Range into [`Page::commands`].
    pub commands: Range<usize>,
    /// Absolute y of the group's top edge.
    pub top: f64,
    pub height: f64,
    /// Body rows of a table segment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Range<usize>>,
}

/// What to draw. Coordinates are absolute page points, origin at the top-left
/// corner, y growing downwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DrawCommand {
    /// Wrapped lines of text; line `i` has its top edge at
    /// `y + i * line_height`.
    Text {
        x: f64,
        y: f64,
        lines: Vec<String>,
        style: TextStyle,
        #[serde(rename = "lineHeight")]
        line_height: f64,
    },
    /// A filled and/or stroked rectangle.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        fill: Option<Color>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stroke: Option<Color>,
    },
    /// Grid lines of a table segment. Boundaries are absolute coordinates,
    /// first to last, so `n` columns have `n + 1` column boundaries.
    TableGrid {
        x: f64,
        y: f64,
        #[serde(rename = "columnBoundaries")]
        column_boundaries: Vec<f64>,
        #[serde(rename = "rowBoundaries")]
        row_boundaries: Vec<f64>,
        stroke: Color,
    },
}

impl DrawCommand {
    pub fn top(&self) -> f64 {
        match self {
            DrawCommand::Text { y, .. }
            | DrawCommand::Rect { y, .. }
            | DrawCommand::TableGrid { y, .. } => *y,
        }
    }

    pub fn bottom(&self) -> f64 {
        match self {
            DrawCommand::Text {
                y,
                lines,
                line_height,
                ..
            } => y + lines.len() as f64 * line_height,
            DrawCommand::Rect { y, height, .. } => y + height,
            DrawCommand::TableGrid {
                y, row_boundaries, ..
            } => row_boundaries.last().copied().unwrap_or(*y),
        }
    }

    pub fn left(&self) -> f64 {
        match self {
            DrawCommand::Text { x, .. }
            | DrawCommand::Rect { x, .. }
            | DrawCommand::TableGrid { x, .. } => *x,
        }
    }

    /// Right edge, where the command carries one. Text extent depends on the
    /// backend's font, so it has none here.
    pub fn right(&self) -> Option<f64> {
        match self {
            DrawCommand::Text { .. } => None,
            DrawCommand::Rect { x, width, .. } => Some(x + width),
            DrawCommand::TableGrid {
                column_boundaries, ..
            } => column_boundaries.last().copied(),
        }
    }
}

/// A block or table row taller than a whole page. Composition still
/// completes; the content is placed on its own page and runs past the bottom
/// margin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentOverflowWarning {
    pub page: usize,
    pub section: usize,
    pub block: usize,
    pub kind: BlockKind,
    /// Body row index when the oversized content is a table row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub required_height: f64,
    pub available_height: f64,
}

impl fmt::Display for ContentOverflowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} block {} of section {}",
            self.kind, self.block, self.section
        )?;
        if let Some(row) = self.row {
            write!(f, " (row {})", row)?;
        }
        write!(
            f,
            " needs {:.1}pt but a page holds {:.1}pt; placed on page {} with overflow",
            self.required_height,
            self.available_height,
            self.page + 1
        )
    }
}

/// Pages plus the overflow warnings raised while producing them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    pub document: Document,
    pub warnings: Vec<ContentOverflowWarning>,
}

/// A block tagged with where it came from.
#[derive(Debug, Clone, Copy)]
pub struct FlowItem<'a> {
    pub section: usize,
    pub block: usize,
    pub content: &'a ContentBlock,
}

/// The main layout engine.
pub struct LayoutEngine {
    config: LayoutConfig,
    metrics: Box<dyn TextMeasure + Send + Sync>,
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Tracks where we are on the current page during layout.
#[derive(Debug, Clone)]
struct PageCursor {
    page_index: usize,
    page_width: f64,
    page_height: f64,
    margin: f64,
    content_x: f64,
    content_y: f64,
    content_width: f64,
    content_height: f64,
    /// Offset below the top of the content area.
    y: f64,
    commands: Vec<DrawCommand>,
    groups: Vec<BlockGroup>,
    overflowed: bool,
}

impl PageCursor {
    fn new(config: &LayoutConfig, page_index: usize) -> Self {
        Self {
            page_index,
            page_width: config.page_width,
            page_height: config.page_height,
            margin: config.margin,
            content_x: config.margin,
            content_y: config.margin,
            content_width: config.content_width(),
            content_height: config.content_height(),
            y: 0.0,
            commands: Vec::new(),
            groups: Vec::new(),
            overflowed: false,
        }
    }

    fn remaining_height(&self) -> f64 {
        (self.content_height - self.y).max(0.0)
    }

    /// Nothing has been placed on this page yet.
    fn is_fresh(&self) -> bool {
        self.groups.is_empty()
    }

    /// Absolute y of the cursor.
    fn abs_y(&self) -> f64 {
        self.content_y + self.y
    }

    /// Append rendered content as one group and advance past it.
    fn push_group(&mut self, item: &FlowItem<'_>, rendered: Rendered, rows: Option<Range<usize>>) {
        let start = self.commands.len();
        self.commands.extend(rendered.commands);
        self.groups.push(BlockGroup {
            section: item.section,
            block: item.block,
            kind: item.content.kind(),
            commands: start..self.commands.len(),
            top: self.abs_y(),
            height: rendered.height,
            rows,
        });
        self.y += rendered.height;
        if self.y > self.content_height + FIT_EPSILON {
            self.overflowed = true;
        }
    }

    /// Trailing space after a block. Never pushes a page that has room past
    /// its bottom margin.
    fn advance_spacing(&mut self, spacing: f64) {
        if self.overflowed {
            return;
        }
        self.y = (self.y + spacing).min(self.content_height);
    }

    fn finalize(self) -> Page {
        Page {
            index: self.page_index,
            width: self.page_width,
            height: self.page_height,
            margin: self.margin,
            commands: self.commands,
            groups: self.groups,
            used_height: self.y,
            overflowed: self.overflowed,
        }
    }
}

/// States of one composition pass.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FlowState {
    /// Try to place item `n` on the current page.
    Placing(usize),
    /// Close the page, then continue with item `n` (the one that did not
    /// fit, or the one after a section break).
    PageFull(usize),
    Done,
}

/// Mutable state of one pass. Lives only inside [`LayoutEngine::flow`].
struct Flow<'e> {
    engine: &'e LayoutEngine,
    cursor: PageCursor,
    pages: Vec<Page>,
    warnings: Vec<ContentOverflowWarning>,
}

impl<'e> Flow<'e> {
    fn new(engine: &'e LayoutEngine) -> Self {
        Self {
            engine,
            cursor: PageCursor::new(&engine.config, 0),
            pages: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn break_page(&mut self) {
        let next = PageCursor::new(&self.engine.config, self.cursor.page_index + 1);
        let full = std::mem::replace(&mut self.cursor, next);
        log::debug!(
            "Closing page {} at y={:.1} ({} groups)",
            full.page_index + 1,
            full.y,
            full.groups.len()
        );
        self.pages.push(full.finalize());
    }

    fn warn_overflow(&mut self, item: &FlowItem<'_>, row: Option<usize>, required_height: f64) {
        let warning = ContentOverflowWarning {
            page: self.cursor.page_index,
            section: item.section,
            block: item.block,
            kind: item.content.kind(),
            row,
            required_height,
            available_height: self.cursor.content_height,
        };
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// One transition from `Placing(n)`.
    fn step(&mut self, items: &[FlowItem<'_>], index: usize) -> Result<FlowState> {
        let item = items[index];
        let next = if index + 1 < items.len() {
            FlowState::Placing(index + 1)
        } else {
            FlowState::Done
        };

        match item.content {
            ContentBlock::SectionBreak => {
                if self.cursor.is_fresh() {
                    return Ok(next);
                }
                log::debug!(
                    "Section break at section {} block {}",
                    item.section,
                    item.block
                );
                return Ok(FlowState::PageFull(index + 1));
            }
            _ if item.content.is_splittable() => {
                self.place_table(&item)?;
                return Ok(next);
            }
            _ => {}
        }

        let engine = self.engine;
        let width = self.cursor.content_width;
        let required = item
            .content
            .required_height(&engine.config, engine.metrics.as_ref(), width)?;
        if required <= 0.0 {
            log::debug!("Nothing to place for {:?} block {}", item.content.kind(), item.block);
            return Ok(next);
        }

        match decide_break(
            self.cursor.remaining_height(),
            &[required],
            false,
            self.cursor.is_fresh(),
            0,
        ) {
            BreakDecision::MoveToNextPage => {
                log::debug!(
                    "{:?} block {} needs {:.1}pt, {:.1}pt left on page {}",
                    item.content.kind(),
                    item.block,
                    required,
                    self.cursor.remaining_height(),
                    self.cursor.page_index + 1
                );
                Ok(FlowState::PageFull(index))
            }
            decision => {
                if decision == BreakDecision::Overflow {
                    self.warn_overflow(&item, None, required);
                }
                let rendered = item.content.render(
                    &engine.config,
                    engine.metrics.as_ref(),
                    self.cursor.content_x,
                    self.cursor.abs_y(),
                    width,
                )?;
                self.cursor.push_group(&item, rendered, None);
                self.cursor.advance_spacing(engine.config.block_spacing);
                Ok(next)
            }
        }
    }

    fn finish(mut self) -> (Vec<Page>, Vec<ContentOverflowWarning>) {
        if !self.cursor.is_fresh() || self.pages.is_empty() {
            self.pages.push(self.cursor.finalize());
        }
        (self.pages, self.warnings)
    }
}

impl LayoutEngine {
    /// Engine with the built-in Helvetica metrics.
    pub fn new(config: LayoutConfig) -> Result<Self> {
        Self::with_metrics(config, StandardMetrics)
    }

    /// Engine measuring text with `metrics`. Fails if `config` cannot
    /// produce a layout.
    pub fn with_metrics<M>(config: LayoutConfig, metrics: M) -> Result<Self>
    where
        M: TextMeasure + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Self {
            config,
            metrics: Box::new(metrics),
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn metrics(&self) -> &dyn TextMeasure {
        self.metrics.as_ref()
    }

    /// Lay out a flat block stream as section 0.
    pub fn layout(&self, blocks: &[ContentBlock]) -> Result<Composition> {
        let items: Vec<FlowItem<'_>> = blocks
            .iter()
            .enumerate()
            .map(|(block, content)| FlowItem {
                section: 0,
                block,
                content,
            })
            .collect();
        self.flow(&items)
    }

    /// Run one composition pass over `items`.
    pub fn flow(&self, items: &[FlowItem<'_>]) -> Result<Composition> {
        let mut flow = Flow::new(self);
        let mut state = if items.is_empty() {
            FlowState::Done
        } else {
            FlowState::Placing(0)
        };

        loop {
            state = match state {
                FlowState::Placing(index) => flow.step(items, index)?,
                FlowState::PageFull(index) => {
                    flow.break_page();
                    if index < items.len() {
                        FlowState::Placing(index)
                    } else {
                        FlowState::Done
                    }
                }
                FlowState::Done => break,
            };
        }

        let (pages, warnings) = flow.finish();
        Ok(Composition {
            document: Document { pages },
            warnings,
        })
    }
}
