//! # Quire
//!
//! A report composition engine.
//!
//! Quire takes report content (headings, narrative paragraphs, bulleted
//! lists, key/value panels and data tables) and flows it into fixed-size
//! pages. Every placement is decided against the page boundary: blocks that
//! don't fit move to the next page whole, tables split between rows and
//! repeat their header, and anything taller than a page is still placed but
//! reported as a [`ContentOverflowWarning`].
//!
//! The output is a [`Document`] of positioned draw commands. Turning those
//! into PDF, SVG or pixels is left to a rendering backend.
//!
//! ## Architecture
//!
//! ```text
//! Sections (Rust values or JSON)
//!       ↓
//!   [report]   Section descriptors → content blocks
//!       ↓
//!   [model]    Blocks, layout configuration
//!       ↓
//!   [text]     Line wrapping against a width (built-in or [font] metrics)
//!       ↓
//!   [layout]   Page-aware flow, table splitting
//!       ↓
//! Document { pages: [draw commands] } + warnings
//! ```

pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod report;
pub mod style;
pub mod text;

pub use error::{QuireError, Result};
pub use layout::{
    BlockGroup, Composition, ContentOverflowWarning, Document, DrawCommand, FlowItem,
    LayoutEngine, Page,
};
pub use model::{BlockKind, ColumnSpec, ContentBlock, HeadingPreset, LayoutConfig, PageSize};
pub use report::{ReportInput, SectionDescriptor, SectionSource};

/// Compose `sections` into pages using the built-in Helvetica metrics.
///
/// Every section starts on a fresh page. The configuration is checked before
/// anything is laid out, so an invalid one never yields a partial document.
pub fn compose<S: SectionSource>(sections: &[S], config: &LayoutConfig) -> Result<Composition> {
    let engine = LayoutEngine::new(config.clone())?;
    compose_with(&engine, sections)
}

/// Compose `sections` with an existing engine, e.g. one measuring text with
/// a loaded [`font::FontMetrics`].
pub fn compose_with<S: SectionSource>(
    engine: &LayoutEngine,
    sections: &[S],
) -> Result<Composition> {
    if sections.is_empty() {
        log::debug!("No sections to compose, emitting a single empty page");
    }

    let section_blocks: Vec<Vec<ContentBlock>> = sections.iter().map(|s| s.blocks()).collect();

    let mut items = Vec::new();
    for (section, blocks) in section_blocks.iter().enumerate() {
        items.push(FlowItem {
            section,
            block: 0,
            content: &SECTION_BREAK,
        });
        items.extend(blocks.iter().enumerate().map(|(i, content)| FlowItem {
            section,
            block: i,
            content,
        }));
    }

    let composition = engine.flow(&items)?;
    log::info!(
        "Composed {} sections into {} pages ({} overflow warnings)",
        sections.len(),
        composition.document.page_count(),
        composition.warnings.len()
    );
    Ok(composition)
}

/// Implicit break at the start of every section.
static SECTION_BREAK: ContentBlock = ContentBlock::SectionBreak;

/// Parse a JSON [`ReportInput`] and compose it.
pub fn compose_json(json: &str, config: &LayoutConfig) -> Result<Composition> {
    let engine = LayoutEngine::new(config.clone())?;
    compose_json_with(&engine, json)
}

/// [`compose_json`] with an existing engine.
pub fn compose_json_with(engine: &LayoutEngine, json: &str) -> Result<Composition> {
    let input: ReportInput = serde_json::from_str(json)?;
    compose_with(engine, &input.sections)
}
