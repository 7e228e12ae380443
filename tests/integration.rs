//! Integration tests for the Quire composition pipeline.
//!
//! These tests run sections through `compose` end to end. They verify:
//! - Blocks stay on one page when they fit and move whole when they don't
//! - Tables split between rows and repeat their header on every page
//! - Sections always start on a fresh page
//! - Oversized content is placed anyway and reported
//! - Output is deterministic

use quire::layout::BlockGroup;
use quire::model::*;
use quire::report::{cover_for, PainPoint, ProfileSection, SectionDescriptor, StrategyPanel};
use quire::text::FixedAdvance;
use quire::{
    compose, compose_json, compose_json_with, compose_with, Composition, DrawCommand, LayoutEngine,
    Page,
};
use quire::{ContentOverflowWarning, QuireError};

// ─── Helpers ────────────────────────────────────────────────────

/// 300 x 250 page with a 10pt margin: a 280 x 230 content box. With 10pt
/// text, a 0.5em advance and line height 1.0 every character is 5pt wide and
/// every line 10pt tall; one-line table rows are 20pt with 5pt cell padding.
fn small_config() -> LayoutConfig {
    LayoutConfig {
        page_width: 300.0,
        page_height: 250.0,
        margin: 10.0,
        body_font_size: 10.0,
        table_font_size: 10.0,
        line_height: 1.0,
        cell_padding: 5.0,
        block_spacing: 10.0,
        ..Default::default()
    }
}

fn small_engine() -> LayoutEngine {
    LayoutEngine::with_metrics(small_config(), FixedAdvance::new(0.5)).unwrap()
}

fn compose_small(sections: &[Vec<ContentBlock>]) -> Composition {
    compose_with(&small_engine(), sections).unwrap()
}

fn lines(n: usize) -> String {
    vec!["line"; n].join("\n")
}

fn numbered_table(rows: usize) -> ContentBlock {
    ContentBlock::table(
        vec![ColumnSpec::new("Row", 1.0), ColumnSpec::new("Value", 1.0)],
        (1..=rows)
            .map(|i| vec![format!("Row {}", i), format!("{}", i * 10)])
            .collect(),
    )
}

fn table_groups(page: &Page) -> Vec<&BlockGroup> {
    page.groups
        .iter()
        .filter(|g| g.kind == BlockKind::Table)
        .collect()
}

/// Text of the bold header cells of a page's first table segment.
fn header_cells(page: &Page) -> Vec<(f64, Vec<String>)> {
    let group = table_groups(page)[0];
    page.group_commands(group)
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Text { x, lines, style, .. } if style.bold => Some((*x, lines.clone())),
            _ => None,
        })
        .collect()
}

fn grid_columns(page: &Page) -> Vec<f64> {
    page.commands
        .iter()
        .find_map(|cmd| match cmd {
            DrawCommand::TableGrid {
                column_boundaries, ..
            } => Some(column_boundaries.clone()),
            _ => None,
        })
        .unwrap()
}

fn profile(name: &str) -> ProfileSection {
    ProfileSection {
        name: name.to_string(),
        role: "Estimator".to_string(),
        profile_type: Some("Analytical".to_string()),
        summary: "Excels at takeoffs and tracking but is buried under documentation work."
            .to_string(),
        strengths: vec!["Takeoffs".to_string(), "Bid tracking".to_string()],
        pain_points: vec![
            PainPoint {
                task: "Re-keying quantities".to_string(),
                hours_per_week: 6.0,
            },
            PainPoint {
                task: "Formatting bid documents".to_string(),
                hours_per_week: 4.0,
            },
        ],
        strategy: Some(StrategyPanel {
            pace: "Methodical".to_string(),
            detail_level: "Detailed with templates".to_string(),
            autonomy: 40,
            priorities: vec![
                "Automate quantity import".to_string(),
                "Draft bid documents".to_string(),
            ],
        }),
    }
}

fn team_report() -> Vec<SectionDescriptor> {
    let profiles = vec![
        SectionDescriptor::Profile(profile("Dana Reyes")),
        SectionDescriptor::Profile(profile("Marcus Hale")),
    ];
    let mut sections = vec![cover_for(
        "Team Behavioral Analysis",
        &profiles,
        Some("March 3, 2025".to_string()),
    )];
    sections.extend(profiles);
    sections
}

// ─── Basic Pipeline Tests ───────────────────────────────────────

#[test]
fn test_key_value_panel_fits_on_one_page() {
    let result = compose_small(&[vec![ContentBlock::key_values([
        ("Pace", "Fast"),
        ("Detail", "Summary"),
        ("Autonomy", "70%"),
    ])]]);
    assert_eq!(result.document.page_count(), 1);
    let page = &result.document.pages[0];
    assert_eq!(page.groups.len(), 1);
    assert_eq!(page.groups[0].kind, BlockKind::KeyValuePanel);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_empty_input_yields_one_empty_page() {
    let sections: Vec<SectionDescriptor> = vec![];
    let result = compose(&sections, &LayoutConfig::default()).unwrap();
    assert_eq!(result.document.page_count(), 1);
    assert!(result.document.pages[0].is_empty());
}

#[test]
fn test_invalid_config_fails_before_layout() {
    let config = LayoutConfig {
        margin: 400.0,
        ..Default::default()
    };
    let err = compose(&[vec![ContentBlock::paragraph("x")]], &config).unwrap_err();
    assert!(matches!(err, QuireError::InvalidConfiguration(_)));
}

#[test]
fn test_output_is_deterministic() {
    let sections = team_report();
    let a = compose(&sections, &LayoutConfig::default()).unwrap();
    let b = compose(&sections, &LayoutConfig::default()).unwrap();
    assert_eq!(
        a.document.to_json().unwrap(),
        b.document.to_json().unwrap()
    );
    assert_eq!(a, b);
}

// ─── Section Tests ──────────────────────────────────────────────

#[test]
fn test_two_short_sections_make_two_pages() {
    let result = compose_small(&[
        vec![ContentBlock::heading("One", 2), ContentBlock::paragraph("a")],
        vec![ContentBlock::heading("Two", 2), ContentBlock::paragraph("b")],
    ]);
    assert_eq!(result.document.page_count(), 2);
}

#[test]
fn test_sections_never_share_a_page() {
    let result = compose_small(&[
        vec![ContentBlock::paragraph(lines(15))],
        vec![ContentBlock::paragraph(lines(15))],
        vec![ContentBlock::paragraph("short")],
    ]);
    for page in &result.document.pages {
        let first = page.groups[0].section;
        assert!(page.groups.iter().all(|g| g.section == first));
    }
    let firsts: Vec<usize> = result
        .document
        .pages
        .iter()
        .map(|p| p.groups[0].section)
        .collect();
    assert_eq!(firsts, vec![0, 1, 2]);
}

#[test]
fn test_block_indices_are_per_section() {
    let result = compose_small(&[
        vec![ContentBlock::paragraph("a")],
        vec![ContentBlock::paragraph("b"), ContentBlock::paragraph("c")],
    ]);
    let page = &result.document.pages[1];
    let indices: Vec<(usize, usize)> = page.groups.iter().map(|g| (g.section, g.block)).collect();
    assert_eq!(indices, vec![(1, 0), (1, 1)]);
}

// ─── Page Overflow Tests ────────────────────────────────────────

#[test]
fn test_oversized_paragraph_overflows_with_warning() {
    let result = compose_small(&[vec![ContentBlock::paragraph(lines(30))]]);
    assert_eq!(result.document.page_count(), 1);
    assert!(result.document.pages[0].overflowed);
    assert_eq!(result.warnings.len(), 1);
    let warning: &ContentOverflowWarning = &result.warnings[0];
    assert_eq!(warning.page, 0);
    assert_eq!(warning.kind, BlockKind::Paragraph);
    assert_eq!(warning.row, None);
    assert_eq!(warning.required_height, 300.0);
    assert_eq!(warning.available_height, 230.0);
}

#[test]
fn test_space_invariant_holds_on_normal_pages() {
    let mut blocks = Vec::new();
    for i in 0..12 {
        blocks.push(ContentBlock::heading(format!("Part {}", i), 3));
        blocks.push(ContentBlock::paragraph(lines(i % 5 + 1)));
        blocks.push(ContentBlock::bullets(["one", "two"]));
    }
    blocks.push(numbered_table(25));
    let result = compose_small(&[blocks]);
    assert!(result.document.page_count() > 1);
    for page in &result.document.pages {
        assert!(!page.overflowed);
        let used: f64 = page.groups.iter().map(|g| g.height).sum();
        assert!(used <= page.content_height() + 1e-9);
        for cmd in &page.commands {
            assert!(cmd.bottom() <= page.height - page.margin + 1e-9);
        }
    }
}

// ─── Table Tests ────────────────────────────────────────────────

#[test]
fn test_fifty_row_table_splits_ten_rows_per_page() {
    let result = compose_small(&[vec![numbered_table(50)]]);
    let pages = &result.document.pages;
    assert_eq!(pages.len(), 5);

    for (i, page) in pages.iter().enumerate() {
        let groups = table_groups(page);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].rows, Some(i * 10..i * 10 + 10));
    }

    let first_header = header_cells(&pages[0]);
    assert_eq!(first_header.len(), 2);
    assert_eq!(first_header[0].1, vec!["Row".to_string()]);
    for page in &pages[1..] {
        assert_eq!(header_cells(page), first_header);
    }
    assert!(result.warnings.is_empty());
}

#[test]
fn test_column_widths_identical_on_every_page() {
    let table = ContentBlock::table(
        vec![
            ColumnSpec::new("Activity", 3.0),
            ColumnSpec::new("Hours", 1.0),
        ],
        (0..40)
            .map(|i| vec![format!("activity {} with a longer label", i), "2".to_string()])
            .collect(),
    );
    let result = compose_small(&[vec![table]]);
    let pages = &result.document.pages;
    assert!(pages.len() > 1);
    let expected = grid_columns(&pages[0]);
    assert_eq!(expected, vec![10.0, 220.0, 290.0]);
    for page in pages {
        assert_eq!(grid_columns(page), expected);
    }
}

#[test]
fn test_rows_are_never_split_or_duplicated() {
    let table = ContentBlock::table(
        vec![ColumnSpec::new("Notes", 1.0)],
        (0..30).map(|i| vec![lines(i % 4 + 1)]).collect(),
    );
    let result = compose_small(&[vec![table]]);
    let mut next = 0;
    for page in &result.document.pages {
        for group in table_groups(page) {
            let rows = group.rows.clone().unwrap();
            assert_eq!(rows.start, next);
            assert!(rows.end > rows.start);
            next = rows.end;
        }
    }
    assert_eq!(next, 30);
}

#[test]
fn test_table_continues_mid_page() {
    let result = compose_small(&[vec![
        ContentBlock::paragraph(lines(10)),
        numbered_table(12),
    ]]);
    let pages = &result.document.pages;
    assert_eq!(pages.len(), 2);
    // 100pt paragraph + 10pt spacing leaves 120pt: header plus five rows.
    assert_eq!(table_groups(&pages[0])[0].rows, Some(0..5));
    assert_eq!(table_groups(&pages[1])[0].rows, Some(5..12));
}

#[test]
fn test_header_is_not_orphaned() {
    let result = compose_small(&[vec![
        ContentBlock::paragraph(lines(20)),
        numbered_table(3),
    ]]);
    let pages = &result.document.pages;
    assert_eq!(pages.len(), 2);
    assert!(table_groups(&pages[0]).is_empty());
    assert_eq!(table_groups(&pages[1])[0].rows, Some(0..3));
}

#[test]
fn test_oversized_row_is_placed_alone() {
    let table = ContentBlock::table(
        vec![ColumnSpec::new("Notes", 1.0)],
        vec![
            vec!["first".to_string()],
            vec![lines(30)],
            vec!["last".to_string()],
        ],
    );
    let result = compose_small(&[vec![table]]);
    let pages = &result.document.pages;
    assert_eq!(pages.len(), 3);
    assert_eq!(table_groups(&pages[0])[0].rows, Some(0..1));
    assert_eq!(table_groups(&pages[1])[0].rows, Some(1..2));
    assert!(pages[1].overflowed);
    assert_eq!(table_groups(&pages[2])[0].rows, Some(2..3));

    assert_eq!(result.warnings.len(), 1);
    let warning = &result.warnings[0];
    assert_eq!(warning.page, 1);
    assert_eq!(warning.kind, BlockKind::Table);
    assert_eq!(warning.row, Some(1));
    // 20pt header + 300pt of text + 10pt padding
    assert_eq!(warning.required_height, 330.0);
}

#[test]
fn test_table_without_columns_places_nothing() {
    let result = compose_small(&[vec![
        ContentBlock::table(vec![], vec![vec!["orphan".to_string()]]),
        ContentBlock::paragraph("after"),
    ]]);
    let page = &result.document.pages[0];
    assert_eq!(page.groups.len(), 1);
    assert_eq!(page.groups[0].kind, BlockKind::Paragraph);
}

#[test]
fn test_header_only_table() {
    let result = compose_small(&[vec![numbered_table(0)]]);
    let page = &result.document.pages[0];
    let groups = table_groups(page);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].rows, Some(0..0));
    assert_eq!(groups[0].height, 20.0);
}

// ─── Report Tests ───────────────────────────────────────────────

#[test]
fn test_team_report_one_page_per_section() {
    let result = compose(&team_report(), &LayoutConfig::default()).unwrap();
    let pages = &result.document.pages;
    assert_eq!(pages.len(), 3);
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.groups[0].kind, BlockKind::Heading);
        assert!(page.groups.iter().all(|g| g.section == i));
    }
    assert!(table_groups(&pages[1]).len() == 1);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_compose_json_report() {
    let json = r#"{
        "sections": [
            { "type": "blocks", "title": "Intro", "blocks": [
                { "type": "paragraph", "text": "Hello" },
                { "type": "bulletList", "items": ["a", "b"], "ordered": true }
            ]},
            { "type": "blocks", "blocks": [
                { "type": "table",
                  "columns": [{ "header": "Task" }, { "header": "Hours", "weight": 0.5 }],
                  "rows": [["Entry", "4"]] }
            ]}
        ]
    }"#;
    let result = compose_json(json, &LayoutConfig::default()).unwrap();
    assert_eq!(result.document.page_count(), 2);
    let kinds: Vec<BlockKind> = result.document.pages[0]
        .groups
        .iter()
        .map(|g| g.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![BlockKind::Heading, BlockKind::Paragraph, BlockKind::BulletList]
    );
}

#[test]
fn test_compose_json_with_custom_metrics() {
    let json = r#"{ "sections": [
        { "type": "blocks", "blocks": [{ "type": "paragraph", "text": "aaaa bbbb" }] }
    ]}"#;
    let result = compose_json_with(&small_engine(), json).unwrap();
    let page = &result.document.pages[0];
    assert_eq!(page.groups[0].height, 10.0);
    assert_eq!(page.groups[0].top, 10.0);
}

#[test]
fn test_cover_date_is_a_muted_note() {
    let config = LayoutConfig::default();
    let result = compose(&team_report(), &config).unwrap();
    let cover = &result.document.pages[0];
    let note = cover.groups.last().unwrap();
    assert_eq!(note.kind, BlockKind::Note);
    match &cover.group_commands(note)[0] {
        DrawCommand::Text { lines, style, .. } => {
            assert_eq!(lines[0], "Report Generated: March 3, 2025");
            assert_eq!(style.color, config.palette.muted);
            assert_eq!(style.font_size, 9.0);
        }
        other => panic!("expected note text, got {:?}", other),
    }
}

#[test]
fn test_long_numbered_list_keeps_markers_clear_of_text() {
    let items: Vec<String> = (1..=14).map(|i| format!("Priority {}", i)).collect();
    let result = compose(&[vec![ContentBlock::numbered(items)]], &LayoutConfig::default()).unwrap();
    let page = &result.document.pages[0];
    let metrics = quire::text::StandardMetrics;
    let style = LayoutConfig::default().body_style();
    for pair in page.commands.chunks(2) {
        match (&pair[0], &pair[1]) {
            (DrawCommand::Text { x: mx, lines, .. }, DrawCommand::Text { x: tx, .. }) => {
                use quire::text::TextMeasure;
                assert!(mx + metrics.text_width(&lines[0], &style) < *tx);
            }
            other => panic!("expected marker and text, got {:?}", other),
        }
    }
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = compose_json("{ \"sections\": [", &LayoutConfig::default()).unwrap_err();
    assert!(matches!(err, QuireError::ParseError { .. }));
}

#[test]
fn test_document_serializes_draw_commands() {
    let result = compose_small(&[vec![ContentBlock::paragraph("hello")]]);
    let json = result.document.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let command = &value["pages"][0]["commands"][0];
    assert_eq!(command["type"], "text");
    assert_eq!(command["lines"][0], "hello");
    assert_eq!(command["x"], 10.0);
}

// ─── Page Size Tests ────────────────────────────────────────────

#[test]
fn test_letter_pages() {
    let config = LayoutConfig::for_page_size(PageSize::Letter);
    let result = compose(&[vec![ContentBlock::paragraph("x")]], &config).unwrap();
    let page = &result.document.pages[0];
    assert_eq!(page.width, 612.0);
    assert_eq!(page.height, 792.0);
}
