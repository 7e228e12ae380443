//! # Report Sections
//!
//! Sections are the unit a report is assembled from. Each one turns into a
//! flat list of [`ContentBlock`]s and always starts on a fresh page.
//!
//! [`SectionDescriptor`] is the JSON-facing set of section shapes the engine
//! knows how to build: raw block lists, a cover page with an executive
//! summary, and one-page team member profiles.

use serde::{Deserialize, Serialize};

use crate::model::{ColumnSpec, ContentBlock};

/// Anything that can produce the blocks of one section.
///
/// Implementations must be pure: the same section always yields the same
/// blocks.
pub trait SectionSource {
    fn blocks(&self) -> Vec<ContentBlock>;
}

impl SectionSource for [ContentBlock] {
    fn blocks(&self) -> Vec<ContentBlock> {
        self.to_vec()
    }
}

impl SectionSource for Vec<ContentBlock> {
    fn blocks(&self) -> Vec<ContentBlock> {
        self.clone()
    }
}

impl<T: SectionSource + ?Sized> SectionSource for &T {
    fn blocks(&self) -> Vec<ContentBlock> {
        (**self).blocks()
    }
}

/// A whole report as read from JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportInput {
    #[serde(default)]
    pub sections: Vec<SectionDescriptor>,
}

/// One section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SectionDescriptor {
    /// Blocks given verbatim, under an optional level 2 title.
    Blocks {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default)]
        blocks: Vec<ContentBlock>,
    },
    Cover(CoverSection),
    Profile(ProfileSection),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverSection {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// Label/value rows of the executive summary.
    #[serde(default)]
    pub summary: Vec<(String, String)>,
    /// Shown verbatim. Composition never reads the clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_on: Option<String>,
}

/// One team member: who they are, where their week goes, and how an
/// assistant should work with them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSection {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_type: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub pain_points: Vec<PainPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyPanel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PainPoint {
    pub task: String,
    pub hours_per_week: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPanel {
    pub pace: String,
    pub detail_level: String,
    /// Percent, 0 to 100.
    pub autonomy: u8,
    #[serde(default)]
    pub priorities: Vec<String>,
}

impl ProfileSection {
    /// Hours per week lost to the listed pain points.
    pub fn weekly_hours(&self) -> f64 {
        self.pain_points.iter().map(|p| p.hours_per_week).sum()
    }
}

impl SectionSource for SectionDescriptor {
    fn blocks(&self) -> Vec<ContentBlock> {
        match self {
            SectionDescriptor::Blocks { title, blocks } => {
                let mut out = Vec::with_capacity(blocks.len() + 1);
                if let Some(title) = title {
                    out.push(ContentBlock::heading(title.clone(), 2));
                }
                out.extend(blocks.iter().cloned());
                out
            }
            SectionDescriptor::Cover(cover) => cover.blocks(),
            SectionDescriptor::Profile(profile) => profile.blocks(),
        }
    }
}

impl SectionSource for CoverSection {
    fn blocks(&self) -> Vec<ContentBlock> {
        let mut out = vec![ContentBlock::heading(self.title.clone(), 1)];
        if let Some(subtitle) = &self.subtitle {
            out.push(ContentBlock::heading(subtitle.clone(), 3));
        }
        if let Some(tagline) = &self.tagline {
            out.push(ContentBlock::paragraph(tagline.clone()));
        }
        if !self.summary.is_empty() {
            out.push(ContentBlock::heading("Executive Summary", 2));
            out.push(ContentBlock::KeyValuePanel {
                rows: self.summary.clone(),
            });
        }
        if let Some(date) = &self.generated_on {
            out.push(ContentBlock::note(format!("Report Generated: {}", date)));
        }
        out
    }
}

impl SectionSource for ProfileSection {
    fn blocks(&self) -> Vec<ContentBlock> {
        let mut out = vec![ContentBlock::heading(self.name.clone(), 2)];

        let mut byline = self.role.clone();
        if let Some(kind) = &self.profile_type {
            if !byline.is_empty() {
                byline.push('\n');
            }
            byline.push_str("Behavioral Profile: ");
            byline.push_str(kind);
        }
        if !byline.is_empty() {
            out.push(ContentBlock::paragraph(byline));
        }

        if !self.summary.trim().is_empty() {
            out.push(ContentBlock::heading("Profile Summary", 3));
            out.push(ContentBlock::paragraph(self.summary.clone()));
        }

        if !self.strengths.is_empty() {
            out.push(ContentBlock::heading("Core Strengths", 3));
            out.push(ContentBlock::bullets(self.strengths.iter().cloned()));
        }

        if !self.pain_points.is_empty() {
            out.push(ContentBlock::heading(
                format!(
                    "Time Optimization Opportunities ({} hrs/week)",
                    format_hours(self.weekly_hours())
                ),
                3,
            ));
            out.push(ContentBlock::table(
                vec![
                    ColumnSpec::new("Activity", 3.0),
                    ColumnSpec::new("Weekly Hours", 1.0),
                ],
                self.pain_points
                    .iter()
                    .map(|p| vec![p.task.clone(), format!("{} hrs", format_hours(p.hours_per_week))])
                    .collect(),
            ));
        }

        if let Some(strategy) = &self.strategy {
            out.push(ContentBlock::heading("AI Adaptation Strategy", 3));
            out.push(ContentBlock::key_values([
                ("Interaction Pace", strategy.pace.clone()),
                ("Information Detail", strategy.detail_level.clone()),
                ("AI Autonomy Level", format!("{}%", strategy.autonomy)),
            ]));
            if !strategy.priorities.is_empty() {
                out.push(ContentBlock::heading("Implementation Priorities", 3));
                out.push(ContentBlock::numbered(strategy.priorities.iter().cloned()));
            }
        }

        out
    }
}

/// A cover section summarizing every profile in `sections`.
pub fn cover_for(
    title: impl Into<String>,
    sections: &[SectionDescriptor],
    generated_on: Option<String>,
) -> SectionDescriptor {
    let profiles: Vec<&ProfileSection> = sections
        .iter()
        .filter_map(|s| match s {
            SectionDescriptor::Profile(p) => Some(p),
            _ => None,
        })
        .collect();
    let hours: f64 = profiles.iter().map(|p| p.weekly_hours()).sum();

    SectionDescriptor::Cover(CoverSection {
        title: title.into(),
        subtitle: None,
        tagline: None,
        summary: vec![
            (
                "Team Members Analyzed".to_string(),
                profiles.len().to_string(),
            ),
            (
                "Weekly Time Recovery Potential".to_string(),
                format!("{} hours", format_hours(hours)),
            ),
            (
                "AI Personalization Level".to_string(),
                "100% individualized".to_string(),
            ),
        ],
        generated_on,
    })
}

/// `12` rather than `12.0`, `2.5` as is.
fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{:.0}", hours)
    } else {
        format!("{}", hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;

    fn profile() -> ProfileSection {
        ProfileSection {
            name: "Dana Reyes".into(),
            role: "Senior Estimator".into(),
            profile_type: Some("Analytical".into()),
            summary: "Detail-oriented and buried under documentation.".into(),
            strengths: vec!["Takeoffs".into(), "Tracking".into()],
            pain_points: vec![
                PainPoint {
                    task: "Manual quantity entry".into(),
                    hours_per_week: 6.0,
                },
                PainPoint {
                    task: "Chasing RFIs".into(),
                    hours_per_week: 2.5,
                },
            ],
            strategy: Some(StrategyPanel {
                pace: "Steady".into(),
                detail_level: "Detailed with templates".into(),
                autonomy: 40,
                priorities: vec!["Automate takeoff import".into()],
            }),
        }
    }

    fn kinds(blocks: &[ContentBlock]) -> Vec<BlockKind> {
        blocks.iter().map(ContentBlock::kind).collect()
    }

    #[test]
    fn profile_maps_to_blocks_in_order() {
        let blocks = profile().blocks();
        assert_eq!(
            kinds(&blocks),
            vec![
                BlockKind::Heading,
                BlockKind::Paragraph,
                BlockKind::Heading,
                BlockKind::Paragraph,
                BlockKind::Heading,
                BlockKind::BulletList,
                BlockKind::Heading,
                BlockKind::Table,
                BlockKind::Heading,
                BlockKind::KeyValuePanel,
                BlockKind::Heading,
                BlockKind::BulletList,
            ]
        );
        assert_eq!(
            blocks[6],
            ContentBlock::heading("Time Optimization Opportunities (8.5 hrs/week)", 3)
        );
        match &blocks[7] {
            ContentBlock::Table { columns, rows } => {
                assert_eq!(columns[0].header, "Activity");
                assert_eq!(columns[0].weight, 3.0);
                assert_eq!(rows[0], vec!["Manual quantity entry", "6 hrs"]);
                assert_eq!(rows[1][1], "2.5 hrs");
            }
            other => panic!("expected table, got {:?}", other),
        }
        match &blocks[9] {
            ContentBlock::KeyValuePanel { rows } => {
                assert_eq!(rows[2], ("AI Autonomy Level".to_string(), "40%".to_string()));
            }
            other => panic!("expected panel, got {:?}", other),
        }
    }

    #[test]
    fn empty_parts_are_omitted() {
        let bare = ProfileSection {
            name: "Sam".into(),
            ..Default::default()
        };
        assert_eq!(bare.blocks(), vec![ContentBlock::heading("Sam", 2)]);
    }

    #[test]
    fn cover_summarizes_profiles() {
        let sections = vec![
            SectionDescriptor::Profile(profile()),
            SectionDescriptor::Profile(profile()),
        ];
        let cover = cover_for("Team Analysis", &sections, Some("March 3, 2025".into()));
        let blocks = cover.blocks();
        assert_eq!(blocks[0], ContentBlock::heading("Team Analysis", 1));
        assert_eq!(
            blocks[2],
            ContentBlock::key_values([
                ("Team Members Analyzed", "2"),
                ("Weekly Time Recovery Potential", "17 hours"),
                ("AI Personalization Level", "100% individualized"),
            ])
        );
        assert_eq!(
            blocks.last(),
            Some(&ContentBlock::note("Report Generated: March 3, 2025"))
        );
    }

    #[test]
    fn titled_block_section_gets_heading() {
        let section = SectionDescriptor::Blocks {
            title: Some("Notes".into()),
            blocks: vec![ContentBlock::paragraph("x")],
        };
        assert_eq!(
            section.blocks(),
            vec![ContentBlock::heading("Notes", 2), ContentBlock::paragraph("x")]
        );
    }

    #[test]
    fn report_input_from_json() {
        let json = r#"{
            "sections": [
                { "type": "cover", "title": "Team", "generatedOn": "today" },
                { "type": "profile", "name": "Dana", "role": "Estimator",
                  "painPoints": [{ "task": "Entry", "hoursPerWeek": 4 }],
                  "strategy": { "pace": "Fast", "detailLevel": "Brief", "autonomy": 70 } },
                { "type": "blocks", "blocks": [{ "type": "paragraph", "text": "hi" }] }
            ]
        }"#;
        let input: ReportInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.sections.len(), 3);
        match &input.sections[1] {
            SectionDescriptor::Profile(p) => {
                assert_eq!(p.weekly_hours(), 4.0);
                assert_eq!(p.strategy.as_ref().map(|s| s.autonomy), Some(70));
            }
            other => panic!("expected profile, got {:?}", other),
        }
    }
}
