//! Text-versus-visual structure comparison.
//!
//! The text side is profiled with the shared pattern catalog; the visual side
//! arrives as per-category counts (or raw detection labels) from the layout
//! model. Detection confidences are not consumed.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bands::{BandTable, Threshold};
use crate::patterns::PatternCatalog;
use crate::util::round3;

const PARAGRAPH_MIN_CHARS: usize = 20;
const COUNT_TOLERANCE: usize = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyProfile {
    pub heading_count: usize,
    pub list_count: usize,
    pub paragraph_count: usize,
    pub avg_heading_length: f64,
    pub text_structure_ratio: f64,
}

impl HierarchyProfile {
    pub fn from_counts(heading_count: usize, list_count: usize, paragraph_count: usize) -> Self {
        Self {
            heading_count,
            list_count,
            paragraph_count,
            avg_heading_length: 0.0,
            text_structure_ratio: heading_count as f64 / paragraph_count.max(1) as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualProfile {
    #[serde(default)]
    pub titles: usize,
    #[serde(default)]
    pub text_blocks: usize,
    #[serde(default)]
    pub lists: usize,
    #[serde(default)]
    pub tables: usize,
    #[serde(default)]
    pub figures: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutRatios {
    pub title_ratio: f64,
    pub text_ratio: f64,
    pub list_ratio: f64,
    pub table_ratio: f64,
    pub figure_ratio: f64,
    /// Number of distinct element categories present.
    pub structure_complexity: usize,
}

impl VisualProfile {
    /// Tallies layout-model labels ("Title", "Text", "List", "Table",
    /// "Figure"); unrecognised labels are ignored.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut profile = Self::default();
        for label in labels {
            match label.as_ref().trim().to_ascii_lowercase().as_str() {
                "title" => profile.titles += 1,
                "text" => profile.text_blocks += 1,
                "list" => profile.lists += 1,
                "table" => profile.tables += 1,
                "figure" => profile.figures += 1,
                _ => {}
            }
        }
        profile
    }

    pub fn total(&self) -> usize {
        self.titles + self.text_blocks + self.lists + self.tables + self.figures
    }

    pub fn layout_ratios(&self) -> Option<LayoutRatios> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let share = |count: usize| count as f64 / total as f64;
        let counts = [self.titles, self.text_blocks, self.lists, self.tables, self.figures];

        Some(LayoutRatios {
            title_ratio: share(self.titles),
            text_ratio: share(self.text_blocks),
            list_ratio: share(self.lists),
            table_ratio: share(self.tables),
            figure_ratio: share(self.figures),
            structure_complexity: counts.iter().filter(|count| **count > 0).count(),
        })
    }
}

/// Layout collaborator output: either pre-tallied counts or the raw detections.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VisualInput {
    Elements { elements: Vec<VisualElement> },
    Counts(VisualProfile),
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualElement {
    #[serde(rename = "type")]
    pub kind: String,
}

impl VisualInput {
    pub fn into_profile(self) -> VisualProfile {
        match self {
            Self::Elements { elements } => {
                VisualProfile::from_labels(elements.iter().map(|element| element.kind.as_str()))
            }
            Self::Counts(profile) => profile,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Excellent,
    Good,
    Moderate,
    Poor,
}

const MATCH_BANDS: BandTable<MatchBand> = BandTable {
    bands: &[
        (0.8, MatchBand::Excellent),
        (0.6, MatchBand::Good),
        (0.4, MatchBand::Moderate),
    ],
    floor: MatchBand::Poor,
    threshold: Threshold::Above,
};

impl MatchBand {
    pub fn insight(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent hierarchy extraction - structure well preserved",
            Self::Good => "Good hierarchy extraction with minor discrepancies",
            Self::Moderate => "Moderate hierarchy loss - some structure not captured",
            Self::Poor => "Poor hierarchy extraction - significant structure loss",
        }
    }

    fn quality_label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Moderate => "fair",
            Self::Poor => "poor",
        }
    }

    fn suitability_label(self) -> &'static str {
        match self {
            Self::Excellent => "highly_suitable",
            Self::Good => "suitable",
            Self::Moderate => "partially_suitable",
            Self::Poor => "not_suitable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub match_score: f64,
    pub heading_match: f64,
    pub list_match: f64,
    pub band: MatchBand,
    pub discrepancies: Vec<String>,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyAssessment {
    pub hierarchy_quality: String,
    pub structure_preservation: f64,
    pub parser_suitability: String,
    pub summary: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyAnalysis {
    pub text_hierarchy: HierarchyProfile,
    pub visual_hierarchy: Option<VisualProfile>,
    pub layout_ratios: Option<LayoutRatios>,
    pub comparison: Option<ComparisonResult>,
    pub overall_assessment: HierarchyAssessment,
}

#[derive(Debug)]
pub struct HierarchyAnalyzer {
    catalog: PatternCatalog,
}

impl HierarchyAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            catalog: PatternCatalog::new()?,
        })
    }

    /// A line may count as both a heading and a list item ("1. Scope");
    /// paragraphs are long lines that are neither.
    pub fn text_profile(&self, text: &str) -> HierarchyProfile {
        let mut heading_count = 0;
        let mut list_count = 0;
        let mut paragraph_count = 0;
        let mut heading_chars = 0;

        for line in text.split('\n').map(str::trim).filter(|line| !line.is_empty()) {
            let is_heading = self.catalog.heading_label(line).is_some();
            let is_list = self.catalog.list_label(line).is_some();
            let chars = line.chars().count();

            if is_heading {
                heading_count += 1;
                heading_chars += chars;
            }
            if is_list {
                list_count += 1;
            }
            if chars > PARAGRAPH_MIN_CHARS && !is_heading && !is_list {
                paragraph_count += 1;
            }
        }

        HierarchyProfile {
            avg_heading_length: if heading_count == 0 {
                0.0
            } else {
                heading_chars as f64 / heading_count as f64
            },
            ..HierarchyProfile::from_counts(heading_count, list_count, paragraph_count)
        }
    }

    pub fn analyze(&self, text: &str, visual: Option<&VisualProfile>) -> HierarchyAnalysis {
        let text_hierarchy = self.text_profile(text);
        let comparison = visual.map(|visual| compare_profiles(&text_hierarchy, visual));
        let overall_assessment = assess_hierarchy(&text_hierarchy, comparison.as_ref());

        debug!(
            headings = text_hierarchy.heading_count,
            lists = text_hierarchy.list_count,
            paragraphs = text_hierarchy.paragraph_count,
            match_score = comparison.as_ref().map(|result| result.match_score),
            "analyzed document hierarchy"
        );

        HierarchyAnalysis {
            text_hierarchy,
            visual_hierarchy: visual.copied(),
            layout_ratios: visual.and_then(VisualProfile::layout_ratios),
            comparison,
            overall_assessment,
        }
    }
}

/// Symmetric count agreement: 1.0 when both are zero, 0.0 when only one is.
pub fn category_match(text_count: usize, visual_count: usize) -> f64 {
    match (text_count, visual_count) {
        (0, 0) => 1.0,
        (0, _) | (_, 0) => 0.0,
        (a, b) => a.min(b) as f64 / a.max(b) as f64,
    }
}

pub fn compare_profiles(text: &HierarchyProfile, visual: &VisualProfile) -> ComparisonResult {
    let heading_match = category_match(text.heading_count, visual.titles);
    let list_match = category_match(text.list_count, visual.lists);
    let match_score = (heading_match + list_match) / 2.0;
    let band = MATCH_BANDS.classify(match_score);

    let mut discrepancies = Vec::new();
    if text.heading_count.abs_diff(visual.titles) > COUNT_TOLERANCE {
        discrepancies.push(format!(
            "Heading mismatch: Found {} text headings vs {} visual titles",
            text.heading_count, visual.titles
        ));
    }
    if text.list_count.abs_diff(visual.lists) > COUNT_TOLERANCE {
        discrepancies.push(format!(
            "List mismatch: Found {} text lists vs {} visual lists",
            text.list_count, visual.lists
        ));
    }

    let mut recommendations = Vec::new();
    if visual.titles > text.heading_count {
        recommendations.push("Consider using a parser better at detecting headers/titles".to_string());
    }
    if visual.lists > text.list_count {
        recommendations
            .push("Consider using a parser with better list detection capabilities".to_string());
    }
    if visual.tables > 0 {
        recommendations.push(
            "Document contains tables - consider using table-specialized parsers".to_string(),
        );
    }

    ComparisonResult {
        match_score,
        heading_match,
        list_match,
        band,
        discrepancies,
        insights: vec![band.insight().to_string()],
        recommendations,
    }
}

pub fn assess_hierarchy(
    profile: &HierarchyProfile,
    comparison: Option<&ComparisonResult>,
) -> HierarchyAssessment {
    let (hierarchy_quality, parser_suitability, structure_preservation) = match comparison {
        Some(result) => (
            result.band.quality_label(),
            result.band.suitability_label(),
            round3(result.match_score),
        ),
        None => ("unknown", "unknown", 0.0),
    };

    let mut summary = vec![
        format!(
            "Detected {} headings and {} lists in extracted text",
            profile.heading_count, profile.list_count
        ),
        format!("Hierarchy quality: {hierarchy_quality}"),
        format!("Parser suitability: {}", parser_suitability.replace('_', " ")),
    ];
    if let Some(result) = comparison {
        summary.extend(result.insights.iter().cloned());
    }

    HierarchyAssessment {
        hierarchy_quality: hierarchy_quality.to_string(),
        structure_preservation,
        parser_suitability: parser_suitability.to_string(),
        summary,
    }
}
