use serde::{Deserialize, Serialize};

use super::classify::{ConfidenceLevel, QualityGrade};
use super::features::TextStats;
use super::metrics::{MetricKind, MetricScore};
use crate::util::round3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricBreakdown {
    pub completeness_score: f64,
    pub semantic_quality: f64,
    pub noise_level: f64,
    pub format_preservation: f64,
    pub content_structure: f64,
}

impl MetricBreakdown {
    pub fn from_scores(scores: &[MetricScore]) -> Self {
        let mut breakdown = Self::default();
        for score in scores {
            let slot = match score.kind {
                MetricKind::Completeness => &mut breakdown.completeness_score,
                MetricKind::SemanticQuality => &mut breakdown.semantic_quality,
                MetricKind::NoiseLevel => &mut breakdown.noise_level,
                MetricKind::FormatPreservation => &mut breakdown.format_preservation,
                MetricKind::ContentStructure => &mut breakdown.content_structure,
            };
            *slot = score.value;
        }
        breakdown
    }

    pub fn rounded(&self) -> Self {
        Self {
            completeness_score: round3(self.completeness_score),
            semantic_quality: round3(self.semantic_quality),
            noise_level: round3(self.noise_level),
            format_preservation: round3(self.format_preservation),
            content_structure: round3(self.content_structure),
        }
    }
}

/// Assessment of one parser's output for one document.
///
/// Field names and label strings are consumed by downstream tooling and must
/// stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub overall_quality: f64,
    pub confidence_level: ConfidenceLevel,
    pub metrics: MetricBreakdown,
    pub parser_name: String,
    pub text_stats: TextStats,
    pub recommendations: Vec<String>,
    pub quality_grade: QualityGrade,
}
