//! Reference-free quality scoring of extracted text.
//!
//! Text goes through feature extraction, the five metric scorers, weighted
//! aggregation, band classification and the advice rules. An assessor is
//! immutable once built, so one instance can score many parser outputs,
//! from several threads if needed.

mod advice;
mod batch;
mod classify;
mod features;
mod metrics;
mod report;

use anyhow::{Context, Result};
use tracing::debug;

use crate::model::ParsedDocument;
use crate::patterns::PatternCatalog;
use crate::util::round3;

pub use self::batch::BatchComparison;
pub use self::features::TextStats;
pub use self::metrics::MetricWeights;
pub use self::report::{MetricBreakdown, QualityReport};

use self::advice::{AdviceContext, recommendations};
use self::batch::compare_reports;
use self::classify::{confidence_level, quality_grade};
use self::features::extract_features;
use self::metrics::{ScoringInput, aggregate, score_all};

#[derive(Debug)]
pub struct QualityAssessor {
    catalog: PatternCatalog,
    weights: MetricWeights,
}

impl QualityAssessor {
    pub fn new() -> Result<Self> {
        Self::with_weights(MetricWeights::default())
    }

    /// Fails when the weights are not a valid convex combination.
    pub fn with_weights(weights: MetricWeights) -> Result<Self> {
        weights.validate().context("invalid aggregation weights")?;
        Ok(Self {
            catalog: PatternCatalog::new()?,
            weights,
        })
    }

    /// Scores the document as given. An upstream `error` in the metadata is
    /// not inspected here; callers decide whether failed outputs get scored.
    pub fn assess(&self, document: &ParsedDocument) -> QualityReport {
        self.assess_text(&document.text, document.table_count(), &document.parser_name)
    }

    pub fn assess_text(&self, text: &str, table_count: usize, parser_name: &str) -> QualityReport {
        let features = extract_features(&self.catalog, text);
        let input = ScoringInput {
            features: &features,
            table_count,
        };
        let scores = score_all(&input, &self.weights);
        let overall = aggregate(&scores);
        let metrics = MetricBreakdown::from_scores(&scores);

        let advice = recommendations(&AdviceContext {
            metrics: &metrics,
            parser_name,
        });

        debug!(
            parser = parser_name,
            overall,
            completeness = metrics.completeness_score,
            semantic = metrics.semantic_quality,
            noise = metrics.noise_level,
            format = metrics.format_preservation,
            structure = metrics.content_structure,
            "assessed parser output"
        );

        QualityReport {
            overall_quality: round3(overall),
            confidence_level: confidence_level(overall),
            metrics: metrics.rounded(),
            parser_name: parser_name.to_string(),
            text_stats: TextStats::from_text(text),
            recommendations: advice,
            quality_grade: quality_grade(overall),
        }
    }

    /// Assesses every document independently and reduces the reports.
    pub fn assess_many(&self, documents: &[ParsedDocument]) -> Option<BatchComparison> {
        let reports = documents
            .iter()
            .map(|document| self.assess(document))
            .collect();
        compare_reports(reports)
    }
}
