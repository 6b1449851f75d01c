use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use super::features::TextFeatures;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Completeness,
    SemanticQuality,
    NoiseLevel,
    FormatPreservation,
    ContentStructure,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completeness => "completeness_score",
            Self::SemanticQuality => "semantic_quality",
            Self::NoiseLevel => "noise_level",
            Self::FormatPreservation => "format_preservation",
            Self::ContentStructure => "content_structure",
        }
    }
}

/// Everything a scorer may look at: text features plus the parser's own counts.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub features: &'a TextFeatures,
    pub table_count: usize,
}

pub struct MetricSpec {
    pub kind: MetricKind,
    pub score: fn(&ScoringInput<'_>) -> f64,
    /// Aggregated as `1 - score` (higher raw score is worse).
    pub inverted: bool,
}

pub const METRICS: [MetricSpec; 5] = [
    MetricSpec {
        kind: MetricKind::Completeness,
        score: completeness,
        inverted: false,
    },
    MetricSpec {
        kind: MetricKind::SemanticQuality,
        score: semantic_quality,
        inverted: false,
    },
    MetricSpec {
        kind: MetricKind::NoiseLevel,
        score: noise_level,
        inverted: true,
    },
    MetricSpec {
        kind: MetricKind::FormatPreservation,
        score: format_preservation,
        inverted: false,
    },
    MetricSpec {
        kind: MetricKind::ContentStructure,
        score: content_structure,
        inverted: false,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricScore {
    pub kind: MetricKind,
    pub value: f64,
    pub weight: f64,
    pub inverted: bool,
}

impl MetricScore {
    pub fn contribution(&self) -> f64 {
        let effective = if self.inverted {
            1.0 - self.value
        } else {
            self.value
        };
        self.weight * effective
    }
}

/// Aggregation weights, keyed the way the weights file names them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricWeights {
    pub completeness: f64,
    pub semantic_quality: f64,
    pub noise_reduction: f64,
    pub format_preservation: f64,
    pub content_structure: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            completeness: 0.25,
            semantic_quality: 0.20,
            noise_reduction: 0.20,
            format_preservation: 0.15,
            content_structure: 0.20,
        }
    }
}

impl MetricWeights {
    pub fn weight_for(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Completeness => self.completeness,
            MetricKind::SemanticQuality => self.semantic_quality,
            MetricKind::NoiseLevel => self.noise_reduction,
            MetricKind::FormatPreservation => self.format_preservation,
            MetricKind::ContentStructure => self.content_structure,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for spec in &METRICS {
            let weight = self.weight_for(spec.kind);
            if !weight.is_finite() || weight < 0.0 {
                bail!(
                    "aggregation weight for {} must be a finite non-negative number, got {weight}",
                    spec.kind.as_str()
                );
            }
        }

        let sum: f64 = METRICS.iter().map(|spec| self.weight_for(spec.kind)).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            bail!("aggregation weights must sum to 1.0, got {sum:.6}");
        }

        Ok(())
    }
}

pub fn score_all(input: &ScoringInput<'_>, weights: &MetricWeights) -> Vec<MetricScore> {
    METRICS
        .iter()
        .map(|spec| MetricScore {
            kind: spec.kind,
            value: clamp_unit((spec.score)(input)),
            weight: weights.weight_for(spec.kind),
            inverted: spec.inverted,
        })
        .collect()
}

pub fn aggregate(scores: &[MetricScore]) -> f64 {
    clamp_unit(scores.iter().map(MetricScore::contribution).sum())
}

pub fn completeness(input: &ScoringInput<'_>) -> f64 {
    let features = input.features;
    if features.is_blank {
        return 0.0;
    }

    let mut score = 0.5;
    if features.char_count > 100 {
        score += 0.2;
    }
    if features.char_count > 1000 {
        score += 0.1;
    }
    score += 0.2 * (features.complete_sentence_count as f64 / 5.0).min(1.0);
    if features.truncated {
        score -= 0.1;
    }

    clamp_unit(score)
}

pub fn semantic_quality(input: &ScoringInput<'_>) -> f64 {
    let features = input.features;
    if features.is_blank || features.word_count == 0 {
        return 0.0;
    }

    let mut score = (features.vocabulary_ratio * 2.0).min(0.3);
    if features.sentence_count > 0 {
        if (5.0..=30.0).contains(&features.mean_sentence_words) {
            score += 0.2;
        }
        if features.capitalized_sentence_ratio >= 0.7 {
            score += 0.1;
        }
    }
    score += (features.coherence_markers as f64 * 0.05).min(0.2);
    if features.paragraph_count > 1 {
        score += 0.2;
    }

    clamp_unit(score)
}

pub fn noise_level(input: &ScoringInput<'_>) -> f64 {
    let features = input.features;
    if features.is_blank || features.char_count == 0 {
        return 1.0;
    }

    let score = features.special_char_ratio.min(0.3)
        + (features.repeated_runs as f64 * 0.05).min(0.2)
        + (features.consonant_runs as f64 * 0.1).min(0.2)
        + features.single_char_token_ratio.min(0.3);

    clamp_unit(score)
}

pub fn format_preservation(input: &ScoringInput<'_>) -> f64 {
    let features = input.features;
    let mut score = 0.0;

    if features.line_count > 1 {
        score += 0.3;
    }
    if features.paragraph_count > 1 {
        score += 0.2;
    }
    if input.table_count > 0 {
        score += 0.3;
    }
    if features.list_lines > 0 {
        score += 0.2;
    }

    clamp_unit(score)
}

pub fn content_structure(input: &ScoringInput<'_>) -> f64 {
    let features = input.features;
    let mut score = 0.0;

    if features.heading_lines > 0 {
        score += 0.3;
    }
    if features.paragraph_count > 0 && (50.0..=1000.0).contains(&features.mean_paragraph_chars) {
        score += 0.2;
    }
    if features.has_flow_word {
        score += 0.2;
    }
    if features.sentence_count > 0 {
        score += 0.3;
    }

    clamp_unit(score)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
