use serde::{Deserialize, Serialize};

use super::classify::CONSENSUS_BANDS;
use super::report::QualityReport;
use crate::util::round3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchComparison {
    pub assessments: Vec<QualityReport>,
    pub best_parser: String,
    pub best_quality: f64,
    pub quality_variance: f64,
    pub consensus_level: String,
    pub recommendation: String,
}

/// Reduces independently computed reports for one document. `None` for an
/// empty batch.
pub fn compare_reports(assessments: Vec<QualityReport>) -> Option<BatchComparison> {
    let best = best_report(&assessments)?;
    let best_parser = best.parser_name.clone();
    let best_quality = best.overall_quality;

    let qualities: Vec<f64> = assessments
        .iter()
        .map(|report| report.overall_quality)
        .collect();
    let spread = sample_std_dev(&qualities);

    let recommendation = if assessments.len() > 1 {
        format!("Use {best_parser} for best results")
    } else {
        "Single parser assessment completed".to_string()
    };

    Some(BatchComparison {
        best_parser,
        best_quality,
        quality_variance: round3(spread),
        consensus_level: CONSENSUS_BANDS.classify(spread).to_string(),
        recommendation,
        assessments,
    })
}

/// Highest reported quality; the first report wins a tie.
pub fn best_report(reports: &[QualityReport]) -> Option<&QualityReport> {
    let mut best: Option<&QualityReport> = None;
    for report in reports {
        match best {
            Some(current) if report.overall_quality <= current.overall_quality => {}
            _ => best = Some(report),
        }
    }
    best
}

/// Sample (n - 1) standard deviation; 0 for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squared: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    (squared / (n - 1.0)).sqrt()
}
