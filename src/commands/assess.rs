use std::path::Path;

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::cli::AssessArgs;
use crate::model::ParsedDocument;
use crate::quality::{MetricWeights, QualityAssessor};
use crate::util::{emit_json, read_json};

pub fn run(args: AssessArgs) -> Result<()> {
    let assessor = build_assessor(args.weights.as_deref())?;
    let document: ParsedDocument = read_json(&args.input)?;

    if let Some(reason) = document.upstream_error() {
        warn!(
            parser = %document.parser_name,
            error = %reason,
            "parse result carries an upstream error"
        );
        if !args.include_failed {
            bail!(
                "parse result {} failed upstream ({reason}); pass --include-failed to score it anyway",
                args.input.display()
            );
        }
    }

    let report = assessor.assess(&document);
    emit_json(args.output.as_deref(), &report)?;

    info!(
        parser = %report.parser_name,
        overall = report.overall_quality,
        grade = report.quality_grade.as_str(),
        confidence = report.confidence_level.as_str(),
        tables = document.table_count(),
        images = document.image_count(),
        "assessment completed"
    );

    Ok(())
}

/// Default weights unless a weights file is given; either way they are
/// validated before any scoring happens.
pub fn build_assessor(weights_path: Option<&Path>) -> Result<QualityAssessor> {
    match weights_path {
        Some(path) => {
            let weights: MetricWeights = read_json(path)?;
            info!(path = %path.display(), "loaded aggregation weights");
            QualityAssessor::with_weights(weights)
        }
        None => QualityAssessor::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn weights_file_is_validated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("weights.json");
        fs::write(
            &path,
            r#"{ "completeness": 0.5, "semantic_quality": 0.5, "noise_reduction": 0.5,
                 "format_preservation": 0.0, "content_structure": 0.0 }"#,
        )
        .expect("write weights");

        let err = build_assessor(Some(&path)).expect_err("weights sum to 1.5");
        assert!(format!("{err:#}").contains("must sum to 1.0"));
    }

    #[test]
    fn failed_upstream_result_is_rejected_unless_included() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("pypdf.json");
        let output = dir.path().join("report.json");
        fs::write(
            &input,
            r#"{ "parser_name": "PyPDF", "text": "", "metadata": { "error": "EOF marker not found" } }"#,
        )
        .expect("write input");

        let args = AssessArgs {
            input: input.clone(),
            weights: None,
            output: Some(output.clone()),
            include_failed: false,
        };
        assert!(run(args.clone()).is_err());
        assert!(!output.exists());

        run(AssessArgs {
            include_failed: true,
            ..args
        })
        .expect("included failure is scored");
        let report: serde_json::Value = read_json(&output).expect("report parses");
        assert_eq!(report["parser_name"], "PyPDF");
        assert_eq!(report["overall_quality"], 0.0);
    }
}
