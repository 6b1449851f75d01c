use std::path::Path;

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::cli::CompareArgs;
use crate::commands::assess::build_assessor;
use crate::model::{ComparisonInputEntry, ComparisonRunManifest, ParsedDocument};
use crate::util::{emit_json, now_utc_string, read_json, sha256_file, write_json_pretty};

pub fn run(args: CompareArgs) -> Result<()> {
    let assessor = build_assessor(args.weights.as_deref())?;

    let mut entries = Vec::with_capacity(args.inputs.len());
    let mut documents = Vec::with_capacity(args.inputs.len());
    let mut warnings = Vec::new();

    for path in &args.inputs {
        let (entry, document) = load_input(path, args.include_failed)?;
        if let Some(reason) = &entry.skip_reason {
            warn!(
                path = %path.display(),
                parser = %entry.parser_name,
                reason = %reason,
                "skipping parse result"
            );
            warnings.push(format!("{}: {reason}", path.display()));
        }
        if let Some(document) = document {
            documents.push(document);
        }
        entries.push(entry);
    }

    let Some(comparison) = assessor.assess_many(&documents) else {
        bail!(
            "no parse results left to compare ({} skipped); pass --include-failed to score failed results",
            entries.len()
        );
    };

    emit_json(args.output.as_deref(), &comparison)?;

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = ComparisonRunManifest {
            manifest_version: 1,
            generated_at: now_utc_string(),
            input_count: entries.len(),
            assessed_count: comparison.assessments.len(),
            inputs: entries,
            best_parser: Some(comparison.best_parser.clone()),
            best_quality: Some(comparison.best_quality),
            warnings,
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote comparison manifest");
    }

    info!(
        assessed = comparison.assessments.len(),
        best_parser = %comparison.best_parser,
        best_quality = comparison.best_quality,
        consensus = %comparison.consensus_level,
        "comparison completed"
    );

    Ok(())
}

/// Reads one parse result; the document is `None` when it was skipped.
fn load_input(
    path: &Path,
    include_failed: bool,
) -> Result<(ComparisonInputEntry, Option<ParsedDocument>)> {
    let sha256 = sha256_file(path)?;
    let document: ParsedDocument = read_json(path)?;

    let skip_reason = match document.upstream_error() {
        Some(reason) if !include_failed => Some(format!("upstream parser error: {reason}")),
        _ => None,
    };

    let entry = ComparisonInputEntry {
        path: path.display().to_string(),
        sha256,
        parser_name: document.parser_name.clone(),
        skipped: skip_reason.is_some(),
        skip_reason,
    };
    let document = (!entry.skipped).then_some(document);

    Ok((entry, document))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn write_input(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).expect("write input");
        path
    }

    #[test]
    fn comparison_skips_failed_results_and_records_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = write_input(
            dir.path(),
            "pymupdf.json",
            r#"{ "parser_name": "PyMuPDF", "text": "The report covers the scope. However, the results are preliminary." }"#,
        );
        let failed = write_input(
            dir.path(),
            "pypdf.json",
            r#"{ "parser_name": "PyPDF", "metadata": { "error": "EOF marker not found" } }"#,
        );
        let output = dir.path().join("out").join("comparison.json");
        let manifest_path = dir.path().join("out").join("manifest.json");

        run(CompareArgs {
            inputs: vec![good, failed],
            weights: None,
            output: Some(output.clone()),
            manifest_path: Some(manifest_path.clone()),
            include_failed: false,
        })
        .expect("comparison succeeds");

        let comparison: serde_json::Value = read_json(&output).expect("comparison parses");
        assert_eq!(comparison["best_parser"], "PyMuPDF");
        assert_eq!(comparison["assessments"].as_array().map(Vec::len), Some(1));
        assert_eq!(comparison["recommendation"], "Single parser assessment completed");

        let manifest: ComparisonRunManifest = read_json(&manifest_path).expect("manifest parses");
        assert_eq!(manifest.input_count, 2);
        assert_eq!(manifest.assessed_count, 1);
        assert!(!manifest.inputs[0].skipped);
        assert!(manifest.inputs[1].skipped);
        assert_eq!(manifest.inputs[1].parser_name, "PyPDF");
        assert_eq!(manifest.inputs[0].sha256.len(), 64);
        assert_eq!(manifest.warnings.len(), 1);
    }

    #[test]
    fn all_inputs_skipped_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let failed = write_input(
            dir.path(),
            "pypdf.json",
            r#"{ "parser_name": "PyPDF", "metadata": { "error": "broken xref" } }"#,
        );

        let result = run(CompareArgs {
            inputs: vec![failed],
            weights: None,
            output: Some(dir.path().join("comparison.json")),
            manifest_path: None,
            include_failed: false,
        });
        assert!(result.is_err());
    }
}
