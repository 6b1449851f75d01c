use anyhow::Result;
use tracing::info;

use crate::cli::ScanArgs;
use crate::scan::{ScanDetector, ScanInputs};
use crate::util::{emit_json, read_json};

pub fn run(args: ScanArgs) -> Result<()> {
    let inputs: ScanInputs = read_json(&args.input)?;

    let detector = ScanDetector::new()?;
    let report = detector.analyze(&inputs);
    emit_json(args.output.as_deref(), &report)?;

    info!(
        confidence = report.scan_detection.confidence,
        likely_scanned = report.scan_detection.likely_scanned,
        ocr_needed = report.ocr_assessment.ocr_needed,
        "scan detection completed"
    );

    Ok(())
}
