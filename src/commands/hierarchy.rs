use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::HierarchyArgs;
use crate::hierarchy::{HierarchyAnalyzer, VisualInput};
use crate::util::{emit_json, read_json};

pub fn run(args: HierarchyArgs) -> Result<()> {
    let text = fs::read_to_string(&args.text)
        .with_context(|| format!("failed to read extracted text: {}", args.text.display()))?;

    let visual = match &args.visual {
        Some(path) => Some(read_json::<VisualInput>(path)?.into_profile()),
        None => None,
    };

    let analyzer = HierarchyAnalyzer::new()?;
    let analysis = analyzer.analyze(&text, visual.as_ref());
    emit_json(args.output.as_deref(), &analysis)?;

    info!(
        headings = analysis.text_hierarchy.heading_count,
        lists = analysis.text_hierarchy.list_count,
        quality = %analysis.overall_assessment.hierarchy_quality,
        "hierarchy analysis completed"
    );

    Ok(())
}
