use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "parsegrade",
    version,
    about = "Reference-free quality scoring for document parser output"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Assess(AssessArgs),
    Compare(CompareArgs),
    Hierarchy(HierarchyArgs),
    Scan(ScanArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AssessArgs {
    /// Parse result JSON produced by one parser.
    #[arg(long)]
    pub input: PathBuf,

    /// Optional JSON file overriding the five aggregation weights.
    #[arg(long)]
    pub weights: Option<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Score results whose metadata carries an upstream `error` key.
    #[arg(long, default_value_t = false)]
    pub include_failed: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[arg(long = "input", required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(long)]
    pub weights: Option<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub include_failed: bool,
}

#[derive(Args, Debug, Clone)]
pub struct HierarchyArgs {
    /// Extracted text to profile.
    #[arg(long)]
    pub text: PathBuf,

    /// Visual layout counts or detection labels from the layout model.
    #[arg(long)]
    pub visual: Option<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Native-extraction measurements and image geometry.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,
}
