//! Shared line and token patterns.
//!
//! The quality engine and the hierarchy comparator both classify lines as
//! headings or list items; they read from this one catalog so the two never
//! disagree about what a heading is.

use anyhow::{Context, Result};
use regex::Regex;

const HEADING_PATTERNS: [(&str, &str); 4] = [
    ("markdown", r"^#+\s+(.+)$"),
    ("numbered_section", r"^(\d+\.?\s*[A-Z][^.]*\.?)\s*$"),
    ("all_caps", r"^([A-Z][A-Z\s]{2,})\s*$"),
    ("title_case", r"^([A-Z][a-z\s]{3,})\s*$"),
];

const LIST_PATTERNS: [(&str, &str); 4] = [
    ("bullet", r"^[•·▪▫◦‣⁃]\s+(.+)$"),
    ("dash", r"^[-*]\s+(.+)$"),
    ("numbered", r"^\d+[.)]\s+(.+)$"),
    ("lettered", r"^[a-zA-Z][.)]\s+(.+)$"),
];

#[derive(Debug)]
pub struct LabeledPattern {
    pub label: &'static str,
    pub regex: Regex,
}

#[derive(Debug)]
pub struct PatternCatalog {
    headings: Vec<LabeledPattern>,
    lists: Vec<LabeledPattern>,
    sentence_boundary: Regex,
    consonant_run: Regex,
    flow_word: Regex,
}

impl PatternCatalog {
    pub fn new() -> Result<Self> {
        Ok(Self {
            headings: compile_labeled(&HEADING_PATTERNS, "heading")?,
            lists: compile_labeled(&LIST_PATTERNS, "list")?,
            sentence_boundary: Regex::new(r"[.!?]+")
                .context("failed to compile sentence boundary regex")?,
            consonant_run: Regex::new(r"[bcdfghjklmnpqrstvwxyzBCDFGHJKLMNPQRSTVWXYZ]{6,}")
                .context("failed to compile consonant run regex")?,
            flow_word: Regex::new(r"\b(first|second|third|finally|conclusion|introduction)\b")
                .context("failed to compile flow word regex")?,
        })
    }

    /// Label of the first heading pattern matching the trimmed line.
    pub fn heading_label(&self, line: &str) -> Option<&'static str> {
        first_match(&self.headings, line.trim())
    }

    /// Label of the first list pattern matching the trimmed line.
    pub fn list_label(&self, line: &str) -> Option<&'static str> {
        first_match(&self.lists, line.trim())
    }

    pub fn split_sentences<'h>(&self, text: &'h str) -> regex::Split<'_, 'h> {
        self.sentence_boundary.split(text)
    }

    pub fn consonant_run_count(&self, text: &str) -> usize {
        self.consonant_run.find_iter(text).count()
    }

    /// Expects lower-cased input.
    pub fn has_flow_word(&self, lowered: &str) -> bool {
        self.flow_word.is_match(lowered)
    }
}

fn compile_labeled(
    patterns: &[(&'static str, &'static str)],
    family: &str,
) -> Result<Vec<LabeledPattern>> {
    patterns
        .iter()
        .map(|&(label, pattern)| {
            Regex::new(pattern)
                .with_context(|| format!("failed to compile {family} regex: {label}"))
                .map(|regex| LabeledPattern { label, regex })
        })
        .collect()
}

fn first_match(patterns: &[LabeledPattern], line: &str) -> Option<&'static str> {
    if line.is_empty() {
        return None;
    }
    patterns
        .iter()
        .find(|pattern| pattern.regex.is_match(line))
        .map(|pattern| pattern.label)
}

#[cfg(test)]
mod tests {
    use super::PatternCatalog;

    #[test]
    fn heading_labels_follow_catalog_order() {
        let catalog = PatternCatalog::new().expect("catalog compiles");
        assert_eq!(catalog.heading_label("## Section 1: Overview"), Some("markdown"));
        assert_eq!(catalog.heading_label("4. Results and discussion"), Some("numbered_section"));
        assert_eq!(catalog.heading_label("GENERAL PROVISIONS"), Some("all_caps"));
        assert_eq!(catalog.heading_label("  Conclusion  "), Some("title_case"));
        assert_eq!(catalog.heading_label("This line ends with a period."), None);
        assert_eq!(catalog.heading_label("   "), None);
    }

    #[test]
    fn list_labels_cover_bullets_numbers_and_letters() {
        let catalog = PatternCatalog::new().expect("catalog compiles");
        assert_eq!(catalog.list_label("• First key concept"), Some("bullet"));
        assert_eq!(catalog.list_label("- Technical detail A"), Some("dash"));
        assert_eq!(catalog.list_label("* starred"), Some("dash"));
        assert_eq!(catalog.list_label("2) Second step"), Some("numbered"));
        assert_eq!(catalog.list_label("b. option"), Some("lettered"));
        assert_eq!(catalog.list_label("plain sentence"), None);
    }

    #[test]
    fn token_patterns_count_runs_and_flow_words() {
        let catalog = PatternCatalog::new().expect("catalog compiles");
        assert_eq!(catalog.consonant_run_count("kjsdhf ksdjfh strengths xyz"), 2);
        assert!(catalog.has_flow_word("in conclusion, it works"));
        assert!(!catalog.has_flow_word("firstly"));
        let sentences: Vec<&str> = catalog.split_sentences("One. Two!? Three").collect();
        assert_eq!(sentences, vec!["One", " Two", " Three"]);
    }
}
