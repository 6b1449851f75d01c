use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::patterns::PatternCatalog;

const COHERENCE_MARKERS: [&str; 9] = [
    "however",
    "therefore",
    "moreover",
    "furthermore",
    "additionally",
    "consequently",
    "meanwhile",
    "subsequently",
    "nevertheless",
];

const TRUNCATION_MARKERS: [&str; 4] = ["...", "[truncated]", "[continued]", "Page 1 of"];

// Excludes `!`: exclamation runs count as noise.
const BASIC_PUNCTUATION: [char; 10] = ['.', ',', ';', ':', '?', '(', ')', '-', '"', '\''];

const MIN_SENTENCE_CHARS: usize = 5;
const MIN_COMPLETE_SENTENCE_CHARS: usize = 10;
const MIN_REPEATED_RUN: usize = 4;

/// Raw counts reported alongside every quality report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub character_count: usize,
    pub word_count: usize,
    pub line_count: usize,
    pub paragraph_count: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        Self {
            character_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
            line_count: text.lines().count(),
            paragraph_count: paragraphs(text).count(),
        }
    }
}

/// Statistical and structural features of one extracted text.
///
/// Blank input produces `TextFeatures::default()` with `is_blank` set, so
/// every ratio below is zero rather than undefined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFeatures {
    pub is_blank: bool,
    pub char_count: usize,
    pub word_count: usize,
    pub line_count: usize,
    pub paragraph_count: usize,
    pub sentence_count: usize,
    pub complete_sentence_count: usize,
    pub mean_sentence_words: f64,
    pub capitalized_sentence_ratio: f64,
    pub vocabulary_ratio: f64,
    pub coherence_markers: usize,
    pub mean_paragraph_chars: f64,
    pub heading_lines: usize,
    pub list_lines: usize,
    pub has_flow_word: bool,
    pub special_char_ratio: f64,
    pub repeated_runs: usize,
    pub consonant_runs: usize,
    pub single_char_token_ratio: f64,
    pub truncated: bool,
}

pub fn extract_features(catalog: &PatternCatalog, text: &str) -> TextFeatures {
    if text.trim().is_empty() {
        return TextFeatures {
            is_blank: true,
            ..TextFeatures::default()
        };
    }

    let char_count = text.chars().count();
    let words: Vec<&str> = text.split_whitespace().collect();

    let sentences: Vec<&str> = catalog
        .split_sentences(text)
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .collect();
    let complete_sentence_count = sentences
        .iter()
        .filter(|sentence| sentence.chars().count() > MIN_COMPLETE_SENTENCE_CHARS)
        .count();
    let mean_sentence_words = mean(
        sentences
            .iter()
            .map(|sentence| sentence.split_whitespace().count() as f64),
    );
    let capitalized = sentences
        .iter()
        .filter(|sentence| sentence.chars().next().is_some_and(char::is_uppercase))
        .count();

    let unique_words: HashSet<String> = words
        .iter()
        .map(|word| strip_ascii_punctuation(&word.to_lowercase()).to_string())
        .collect();

    let lowered = text.to_lowercase();
    let coherence_markers = COHERENCE_MARKERS
        .iter()
        .filter(|marker| lowered.contains(*marker))
        .count();

    let paragraph_lengths: Vec<f64> = paragraphs(text)
        .map(|paragraph| paragraph.chars().count() as f64)
        .collect();

    let (heading_lines, list_lines) = text.lines().fold((0, 0), |(headings, lists), line| {
        (
            headings + usize::from(catalog.heading_label(line).is_some()),
            lists + usize::from(catalog.list_label(line).is_some()),
        )
    });

    let special_chars = text
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace() && !BASIC_PUNCTUATION.contains(c))
        .count();
    let single_char_tokens = words
        .iter()
        .filter(|word| strip_ascii_punctuation(word).chars().count() == 1)
        .count();

    TextFeatures {
        is_blank: false,
        char_count,
        word_count: words.len(),
        line_count: text.lines().count(),
        paragraph_count: paragraph_lengths.len(),
        sentence_count: sentences.len(),
        complete_sentence_count,
        mean_sentence_words,
        capitalized_sentence_ratio: ratio(capitalized, sentences.len()),
        vocabulary_ratio: ratio(unique_words.len(), words.len()),
        coherence_markers,
        mean_paragraph_chars: mean(paragraph_lengths.iter().copied()),
        heading_lines,
        list_lines,
        has_flow_word: catalog.has_flow_word(&lowered),
        special_char_ratio: ratio(special_chars, char_count),
        repeated_runs: repeated_run_count(text),
        consonant_runs: catalog.consonant_run_count(text),
        single_char_token_ratio: ratio(single_char_tokens, words.len()),
        truncated: TRUNCATION_MARKERS
            .iter()
            .any(|marker| text.contains(marker)),
    }
}

fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n")
        .filter(|paragraph| !paragraph.trim().is_empty())
}

fn strip_ascii_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| c.is_ascii_punctuation())
}

/// Counts maximal runs of four or more identical characters, newlines excluded.
fn repeated_run_count(text: &str) -> usize {
    let mut count = 0;
    let mut previous: Option<char> = None;
    let mut run = 0_usize;

    for c in text.chars() {
        if previous == Some(c) {
            run += 1;
        } else {
            previous = Some(c);
            run = 1;
        }
        if run == MIN_REPEATED_RUN && c != '\n' {
            count += 1;
        }
    }

    count
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(sum, count), value| {
        (sum + value, count + 1)
    });
    if count == 0 { 0.0 } else { sum / count as f64 }
}
