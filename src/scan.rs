//! Scanned-document detection from native extraction measurements.
//!
//! Evidence comes from four indicators; only the indicators whose inputs are
//! present contribute to the denominator, so a missing measurement never
//! counts as evidence either way.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bands::{BandTable, Threshold};
use crate::patterns::PatternCatalog;

pub const LARGE_IMAGE_PIXELS: u64 = 500_000;
pub const SCANNED_CONFIDENCE: f64 = 60.0;
const IMAGE_HEAVY_COUNT: usize = 5;
const POOR_NATIVE_QUALITY: f64 = 50.0;

/// What one native extractor produced. A quality score or character count
/// that is absent is derived from `text` when the text is supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NativeExtraction {
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub character_count: Option<usize>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGeometry {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub page: Option<u32>,
}

impl ImageGeometry {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanInputs {
    #[serde(default)]
    pub primary: NativeExtraction,
    #[serde(default)]
    pub secondary: NativeExtraction,
    #[serde(default)]
    pub page_count: Option<usize>,
    /// `None` when image detection did not run; an empty list means it ran
    /// and found nothing.
    #[serde(default)]
    pub images: Option<Vec<ImageGeometry>>,
}

/// Resolved measurements: averages of the two extractors where both exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanMeasures {
    pub avg_quality: Option<f64>,
    pub avg_characters: Option<f64>,
    pub page_count: Option<usize>,
    pub images: Option<Vec<ImageGeometry>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanIndicator {
    NativeQuality,
    ImageDensity,
    LargeImages,
    TextVolume,
}

impl ScanIndicator {
    fn max_points(self) -> f64 {
        match self {
            Self::NativeQuality => 30.0,
            Self::ImageDensity => 25.0,
            Self::LargeImages => 25.0,
            Self::TextVolume => 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEvidence {
    pub confidence: f64,
    pub likely_scanned: bool,
    pub evidence: Vec<String>,
    pub evaluated: Vec<ScanIndicator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Scanned,
    Mixed,
    Digital,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionApproach {
    NativeExtraction,
    HybridOcr,
    OcrOnly,
}

impl ExtractionQuality {
    pub fn approach(self) -> ExtractionApproach {
        match self {
            Self::Excellent | Self::Good => ExtractionApproach::NativeExtraction,
            Self::Fair => ExtractionApproach::HybridOcr,
            Self::Poor => ExtractionApproach::OcrOnly,
        }
    }
}

const DOCUMENT_TYPE_BANDS: BandTable<DocumentType> = BandTable {
    bands: &[(80.0, DocumentType::Scanned), (40.0, DocumentType::Mixed)],
    floor: DocumentType::Digital,
    threshold: Threshold::Above,
};

const EXTRACTION_QUALITY_BANDS: BandTable<ExtractionQuality> = BandTable {
    bands: &[
        (70.0, ExtractionQuality::Excellent),
        (50.0, ExtractionQuality::Good),
        (30.0, ExtractionQuality::Fair),
    ],
    floor: ExtractionQuality::Poor,
    threshold: Threshold::Above,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrAssessment {
    pub ocr_needed: bool,
    pub document_type: DocumentType,
    pub extraction_quality: ExtractionQuality,
    pub recommended_approach: ExtractionApproach,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_detection: ScanEvidence,
    pub native_quality: Option<f64>,
    pub ocr_assessment: OcrAssessment,
    pub recommendations: Vec<String>,
}

#[derive(Debug)]
pub struct ScanDetector {
    catalog: PatternCatalog,
}

impl ScanDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            catalog: PatternCatalog::new()?,
        })
    }

    /// Heuristic 0-100 score for natively extracted text.
    pub fn native_text_quality(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let total_chars = text.chars().count();
        let alpha_chars = text.chars().filter(|c| c.is_alphabetic()).count();
        let mut score = (alpha_chars as f64 / total_chars as f64 * 100.0).min(40.0);

        let words: Vec<&str> = text.split_whitespace().collect();
        let valid_words = words
            .iter()
            .filter(|word| word.chars().count() > 1 && word.chars().any(char::is_alphabetic))
            .count();
        score += valid_words as f64 / words.len() as f64 * 30.0;

        let sentences = self.catalog.split_sentences(text).count();
        let density = sentences as f64 / (words.len() as f64 / 10.0).max(1.0);
        score += density.min(1.0) * 20.0;

        let line_lengths: Vec<usize> = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().count())
            .collect();
        let mean_line = line_lengths.iter().sum::<usize>() as f64 / line_lengths.len() as f64;
        if mean_line > 10.0 {
            score += 10.0;
        }

        score.min(100.0)
    }

    pub fn measures(&self, inputs: &ScanInputs) -> ScanMeasures {
        let quality = |extraction: &NativeExtraction| {
            extraction.quality_score.or_else(|| {
                extraction
                    .text
                    .as_deref()
                    .map(|text| self.native_text_quality(text))
            })
        };
        let characters = |extraction: &NativeExtraction| {
            extraction.character_count.or_else(|| {
                extraction
                    .text
                    .as_deref()
                    .map(|text| text.chars().count())
            })
        };

        ScanMeasures {
            avg_quality: mean_of_pair(quality(&inputs.primary), quality(&inputs.secondary)),
            avg_characters: mean_of_pair(
                characters(&inputs.primary).map(|count| count as f64),
                characters(&inputs.secondary).map(|count| count as f64),
            ),
            page_count: inputs.page_count,
            images: inputs.images.clone(),
        }
    }

    pub fn analyze(&self, inputs: &ScanInputs) -> ScanReport {
        let measures = self.measures(inputs);
        let scan_detection = detect_scanned(&measures);
        let ocr_assessment = assess_ocr(&scan_detection, measures.avg_quality);
        let recommendations = ocr_recommendations(&scan_detection, &measures);

        debug!(
            confidence = scan_detection.confidence,
            likely_scanned = scan_detection.likely_scanned,
            evaluated = scan_detection.evaluated.len(),
            "scanned-document detection finished"
        );

        ScanReport {
            scan_detection,
            native_quality: measures.avg_quality,
            ocr_assessment,
            recommendations,
        }
    }
}

fn mean_of_pair(first: Option<f64>, second: Option<f64>) -> Option<f64> {
    Some((first? + second?) / 2.0)
}

pub fn detect_scanned(measures: &ScanMeasures) -> ScanEvidence {
    let mut points = 0.0;
    let mut evaluated = Vec::new();
    let mut evidence = Vec::new();

    if let Some(quality) = measures.avg_quality {
        evaluated.push(ScanIndicator::NativeQuality);
        if quality < 20.0 {
            points += 30.0;
            evidence.push("Very poor native text extraction quality".to_string());
        } else if quality < 50.0 {
            points += 15.0;
            evidence.push("Poor native text extraction quality".to_string());
        }
    }

    if let (Some(images), Some(pages)) = (&measures.images, measures.page_count) {
        if pages > 0 {
            evaluated.push(ScanIndicator::ImageDensity);
            let per_page = images.len() as f64 / pages as f64;
            if per_page >= 1.0 {
                points += 25.0;
                evidence.push(format!("High image density: {per_page:.1} images per page"));
            } else if per_page >= 0.5 {
                points += 15.0;
                evidence.push(format!("Moderate image density: {per_page:.1} images per page"));
            }
        }
    }

    if let Some(images) = measures.images.as_deref().filter(|images| !images.is_empty()) {
        evaluated.push(ScanIndicator::LargeImages);
        let large = images
            .iter()
            .filter(|image| image.area() > LARGE_IMAGE_PIXELS)
            .count();
        let large_ratio = large as f64 / images.len() as f64;
        if large_ratio > 0.7 {
            points += 25.0;
            evidence.push("Many large images detected (likely full-page scans)".to_string());
        } else if large_ratio > 0.3 {
            points += 15.0;
            evidence.push("Some large images detected".to_string());
        }
    }

    if let Some(characters) = measures.avg_characters {
        evaluated.push(ScanIndicator::TextVolume);
        if characters < 100.0 {
            points += 20.0;
            evidence.push("Very little extractable text".to_string());
        } else if characters < 500.0 {
            points += 10.0;
            evidence.push("Limited extractable text".to_string());
        }
    }

    let max_points: f64 = evaluated.iter().map(|indicator| indicator.max_points()).sum();
    let confidence = if max_points > 0.0 {
        100.0 * points / max_points
    } else {
        0.0
    };

    if evidence.is_empty() {
        evidence.push("Document appears to have good native text extraction".to_string());
    }

    ScanEvidence {
        confidence,
        likely_scanned: confidence > SCANNED_CONFIDENCE,
        evidence,
        evaluated,
    }
}

/// Missing native quality is treated as 0.
pub fn assess_ocr(detection: &ScanEvidence, avg_quality: Option<f64>) -> OcrAssessment {
    let quality = avg_quality.unwrap_or(0.0);
    let extraction_quality = EXTRACTION_QUALITY_BANDS.classify(quality);

    OcrAssessment {
        ocr_needed: detection.confidence > SCANNED_CONFIDENCE,
        document_type: DOCUMENT_TYPE_BANDS.classify(detection.confidence),
        extraction_quality,
        recommended_approach: extraction_quality.approach(),
        confidence: ((quality + (100.0 - detection.confidence)) / 2.0).min(100.0),
    }
}

pub fn ocr_recommendations(detection: &ScanEvidence, measures: &ScanMeasures) -> Vec<String> {
    let mut advice = Vec::new();

    if detection.likely_scanned {
        advice.push("Document appears to be scanned - OCR processing recommended".to_string());
        advice.push("Consider using image preprocessing to improve OCR accuracy".to_string());
    }
    if measures.avg_quality.unwrap_or(0.0) < POOR_NATIVE_QUALITY {
        advice.push("Poor native text extraction - try OCR-based parsers".to_string());
    }
    if measures.images.as_ref().map_or(0, Vec::len) > IMAGE_HEAVY_COUNT {
        advice.push("Document contains many images - check for embedded text".to_string());
    }

    if advice.is_empty() {
        advice.push("Document has good native text extraction - OCR not needed".to_string());
    }
    advice
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANGRAM: &str = "The quick brown fox jumps over the lazy dog.";

    fn detector() -> ScanDetector {
        ScanDetector::new().expect("patterns compile")
    }

    fn image(width: u32, height: u32) -> ImageGeometry {
        ImageGeometry {
            width,
            height,
            page: None,
        }
    }

    fn measures(quality: Option<f64>, characters: Option<f64>) -> ScanMeasures {
        ScanMeasures {
            avg_quality: quality,
            avg_characters: characters,
            ..ScanMeasures::default()
        }
    }

    #[test]
    fn digital_document_without_images_is_not_scanned() {
        let inputs = ScanMeasures {
            avg_quality: Some(80.0),
            avg_characters: Some(1_000.0),
            page_count: Some(3),
            images: Some(Vec::new()),
        };
        let result = detect_scanned(&inputs);

        assert_eq!(result.confidence, 0.0);
        assert!(!result.likely_scanned);
        assert_eq!(
            result.evidence,
            vec!["Document appears to have good native text extraction".to_string()]
        );
        assert_eq!(
            result.evaluated,
            vec![
                ScanIndicator::NativeQuality,
                ScanIndicator::ImageDensity,
                ScanIndicator::TextVolume,
            ]
        );
    }

    #[test]
    fn every_indicator_triggered_reaches_full_confidence() {
        let inputs = ScanMeasures {
            avg_quality: Some(10.0),
            avg_characters: Some(20.0),
            page_count: Some(2),
            images: Some(vec![image(1_200, 1_600); 3]),
        };
        let result = detect_scanned(&inputs);

        assert_eq!(result.confidence, 100.0);
        assert!(result.likely_scanned);
        assert_eq!(
            result.evidence,
            vec![
                "Very poor native text extraction quality".to_string(),
                "High image density: 1.5 images per page".to_string(),
                "Many large images detected (likely full-page scans)".to_string(),
                "Very little extractable text".to_string(),
            ]
        );
    }

    #[test]
    fn confidence_only_counts_evaluated_indicators() {
        let result = detect_scanned(&measures(Some(35.0), None));

        assert_eq!(result.evaluated, vec![ScanIndicator::NativeQuality]);
        assert_eq!(result.confidence, 50.0);
        assert!(!result.likely_scanned);
        assert_eq!(result.evidence, vec!["Poor native text extraction quality".to_string()]);
    }

    #[test]
    fn no_measurements_yield_zero_confidence() {
        let result = detect_scanned(&ScanMeasures::default());

        assert_eq!(result.confidence, 0.0);
        assert!(result.evaluated.is_empty());
        assert_eq!(result.evidence.len(), 1);
    }

    #[test]
    fn exactly_sixty_is_not_scanned() {
        let inputs = ScanMeasures {
            page_count: Some(4),
            images: Some(vec![image(1_000, 600), image(400, 300)]),
            ..ScanMeasures::default()
        };
        let result = detect_scanned(&inputs);

        assert_eq!(result.confidence, 60.0);
        assert!(!result.likely_scanned);
        assert_eq!(
            result.evidence,
            vec![
                "Moderate image density: 0.5 images per page".to_string(),
                "Some large images detected".to_string(),
            ]
        );
    }

    #[test]
    fn zero_pages_skip_image_density() {
        let inputs = ScanMeasures {
            page_count: Some(0),
            images: Some(vec![image(10, 10)]),
            ..ScanMeasures::default()
        };
        let result = detect_scanned(&inputs);
        assert_eq!(result.evaluated, vec![ScanIndicator::LargeImages]);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn native_quality_rewards_well_formed_prose() {
        let detector = detector();
        assert_eq!(detector.native_text_quality(PANGRAM), 100.0);
        assert_eq!(detector.native_text_quality("1 2 3 4 5"), 20.0);
        assert_eq!(detector.native_text_quality(""), 0.0);
        assert_eq!(detector.native_text_quality("  \n "), 0.0);
    }

    #[test]
    fn measures_fall_back_to_supplied_text() {
        let inputs = ScanInputs {
            primary: NativeExtraction {
                text: Some(PANGRAM.to_string()),
                ..NativeExtraction::default()
            },
            secondary: NativeExtraction {
                quality_score: Some(100.0),
                character_count: Some(44),
                text: None,
            },
            ..ScanInputs::default()
        };
        let detector = detector();
        let resolved = detector.measures(&inputs);
        assert_eq!(resolved.avg_quality, Some(100.0));
        assert_eq!(resolved.avg_characters, Some(44.0));

        let report = detector.analyze(&inputs);
        assert_eq!(report.scan_detection.confidence, 40.0);
        assert_eq!(
            report.scan_detection.evidence,
            vec!["Very little extractable text".to_string()]
        );
    }

    #[test]
    fn one_missing_extractor_skips_the_indicator() {
        let inputs = ScanInputs {
            primary: NativeExtraction {
                quality_score: Some(12.0),
                ..NativeExtraction::default()
            },
            ..ScanInputs::default()
        };
        let resolved = detector().measures(&inputs);
        assert_eq!(resolved.avg_quality, None);
        assert_eq!(resolved.avg_characters, None);
    }

    #[test]
    fn ocr_assessment_bands() {
        let scanned = detect_scanned(&ScanMeasures {
            avg_quality: Some(10.0),
            avg_characters: Some(20.0),
            page_count: Some(2),
            images: Some(vec![image(1_200, 1_600); 3]),
        });
        let assessment = assess_ocr(&scanned, Some(10.0));
        assert!(assessment.ocr_needed);
        assert_eq!(assessment.document_type, DocumentType::Scanned);
        assert_eq!(assessment.extraction_quality, ExtractionQuality::Poor);
        assert_eq!(assessment.recommended_approach, ExtractionApproach::OcrOnly);
        assert_eq!(assessment.confidence, 5.0);

        let digital = detect_scanned(&measures(Some(80.0), Some(2_000.0)));
        let assessment = assess_ocr(&digital, Some(80.0));
        assert!(!assessment.ocr_needed);
        assert_eq!(assessment.document_type, DocumentType::Digital);
        assert_eq!(assessment.extraction_quality, ExtractionQuality::Excellent);
        assert_eq!(assessment.recommended_approach, ExtractionApproach::NativeExtraction);
        assert_eq!(assessment.confidence, 90.0);

        let mixed = ScanEvidence {
            confidence: 50.0,
            likely_scanned: false,
            evidence: Vec::new(),
            evaluated: Vec::new(),
        };
        let assessment = assess_ocr(&mixed, Some(40.0));
        assert_eq!(assessment.document_type, DocumentType::Mixed);
        assert_eq!(assessment.recommended_approach, ExtractionApproach::HybridOcr);
    }

    #[test]
    fn ocr_advice_follows_detection() {
        let scanned_measures = ScanMeasures {
            avg_quality: Some(10.0),
            avg_characters: Some(20.0),
            page_count: Some(2),
            images: Some(vec![image(1_200, 1_600); 3]),
        };
        let scanned = detect_scanned(&scanned_measures);
        assert_eq!(
            ocr_recommendations(&scanned, &scanned_measures),
            vec![
                "Document appears to be scanned - OCR processing recommended".to_string(),
                "Consider using image preprocessing to improve OCR accuracy".to_string(),
                "Poor native text extraction - try OCR-based parsers".to_string(),
            ]
        );

        let digital_measures = measures(Some(90.0), Some(5_000.0));
        let digital = detect_scanned(&digital_measures);
        assert_eq!(
            ocr_recommendations(&digital, &digital_measures),
            vec!["Document has good native text extraction - OCR not needed".to_string()]
        );

        let image_heavy = ScanMeasures {
            images: Some(vec![image(100, 100); 6]),
            ..digital_measures
        };
        assert!(
            ocr_recommendations(&digital, &image_heavy)
                .contains(&"Document contains many images - check for embedded text".to_string())
        );
    }

    #[test]
    fn document_bands_are_ordered() {
        assert!(DOCUMENT_TYPE_BANDS.is_descending());
        assert!(EXTRACTION_QUALITY_BANDS.is_descending());
        assert_eq!(DOCUMENT_TYPE_BANDS.classify(80.0), DocumentType::Mixed);
        assert_eq!(DOCUMENT_TYPE_BANDS.classify(40.0), DocumentType::Digital);
    }
}
