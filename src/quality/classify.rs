use serde::{Deserialize, Serialize};

use crate::bands::{BandTable, Threshold};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Medium,
    Low,
    #[serde(rename = "Very Low")]
    VeryLow,
}

impl ConfidenceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::VeryLow => "Very Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    D,
    F,
}

impl QualityGrade {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

pub const CONFIDENCE_BANDS: BandTable<ConfidenceLevel> = BandTable {
    bands: &[
        (0.80, ConfidenceLevel::VeryHigh),
        (0.65, ConfidenceLevel::High),
        (0.50, ConfidenceLevel::Medium),
        (0.30, ConfidenceLevel::Low),
    ],
    floor: ConfidenceLevel::VeryLow,
    threshold: Threshold::AtLeast,
};

pub const GRADE_BANDS: BandTable<QualityGrade> = BandTable {
    bands: &[
        (0.90, QualityGrade::APlus),
        (0.80, QualityGrade::A),
        (0.70, QualityGrade::BPlus),
        (0.60, QualityGrade::B),
        (0.50, QualityGrade::CPlus),
        (0.40, QualityGrade::C),
        (0.30, QualityGrade::D),
    ],
    floor: QualityGrade::F,
    threshold: Threshold::AtLeast,
};

/// Sample standard deviation bands for agreement between parsers.
pub const CONSENSUS_BANDS: BandTable<&str> = BandTable {
    bands: &[(0.2, "Low"), (0.1, "Medium")],
    floor: "High",
    threshold: Threshold::AtLeast,
};

pub fn confidence_level(overall: f64) -> ConfidenceLevel {
    CONFIDENCE_BANDS.classify(overall)
}

pub fn quality_grade(overall: f64) -> QualityGrade {
    GRADE_BANDS.classify(overall)
}
