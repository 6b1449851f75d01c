use super::report::MetricBreakdown;

pub const POSITIVE_CONFIRMATION: &str =
    "Quality is good - output should be suitable for most use cases";

const BASIC_PARSERS: [&str; 1] = ["PyPDF"];
const AI_ASSISTED_PARSERS: [&str; 1] = ["LlamaParse"];

pub struct AdviceContext<'a> {
    pub metrics: &'a MetricBreakdown,
    pub parser_name: &'a str,
}

struct AdviceRule {
    applies: fn(&AdviceContext<'_>) -> bool,
    message: &'static str,
}

// Evaluated top to bottom; output order is part of the report contract.
const RULES: [AdviceRule; 7] = [
    AdviceRule {
        applies: |ctx| ctx.metrics.completeness_score < 0.6,
        message: "Consider using a different parser for better text extraction",
    },
    AdviceRule {
        applies: |ctx| ctx.metrics.semantic_quality < 0.5,
        message: "Text quality is low - manual review recommended",
    },
    AdviceRule {
        applies: |ctx| ctx.metrics.noise_level > 0.4,
        message: "High noise detected - consider post-processing cleanup",
    },
    AdviceRule {
        applies: |ctx| ctx.metrics.format_preservation < 0.4,
        message: "Formatting not well preserved - try PyMuPDF or pdfplumber for PDFs",
    },
    AdviceRule {
        applies: |ctx| ctx.metrics.content_structure < 0.4,
        message: "Document structure not well maintained - consider LlamaParse for complex layouts",
    },
    AdviceRule {
        applies: |ctx| {
            is_one_of(ctx.parser_name, &BASIC_PARSERS)
                && (ctx.metrics.format_preservation < 0.5 || ctx.metrics.content_structure < 0.5)
        },
        message: "PyPDF is basic - try PyMuPDF or pdfplumber for better results",
    },
    AdviceRule {
        applies: |ctx| {
            is_one_of(ctx.parser_name, &AI_ASSISTED_PARSERS)
                && ctx.metrics.completeness_score < 0.7
        },
        message: "LlamaParse may need better prompting or document preprocessing",
    },
];

pub fn recommendations(ctx: &AdviceContext<'_>) -> Vec<String> {
    let mut fired: Vec<String> = RULES
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(|rule| rule.message.to_string())
        .collect();

    if fired.is_empty() {
        fired.push(POSITIVE_CONFIRMATION.to_string());
    }

    fired
}

fn is_one_of(parser_name: &str, parsers: &[&str]) -> bool {
    let parser_name = parser_name.trim();
    parsers
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(parser_name))
}
