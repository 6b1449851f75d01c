use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One parser's output for one document, as handed over by the parser adapters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    #[serde(default = "unknown_parser")]
    pub parser_name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub tables: Vec<Value>,
    #[serde(default)]
    pub images: Vec<Value>,
    /// Overrides `tables.len()` when the adapter only reports a count.
    #[serde(default)]
    pub table_count: Option<usize>,
    #[serde(default)]
    pub image_count: Option<usize>,
}

fn unknown_parser() -> String {
    "Unknown".to_string()
}

impl ParsedDocument {
    pub fn table_count(&self) -> usize {
        self.table_count.unwrap_or(self.tables.len())
    }

    pub fn image_count(&self) -> usize {
        self.image_count.unwrap_or(self.images.len())
    }

    /// Upstream failure reported by the parser adapter, if any.
    pub fn upstream_error(&self) -> Option<String> {
        match self.metadata.get("error")? {
            Value::Null => None,
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInputEntry {
    pub path: String,
    pub sha256: String,
    pub parser_name: String,
    pub skipped: bool,
    pub skip_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRunManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub input_count: usize,
    pub assessed_count: usize,
    pub inputs: Vec<ComparisonInputEntry>,
    pub best_parser: Option<String>,
    pub best_quality: Option<f64>,
    pub warnings: Vec<String>,
}
