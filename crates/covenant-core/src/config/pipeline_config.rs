use serde::{Deserialize, Serialize};

/// AnalysisPipeline configuration: chunking geometry, prompt truncation, and
/// the soft overall deadline (§4.5, §4.5.1, §5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// `analyze_risk` truncates `parsed_text` to this many characters before
    /// building the risk prompt.
    pub risk_prompt_max_chars: usize,
    pub overall_deadline_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            risk_prompt_max_chars: 50_000,
            overall_deadline_secs: 300,
        }
    }
}
