use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A bounded-length slice of a document's text, the unit of vector indexing (GLOSSARY).
/// Owned by VectorIndex; `chunk_id` is unique globally (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub chunk_id: String,
    pub contract_id: String,
    pub section_name: String,
    pub chunk_index: usize,
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: BTreeMap<String, String>,
}
