use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::CovenantResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedMetadata {
    pub parties: Vec<String>,
    pub effective_date: Option<String>,
    pub contract_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub raw_text: String,
    pub sections: BTreeMap<String, String>,
    pub tables: Vec<String>,
    pub metadata: ParsedMetadata,
}

/// PDFParser (collaborator, §6). Out of scope for the core's implementation;
/// the core only depends on this shape. Treated as a suspension point like
/// the other three collaborators (§5) since it does real I/O-bound work.
#[allow(async_fn_in_trait)]
pub trait PdfParser: Send + Sync {
    async fn parse(&self, bytes: &[u8], filename: &str) -> CovenantResult<ParsedDocument>;
}
