//! # covenant-pipeline
//!
//! AnalysisPipeline and QueryPipeline: the staged contract-ingest workflow
//! and the retrieve-then-generate Q&A workflow built on top of
//! covenant-router and covenant-retrieval (§4.5, §4.6).

pub mod analysis;
pub mod chunking;
pub mod query;
pub mod stage;

pub use analysis::AnalysisPipeline;
pub use chunking::chunk_text;
pub use query::{AnswerSource, QueryAnswer, QueryPipeline};
pub use stage::DeadlineBudget;
