pub mod chunk;
pub mod contract_state;
pub mod cost;
pub mod generation;
pub mod graph_entities;
pub mod retrieval;
pub mod risk;

pub use chunk::DocumentChunk;
pub use contract_state::{ContractAnalysisState, ErrorEntry};
pub use cost::{CostBucket, CostEntry, DailyCost, Operation};
pub use generation::{ComplexityTier, GenerationResult};
pub use graph_entities::{
    ClauseNode, CompanyNode, ContractNode, GraphWrite, RelationshipKind, RiskFactorNode,
};
pub use retrieval::{GraphContext, HybridResponse, ResultSource, RetrievalResult};
pub use risk::{ConcerningClause, RiskLevel, RiskReport};
