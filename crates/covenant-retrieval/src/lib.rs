//! # covenant-retrieval
//!
//! GraphContextRetriever and HybridRetriever: typed graph reads and an RRF
//! fusion of vector and graph search results (§4.3, §4.4).

pub mod graph_context;
pub mod hybrid;
pub mod rrf;

pub use graph_context::GraphContextRetriever;
pub use hybrid::{HybridRetriever, RetrieveOptions};
pub use rrf::{merge, RrfCandidate};
