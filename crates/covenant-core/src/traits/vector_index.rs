use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::CovenantResult;
use crate::models::DocumentChunk;

/// A single neighbour returned by `VectorIndex::search` (§6). `distance` is
/// in `[0, 2]`; the core converts `relevance_score = 1 - distance`, clamped
/// to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct VectorHit {
    pub chunk_id: String,
    pub contract_id: String,
    pub text: String,
    pub metadata: BTreeMap<String, String>,
    pub distance: f64,
}

impl VectorHit {
    pub fn relevance_score(&self) -> f64 {
        (1.0 - self.distance).clamp(0.0, 1.0)
    }
}

/// A vector search query, either raw text (to be embedded by the
/// implementation) or a pre-computed embedding.
pub enum VectorQuery<'a> {
    Text(&'a str),
    Embedding(&'a [f32]),
}

/// VectorIndex (collaborator, §6). Stores chunked document text with
/// embeddings and returns ranked neighbours by cosine distance. A suspension
/// point (§5).
#[allow(async_fn_in_trait)]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, chunks: &[DocumentChunk]) -> CovenantResult<()>;

    async fn search(
        &self,
        query: VectorQuery<'_>,
        n_results: usize,
        contract_id_filter: Option<&str>,
    ) -> CovenantResult<Vec<VectorHit>>;

    /// Deletes chunks whose metadata matches `where_contract_id` and returns
    /// the count removed.
    async fn delete(&self, where_contract_id: &str) -> CovenantResult<usize>;
}

/// Lets callers share one index between AnalysisPipeline and QueryPipeline
/// via `Arc<V>` without a second trait bound.
impl<T: VectorIndex> VectorIndex for Arc<T> {
    async fn upsert(&self, chunks: &[DocumentChunk]) -> CovenantResult<()> {
        T::upsert(self, chunks).await
    }

    async fn search(&self, query: VectorQuery<'_>, n_results: usize, contract_id_filter: Option<&str>) -> CovenantResult<Vec<VectorHit>> {
        T::search(self, query, n_results, contract_id_filter).await
    }

    async fn delete(&self, where_contract_id: &str) -> CovenantResult<usize> {
        T::delete(self, where_contract_id).await
    }
}
