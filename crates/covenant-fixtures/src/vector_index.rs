//! An in-memory `VectorIndex`: linear-scan cosine distance over stored
//! chunks, shared the way `GraphManager` shares its graph — an `RwLock`
//! behind a plain struct, no interior async needed since nothing here
//! actually suspends.

use std::sync::RwLock;

use covenant_core::errors::CovenantResult;
use covenant_core::models::DocumentChunk;
use covenant_core::traits::vector_index::{VectorHit, VectorIndex, VectorQuery};

pub struct InMemoryVectorIndex {
    chunks: RwLock<Vec<DocumentChunk>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self { chunks: RwLock::new(Vec::new()) }
    }

    pub fn len(&self) -> usize {
        self.chunks.read().expect("vector index lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deterministic bag-of-words hash embedding, so a text query against
    /// this fixture behaves consistently without wiring in a real embedder.
    fn embed_query(text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; 32];
        for word in text.split_whitespace() {
            let hash = word.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            vector[(hash as usize) % vector.len()] += 1.0;
        }
        normalize(&mut vector);
        vector
    }
}

impl Default for InMemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

/// Distance in `[0, 2]` as the collaborator contract requires (§6).
fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 1.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    let similarity = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
    (1.0 - similarity as f64).clamp(0.0, 2.0)
}

impl VectorIndex for InMemoryVectorIndex {
    /// Same `chunk_id` twice leaves exactly one chunk (§8).
    async fn upsert(&self, chunks: &[DocumentChunk]) -> CovenantResult<()> {
        let mut stored = self.chunks.write().expect("vector index lock poisoned");
        for chunk in chunks {
            if let Some(existing) = stored.iter_mut().find(|c| c.chunk_id == chunk.chunk_id) {
                *existing = chunk.clone();
            } else {
                stored.push(chunk.clone());
            }
        }
        Ok(())
    }

    async fn search(&self, query: VectorQuery<'_>, n_results: usize, contract_id_filter: Option<&str>) -> CovenantResult<Vec<VectorHit>> {
        let query_embedding = match query {
            VectorQuery::Embedding(embedding) => embedding.to_vec(),
            VectorQuery::Text(text) => Self::embed_query(text),
        };

        let stored = self.chunks.read().expect("vector index lock poisoned");
        let mut hits: Vec<VectorHit> = stored
            .iter()
            .filter(|chunk| contract_id_filter.map_or(true, |filter| chunk.contract_id == filter))
            .map(|chunk| VectorHit {
                chunk_id: chunk.chunk_id.clone(),
                contract_id: chunk.contract_id.clone(),
                text: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
                distance: cosine_distance(&query_embedding, &chunk.embedding),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(n_results);
        Ok(hits)
    }

    async fn delete(&self, where_contract_id: &str) -> CovenantResult<usize> {
        let mut stored = self.chunks.write().expect("vector index lock poisoned");
        let before = stored.len();
        stored.retain(|chunk| chunk.contract_id != where_contract_id);
        Ok(before - stored.len())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn chunk(chunk_id: &str, contract_id: &str, text: &str, embedding: Vec<f32>) -> DocumentChunk {
        DocumentChunk { chunk_id: chunk_id.to_string(), contract_id: contract_id.to_string(), section_name: "body".to_string(), chunk_index: 0, text: text.to_string(), embedding, metadata: BTreeMap::new() }
    }

    #[tokio::test]
    async fn upsert_with_same_chunk_id_replaces_not_duplicates() {
        let index = InMemoryVectorIndex::new();
        index.upsert(&[chunk("c1", "k1", "first", vec![1.0, 0.0])]).await.unwrap();
        index.upsert(&[chunk("c1", "k1", "second", vec![0.0, 1.0])]).await.unwrap();
        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn search_ranks_by_ascending_cosine_distance() {
        let index = InMemoryVectorIndex::new();
        index.upsert(&[chunk("near", "k1", "a", vec![1.0, 0.0]), chunk("far", "k1", "b", vec![0.0, 1.0])]).await.unwrap();

        let hits = index.search(VectorQuery::Embedding(&[1.0, 0.0]), 2, None).await.unwrap();
        assert_eq!(hits[0].chunk_id, "near");
        assert!(hits[0].distance < hits[1].distance);
    }

    #[tokio::test]
    async fn delete_removes_only_the_matching_contract() {
        let index = InMemoryVectorIndex::new();
        index.upsert(&[chunk("c1", "k1", "a", vec![1.0, 0.0]), chunk("c2", "k2", "b", vec![0.0, 1.0])]).await.unwrap();
        let removed = index.delete("k1").await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(index.len(), 1);
    }
}
