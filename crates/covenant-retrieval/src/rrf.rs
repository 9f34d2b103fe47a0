//! Reciprocal Rank Fusion (§4.4 step 5): fuses a vector ranking and a graph
//! ranking into one `rrf_score`, summing reciprocal terms for content that
//! appears in both lists.

use std::collections::BTreeMap;

use covenant_core::models::{ResultSource, RetrievalResult};

/// One candidate from either collaborator, before fusion.
#[derive(Debug, Clone)]
pub struct RrfCandidate {
    pub contract_id: String,
    pub content: String,
    pub score: f64,
    pub metadata: BTreeMap<String, String>,
}

/// Normalises content for dedup purposes: trims and lowercases, so two
/// near-identical chunks from different collaborators fuse into one result.
fn normalize(content: &str) -> String {
    content.trim().to_lowercase()
}

/// Assigns a 1-indexed competition rank to each entry of an already
/// score-descending-sorted slice: candidates with an identical score share
/// the rank of their first occurrence, so a genuine input tie produces a
/// genuine `rrf_score` tie instead of being broken by sort position alone.
fn competition_ranks(sorted: &[&RrfCandidate]) -> Vec<f64> {
    let mut ranks = Vec::with_capacity(sorted.len());
    let mut current_rank = 0usize;
    let mut prev_score: Option<f64> = None;
    for (i, candidate) in sorted.iter().enumerate() {
        if prev_score != Some(candidate.score) {
            current_rank = i + 1;
            prev_score = Some(candidate.score);
        }
        ranks.push(current_rank as f64);
    }
    ranks
}

/// Merges `vector` and `graph` candidates, already any order, into a single
/// `rrf_score`-sorted list. `k` is the RRF constant (default 60.0, §4.4).
pub fn merge(vector: &[RrfCandidate], graph: &[RrfCandidate], k: f64) -> Vec<RetrievalResult> {
    let mut vector_ranked = vector.iter().collect::<Vec<_>>();
    vector_ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut graph_ranked = graph.iter().collect::<Vec<_>>();
    graph_ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    // normalized content -> fused state
    let mut fused: BTreeMap<String, RetrievalResult> = BTreeMap::new();

    let vector_ranks = competition_ranks(&vector_ranked);
    for (candidate, rank_v) in vector_ranked.iter().zip(vector_ranks) {
        let key = normalize(&candidate.content);
        let entry = fused.entry(key).or_insert_with(|| RetrievalResult {
            contract_id: candidate.contract_id.clone(),
            content: candidate.content.clone(),
            source: ResultSource::Vector,
            vector_score: None,
            graph_relevance: None,
            rrf_score: 0.0,
            metadata: candidate.metadata.clone(),
        });
        entry.vector_score = Some(candidate.score);
        entry.rrf_score += 1.0 / (k + rank_v);
    }

    let graph_ranks = competition_ranks(&graph_ranked);
    for (candidate, rank_g) in graph_ranked.iter().zip(graph_ranks) {
        let key = normalize(&candidate.content);
        let entry = fused.entry(key).or_insert_with(|| RetrievalResult {
            contract_id: candidate.contract_id.clone(),
            content: candidate.content.clone(),
            source: ResultSource::Graph,
            vector_score: None,
            graph_relevance: None,
            rrf_score: 0.0,
            metadata: candidate.metadata.clone(),
        });
        entry.graph_relevance = Some(candidate.score);
        entry.rrf_score += 1.0 / (k + rank_g);
    }

    let mut results: Vec<RetrievalResult> = fused.into_values().collect();
    results.sort_by(|a, b| {
        b.rrf_score
            .partial_cmp(&a.rrf_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| source_rank(a.source).cmp(&source_rank(b.source)))
            .then_with(|| a.contract_id.cmp(&b.contract_id))
            .then_with(|| a.content.cmp(&b.content))
    });
    results
}

/// Vector sorts before Graph on tie-break (§4.4: "source=vector before graph").
fn source_rank(source: ResultSource) -> u8 {
    match source {
        ResultSource::Vector => 0,
        ResultSource::Graph => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(contract_id: &str, content: &str, score: f64) -> RrfCandidate {
        RrfCandidate { contract_id: contract_id.to_string(), content: content.to_string(), score, metadata: BTreeMap::new() }
    }

    /// §8 scenario 2: a chunk appearing in both lists receives the sum of
    /// both reciprocal terms.
    #[test]
    fn overlap_sums_reciprocal_terms() {
        let vector = vec![candidate("c1", "shared clause text", 0.9), candidate("c1", "vector only", 0.5)];
        let graph = vec![candidate("c1", "shared clause text", 0.8), candidate("c1", "graph only", 0.4)];

        let merged = merge(&vector, &graph, 60.0);

        let shared = merged.iter().find(|r| r.content == "shared clause text").unwrap();
        let expected = 1.0 / 61.0 + 1.0 / 61.0;
        assert!((shared.rrf_score - expected).abs() < 1e-12);
        assert_eq!(merged[0].content, "shared clause text");
    }

    /// Exact seed scenario: vector [A(0.9), B(0.8), C(0.7)], graph [B(0.95), D(0.6)],
    /// k=60 gives A=1/61, B=1/62+1/61, C=1/63, D=1/62, ordered B, A, D, C.
    #[test]
    fn seed_scenario_overlap_ordering() {
        let vector = vec![candidate("x", "A", 0.9), candidate("x", "B", 0.8), candidate("x", "C", 0.7)];
        let graph = vec![candidate("x", "B", 0.95), candidate("x", "D", 0.6)];

        let merged = merge(&vector, &graph, 60.0);
        let order: Vec<&str> = merged.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "D", "C"]);

        let by_content = |c: &str| merged.iter().find(|r| r.content == c).unwrap();
        assert!((by_content("A").rrf_score - 1.0 / 61.0).abs() < 1e-12);
        assert!((by_content("B").rrf_score - (1.0 / 62.0 + 1.0 / 61.0)).abs() < 1e-12);
        assert!((by_content("C").rrf_score - 1.0 / 63.0).abs() < 1e-12);
        assert!((by_content("D").rrf_score - 1.0 / 62.0).abs() < 1e-12);
    }

    /// RRF monotonicity: if A outranks B in both lists, A outranks B after fusion.
    #[test]
    fn monotonic_when_one_result_outranks_another_in_both_lists() {
        let vector = vec![candidate("x", "A", 0.9), candidate("x", "B", 0.5)];
        let graph = vec![candidate("x", "A", 0.8), candidate("x", "B", 0.3)];

        let merged = merge(&vector, &graph, 60.0);
        let rank_a = merged.iter().position(|r| r.content == "A").unwrap();
        let rank_b = merged.iter().position(|r| r.content == "B").unwrap();
        assert!(rank_a < rank_b);
    }

    #[test]
    fn ties_break_by_source_then_contract_id_then_content() {
        let vector = vec![candidate("b", "zzz", 1.0), candidate("a", "aaa", 1.0)];
        let graph: Vec<RrfCandidate> = vec![];

        let merged = merge(&vector, &graph, 60.0);

        // Both are rank 1 in vector, so equal rrf_score; contract_id "a" < "b".
        assert_eq!(merged[0].contract_id, "a");
        assert_eq!(merged[1].contract_id, "b");
    }

    #[test]
    fn vector_only_result_has_no_graph_relevance() {
        let vector = vec![candidate("c1", "only here", 0.7)];
        let merged = merge(&vector, &[], 60.0);
        assert_eq!(merged[0].graph_relevance, None);
        assert_eq!(merged[0].vector_score, Some(0.7));
    }

    #[test]
    fn empty_inputs_produce_empty_output() {
        assert!(merge(&[], &[], 60.0).is_empty());
    }
}
