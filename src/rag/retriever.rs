//! Relatedness ranking of stored chunks against a query.

use crate::llm::{Embedder, Result};

use super::store::{cosine_similarity, EmbeddingStore};

/// A chunk's text paired with its relatedness score, in [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
}

/// Rank all stored chunks by relatedness to `query` and keep the top
/// `top_n`.
///
/// The query is embedded with the same model used at ingestion;
/// relatedness is cosine similarity (`1 - cosine_distance`). This is a
/// full linear scan over the store, which holds one document's chunks,
/// not a multi-document index. Ties keep insertion order: the sort is
/// stable, so among equal scores the first-stored chunk wins.
pub fn rank_by_relatedness(
    embedder: &dyn Embedder,
    store: &EmbeddingStore,
    query: &str,
    top_n: usize,
) -> Result<Vec<ScoredChunk>> {
    if store.is_empty() {
        return Ok(Vec::new());
    }

    let query_embedding = embedder.embed(query)?;

    let mut scored: Vec<ScoredChunk> = store
        .chunks()
        .iter()
        .map(|chunk| ScoredChunk {
            text: chunk.text.clone(),
            score: cosine_similarity(&query_embedding, &chunk.embedding),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(top_n);

    Ok(scored)
}
