//! In-memory store of chunks and their embedding vectors.

/// A bounded-size slice of document text paired with its embedding.
///
/// Created during ingestion and immutable thereafter; owned exclusively
/// by the [`EmbeddingStore`].
#[derive(Debug, Clone)]
pub struct Chunk {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Append-only store of a single document's chunks, in insertion order.
///
/// The store is built in one shot by ingestion and dropped with the
/// session; no updates or deletions.
#[derive(Debug, Default)]
pub struct EmbeddingStore {
    chunks: Vec<Chunk>,
}

impl EmbeddingStore {
    pub fn new() -> Self {
        Self { chunks: Vec::new() }
    }

    /// Build a store from fully-embedded chunks. Ingestion constructs
    /// the complete chunk list first, so a mid-ingestion failure never
    /// leaves a partially-filled store behind.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    pub fn push(&mut self, text: String, embedding: Vec<f32>) {
        self.chunks.push(Chunk { text, embedding });
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Cosine similarity between two vectors.
///
/// Callers must guarantee non-zero vectors of equal dimension; a zero
/// magnitude or dimension mismatch yields 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot_product = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        dot_product += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = (norm_a * norm_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    dot_product / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_mismatched_or_empty() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_store_preserves_insertion_order() {
        let mut store = EmbeddingStore::new();
        store.push("first".to_string(), vec![1.0, 0.0]);
        store.push("second".to_string(), vec![0.0, 1.0]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.chunks()[0].text, "first");
        assert_eq!(store.chunks()[1].text, "second");
    }

    #[test]
    fn test_empty_store() {
        let store = EmbeddingStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }
}
