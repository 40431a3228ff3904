//! Retrieval-augmented generation core: chunking, embedding storage,
//! relatedness ranking, and prompt assembly.

mod chunker;
mod prompt;
mod retriever;
mod store;

pub use chunker::{chunk_text, preprocess, token_windows};
pub use prompt::{build_query_message, FALLBACK_ANSWER, INSTRUCTION};
pub use retriever::{rank_by_relatedness, ScoredChunk};
pub use store::{cosine_similarity, Chunk, EmbeddingStore};
