//! # docchat
//!
//! Retrieval-augmented question answering over a single document.
//!
//! Ingestion flows one way: document → extracted pages → cleaned text →
//! token-bounded chunks → embeddings → in-memory store. Querying flows
//! the other way: question → relatedness-ranked chunks → token-budgeted
//! prompt → generated answer.
//!
//! ## Module Overview
//!
//! - [`config`] - TOML configuration for providers, models, and token limits
//! - [`tokenizer`] - BPE token counting/encoding/decoding per model name
//! - [`extract`] - Document-source seam and `{documentId}-{pageIndex}.txt` page persistence
//! - [`rag`] - Chunking, embedding store, cosine-relatedness ranking, prompt assembly
//! - [`llm`] - Embedding/chat provider traits and the OpenAI-compatible client
//! - [`session`] - The QA orchestrator: `ingest(document)` and `ask(query)`

pub mod config;
pub mod extract;
pub mod llm;
pub mod rag;
pub mod session;
pub mod tokenizer;
