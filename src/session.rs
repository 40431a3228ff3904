//! Question-answering session over a single document.
//!
//! A [`DocumentSession`] owns the provider clients, the tokenizer, and
//! the chunk store for one uploaded document, so nothing is shared
//! across sessions. Ingestion runs extract → persist pages → preprocess
//! → chunk → embed → store; querying runs retrieve → assemble → generate.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use crate::extract::{document_id, DocumentSource, ExtractionError, PageStore};
use crate::llm::{ChatMessage, ChatModel, Embedder, OpenAiClient, ProviderError};
use crate::rag::{
    build_query_message, chunk_text, preprocess, rank_by_relatedness, Chunk, EmbeddingStore,
};
use crate::tokenizer::{Tokenizer, TokenizerError};

/// System role prefixed to every generation request.
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No document has been ingested yet")]
    NoDocument,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// One document's QA session: chunk store, providers, and limits.
pub struct DocumentSession {
    config: Config,
    tokenizer: Tokenizer,
    source: Box<dyn DocumentSource>,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    store: EmbeddingStore,
    doc_id: Option<String>,
}

impl DocumentSession {
    /// Build a session with injected collaborators.
    pub fn new(
        config: Config,
        source: Box<dyn DocumentSource>,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            config,
            tokenizer: Tokenizer::new(),
            source,
            embedder,
            chat,
            store: EmbeddingStore::new(),
            doc_id: None,
        }
    }

    /// Build a session talking to the configured OpenAI-compatible
    /// provider, with the given document source.
    pub fn with_provider(config: Config, source: Box<dyn DocumentSource>) -> Result<Self> {
        let client = Arc::new(OpenAiClient::new(
            &config.provider,
            config.models.embedding.clone(),
            config.models.chat.clone(),
        )?);
        let embedder: Arc<dyn Embedder> = client.clone();
        let chat: Arc<dyn ChatModel> = client;
        Ok(Self::new(config, source, embedder, chat))
    }

    /// Identifier of the ingested document, if any.
    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }

    /// Number of chunks currently stored.
    pub fn chunk_count(&self) -> usize {
        self.store.len()
    }

    /// Ingest one document: extract its pages, persist them to the data
    /// directory, then chunk and embed every page.
    ///
    /// All-or-nothing: any failure leaves the session with no stored
    /// chunks. A second ingest replaces the previous document.
    pub fn ingest(&mut self, path: &Path) -> Result<()> {
        self.store = EmbeddingStore::new();
        self.doc_id = None;

        let doc_id = document_id(path);
        log::info!("Ingesting document '{}' from {}", doc_id, path.display());

        let pages = self.source.extract_pages(path)?;
        let page_store = PageStore::new(self.config.data_dir.clone());
        page_store.write_pages(&doc_id, &pages)?;
        let pages = page_store.load_pages(&doc_id)?;

        let embedding_model = &self.config.models.embedding;
        let mut chunks: Vec<Chunk> = Vec::new();
        for page in &pages {
            let cleaned = preprocess(page);
            for text in chunk_text(
                &self.tokenizer,
                &cleaned,
                embedding_model,
                self.config.limits.chunk_size_tokens,
            )? {
                let embedding = self.embedder.embed(&text)?;
                chunks.push(Chunk { text, embedding });
            }
        }

        log::info!(
            "Ingested '{}': {} page(s), {} chunk(s)",
            doc_id,
            pages.len(),
            chunks.len()
        );

        self.store = EmbeddingStore::from_chunks(chunks);
        self.doc_id = Some(doc_id);
        Ok(())
    }

    /// Answer a question from the ingested document.
    ///
    /// Retrieves the top-N related chunks, assembles the prompt under
    /// the token budget, and sends a two-message exchange to the chat
    /// model at temperature 0. Returns the trimmed response text.
    pub fn ask(&self, query: &str) -> Result<String> {
        if self.store.is_empty() {
            return Err(SessionError::NoDocument);
        }

        let ranked = rank_by_relatedness(
            self.embedder.as_ref(),
            &self.store,
            query,
            self.config.limits.top_n,
        )?;
        log::debug!("Retrieved {} chunk(s) for query", ranked.len());

        let texts: Vec<String> = ranked.into_iter().map(|s| s.text).collect();
        let message = build_query_message(
            &self.tokenizer,
            query,
            &texts,
            &self.config.models.chat,
            self.config.limits.token_budget,
        )?;

        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(message)];
        let answer = self.chat.complete(&messages)?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm;

    struct NullEmbedder;

    impl Embedder for NullEmbedder {
        fn embed(&self, _text: &str) -> llm::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
    }

    struct NullChat;

    impl ChatModel for NullChat {
        fn complete(&self, _messages: &[ChatMessage]) -> llm::Result<String> {
            Ok("answer".to_string())
        }
    }

    struct EmptySource;

    impl DocumentSource for EmptySource {
        fn extract_pages(&self, _path: &Path) -> crate::extract::Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn session() -> DocumentSession {
        DocumentSession::new(
            Config::default(),
            Box::new(EmptySource),
            Arc::new(NullEmbedder),
            Arc::new(NullChat),
        )
    }

    #[test]
    fn test_ask_without_ingest_fails() {
        let err = session().ask("What are cats?").unwrap_err();
        assert!(matches!(err, SessionError::NoDocument));
    }

    #[test]
    fn test_new_session_has_no_document() {
        let s = session();
        assert!(s.doc_id().is_none());
        assert_eq!(s.chunk_count(), 0);
    }
}
