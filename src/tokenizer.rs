//! Tokenizer adapter over tiktoken BPE vocabularies.
//!
//! Chunk sizing and prompt token budgets are both expressed in
//! model-specific tokens, so every count goes through the vocabulary of
//! the model that will actually consume the text. Embedding and chat
//! models may use different vocabularies and must never be mixed within
//! one budget calculation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tiktoken_rs::{get_bpe_from_model, CoreBPE};

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("No known token vocabulary for model '{0}'")]
    UnsupportedModel(String),

    #[error("Failed to decode token sequence for model '{model}': {message}")]
    Decode { model: String, message: String },
}

pub type Result<T> = std::result::Result<T, TokenizerError>;

/// Counts, encodes and decodes tokens for named models.
///
/// BPE tables are expensive to construct, so they are cached per model
/// name after first use.
pub struct Tokenizer {
    cache: Mutex<HashMap<String, Arc<CoreBPE>>>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn bpe_for(&self, model: &str) -> Result<Arc<CoreBPE>> {
        let mut cache = self.cache.lock().expect("tokenizer cache poisoned");
        if let Some(bpe) = cache.get(model) {
            return Ok(Arc::clone(bpe));
        }

        let bpe = get_bpe_from_model(model)
            .map_err(|_| TokenizerError::UnsupportedModel(model.to_string()))?;
        let bpe = Arc::new(bpe.clone());
        cache.insert(model.to_string(), Arc::clone(&bpe));
        Ok(bpe)
    }

    /// Number of tokens `text` occupies under `model`'s vocabulary.
    pub fn count(&self, text: &str, model: &str) -> Result<usize> {
        Ok(self.encode(text, model)?.len())
    }

    /// Encode `text` to token ids under `model`'s vocabulary.
    pub fn encode(&self, text: &str, model: &str) -> Result<Vec<u32>> {
        let bpe = self.bpe_for(model)?;
        Ok(bpe.encode_ordinary(text))
    }

    /// Decode token ids back to text.
    ///
    /// Decoding a slice taken at an arbitrary token boundary can split a
    /// multi-byte character; that surfaces here as a `Decode` error.
    /// Callers slicing at arbitrary boundaries want [`Self::decode_lossy`].
    pub fn decode(&self, tokens: &[u32], model: &str) -> Result<String> {
        let bpe = self.bpe_for(model)?;
        bpe.decode(tokens)
            .map_err(|e| TokenizerError::Decode {
                model: model.to_string(),
                message: e.to_string(),
            })
    }

    /// Decode token ids back to text, substituting U+FFFD for byte
    /// sequences that do not form valid UTF-8.
    ///
    /// A token window cut at an arbitrary boundary can end (or begin)
    /// inside a multi-byte character; the partial character becomes a
    /// replacement character instead of an error. `Decode` is still
    /// returned for token ids unknown to the vocabulary.
    pub fn decode_lossy(&self, tokens: &[u32], model: &str) -> Result<String> {
        let bpe = self.bpe_for(model)?;
        let bytes = bpe
            .decode_bytes(tokens)
            .map_err(|e| TokenizerError::Decode {
                model: model.to_string(),
                message: e.to_string(),
            })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
