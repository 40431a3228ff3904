//! Text normalization and token-window chunking.
//!
//! Chunks are produced by encoding the cleaned document text once,
//! slicing the token-id sequence into contiguous fixed-size windows, and
//! decoding each window back to text independently. Decoding at an
//! arbitrary token boundary may not reproduce the original characters
//! exactly (a token can span partial words, and a window edge can cut a
//! multi-byte character, leaving a replacement character); chunks are
//! approximate text windows, not word-aligned ones, and the drift is
//! confined to window edges.

use std::sync::OnceLock;

use regex::Regex;

use crate::tokenizer::{Result, Tokenizer};

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn special_chars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s.,!?]").expect("valid regex"))
}

/// Clean and standardize raw document text.
///
/// Lower-cases, collapses whitespace runs to a single space, and strips
/// everything except word characters, spaces, and `. , ! ?`. Lossy and
/// one-way; applied once at ingestion, never to queries.
pub fn preprocess(text: &str) -> String {
    let text = text.to_lowercase();
    let text = whitespace_re().replace_all(&text, " ");
    let text = special_chars_re().replace_all(&text, "");
    text.trim().to_string()
}

/// Split cleaned text into chunks of at most `chunk_size` tokens under
/// `model`'s vocabulary. Empty input yields no chunks; the last chunk
/// may be shorter than the window size.
pub fn chunk_text(
    tokenizer: &Tokenizer,
    text: &str,
    model: &str,
    chunk_size: usize,
) -> Result<Vec<String>> {
    token_windows(tokenizer, text, model, chunk_size)?
        .iter()
        .map(|window| tokenizer.decode_lossy(window, model))
        .collect()
}

/// Partition `text`'s token sequence into contiguous windows of at most
/// `chunk_size` tokens. Concatenating the windows in order reconstructs
/// the full token sequence exactly. A zero window size is treated as 1.
pub fn token_windows(
    tokenizer: &Tokenizer,
    text: &str,
    model: &str,
    chunk_size: usize,
) -> Result<Vec<Vec<u32>>> {
    let tokens = tokenizer.encode(text, model)?;
    let chunk_size = chunk_size.max(1);
    Ok(tokens.chunks(chunk_size).map(|w| w.to_vec()).collect())
}
