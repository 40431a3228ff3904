//! End-to-end session tests with fake providers: no network, real
//! tokenizer, real chunking and ranking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use docchat::config::Config;
use docchat::extract::TextFileSource;
use docchat::llm::{self, ChatMessage, ChatModel, Embedder};
use docchat::rag::FALLBACK_ANSWER;
use docchat::session::{DocumentSession, SessionError};

const DIM: usize = 26 * 26 + 1;

/// Deterministic bag-of-words embedder. Each word maps to a bucket
/// derived from its first two letters, so texts sharing words get higher
/// cosine similarity, and distinct test words land in distinct buckets.
struct BagOfWordsEmbedder;

impl Embedder for BagOfWordsEmbedder {
    fn embed(&self, text: &str) -> llm::Result<Vec<f32>> {
        let mut v = vec![0.0f32; DIM];
        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|w| !w.is_empty())
        {
            let mut letters = word.bytes().map(|b| (b - b'a') as usize);
            let first = letters.next().unwrap_or(0);
            let second = letters.next().unwrap_or(0);
            v[first * 26 + second] += 1.0;
        }
        // Guarantee a non-zero vector even for empty text
        v[DIM - 1] = 0.001;
        Ok(v)
    }
}

/// Chat model that records the prompt it was sent and answers from a
/// canned response.
struct RecordingChat {
    response: String,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl RecordingChat {
    fn new(response: &str) -> (Self, Arc<Mutex<Option<String>>>) {
        let last_prompt = Arc::new(Mutex::new(None));
        (
            Self {
                response: response.to_string(),
                last_prompt: Arc::clone(&last_prompt),
            },
            last_prompt,
        )
    }
}

impl ChatModel for RecordingChat {
    fn complete(&self, messages: &[ChatMessage]) -> llm::Result<String> {
        let user_message = messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        *self.last_prompt.lock().unwrap() = Some(user_message);
        Ok(self.response.clone())
    }
}

/// Embedder that fails after a fixed number of successful calls.
struct FlakyEmbedder {
    calls_before_failure: Mutex<usize>,
}

impl Embedder for FlakyEmbedder {
    fn embed(&self, text: &str) -> llm::Result<Vec<f32>> {
        let mut remaining = self.calls_before_failure.lock().unwrap();
        if *remaining == 0 {
            return Err(llm::ProviderError::Api {
                status: 503,
                message: "embedding backend unavailable".to_string(),
            });
        }
        *remaining -= 1;
        BagOfWordsEmbedder.embed(text)
    }
}

fn write_document(dir: &Path, name: &str, pages: &[&str]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pages.join("\u{000C}")).unwrap();
    path
}

fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.data_dir = dir.join("data");
    config
}

#[test]
fn test_two_page_document_answers_about_cats() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_document(
        dir.path(),
        "animals.txt",
        &["Cats are mammals.", "Dogs are mammals too."],
    );

    let (chat, last_prompt) = RecordingChat::new("  Cats are mammals.\n");
    let mut session = DocumentSession::new(
        test_config(dir.path()),
        Box::new(TextFileSource),
        Arc::new(BagOfWordsEmbedder),
        Arc::new(chat),
    );

    session.ingest(&doc).unwrap();
    assert_eq!(session.doc_id(), Some("animals"));
    assert_eq!(session.chunk_count(), 2);

    let answer = session.ask("What are cats?").unwrap();
    assert_eq!(answer, "Cats are mammals.");
    assert_ne!(answer, FALLBACK_ANSWER);

    // The cats chunk shares more words with the query, so it must be the
    // first excerpt in the assembled prompt.
    let prompt = last_prompt.lock().unwrap().clone().unwrap();
    let cats = prompt.find("cats are mammals.").unwrap();
    let dogs = prompt.find("dogs are mammals too.").unwrap();
    assert!(cats < dogs);
    assert!(prompt.ends_with("Question: What are cats?"));
}

#[test]
fn test_ingest_persists_page_files() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_document(dir.path(), "report.txt", &["page one", "page two"]);

    let (chat, _) = RecordingChat::new("ok");
    let mut session = DocumentSession::new(
        test_config(dir.path()),
        Box::new(TextFileSource),
        Arc::new(BagOfWordsEmbedder),
        Arc::new(chat),
    );
    session.ingest(&doc).unwrap();

    assert!(dir.path().join("data/report-0.txt").exists());
    assert!(dir.path().join("data/report-1.txt").exists());
}

#[test]
fn test_ask_before_ingest_is_a_defined_error() {
    let dir = tempfile::tempdir().unwrap();
    let (chat, _) = RecordingChat::new("never called");
    let session = DocumentSession::new(
        test_config(dir.path()),
        Box::new(TextFileSource),
        Arc::new(BagOfWordsEmbedder),
        Arc::new(chat),
    );

    let err = session.ask("Anything?").unwrap_err();
    assert!(matches!(err, SessionError::NoDocument));
}

#[test]
fn test_symbol_only_document_yields_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    // Preprocessing strips every character here, so chunking sees empty
    // input and must produce no chunks without erroring.
    let doc = write_document(dir.path(), "symbols.txt", &["((( ::: )))"]);

    let (chat, _) = RecordingChat::new("never called");
    let mut session = DocumentSession::new(
        test_config(dir.path()),
        Box::new(TextFileSource),
        Arc::new(BagOfWordsEmbedder),
        Arc::new(chat),
    );

    session.ingest(&doc).unwrap();
    assert_eq!(session.chunk_count(), 0);

    let err = session.ask("What is this?").unwrap_err();
    assert!(matches!(err, SessionError::NoDocument));
}

#[test]
fn test_embedding_failure_aborts_whole_ingestion() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_document(
        dir.path(),
        "animals.txt",
        &["Cats are mammals.", "Dogs are mammals too."],
    );

    let (chat, _) = RecordingChat::new("never called");
    let mut session = DocumentSession::new(
        test_config(dir.path()),
        Box::new(TextFileSource),
        Arc::new(FlakyEmbedder {
            calls_before_failure: Mutex::new(1),
        }),
        Arc::new(chat),
    );

    let err = session.ingest(&doc).unwrap_err();
    assert!(matches!(err, SessionError::Provider(_)));

    // No partial store is retained
    assert_eq!(session.chunk_count(), 0);
    assert!(session.doc_id().is_none());
    assert!(matches!(
        session.ask("q").unwrap_err(),
        SessionError::NoDocument
    ));
}

#[test]
fn test_reingest_replaces_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_document(dir.path(), "first.txt", &["Cats are mammals."]);
    let second = write_document(dir.path(), "second.txt", &["Planets orbit stars."]);

    let (chat, last_prompt) = RecordingChat::new("Planets orbit stars.");
    let mut session = DocumentSession::new(
        test_config(dir.path()),
        Box::new(TextFileSource),
        Arc::new(BagOfWordsEmbedder),
        Arc::new(chat),
    );

    session.ingest(&first).unwrap();
    session.ingest(&second).unwrap();
    assert_eq!(session.doc_id(), Some("second"));

    session.ask("What do planets do?").unwrap();
    let prompt = last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("planets orbit stars."));
    assert!(!prompt.contains("cats"));
}

#[test]
fn test_unsupported_document_type_fails_ingest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.pdf");
    std::fs::write(&path, "binary-ish").unwrap();

    let (chat, _) = RecordingChat::new("never called");
    let mut session = DocumentSession::new(
        test_config(dir.path()),
        Box::new(TextFileSource),
        Arc::new(BagOfWordsEmbedder),
        Arc::new(chat),
    );

    let err = session.ingest(&path).unwrap_err();
    assert!(matches!(err, SessionError::Extraction(_)));
}
