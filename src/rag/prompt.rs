//! Prompt assembly under a token budget.

use crate::tokenizer::{Result, Tokenizer};

/// Instruction prefixed to every query message.
pub const INSTRUCTION: &str = "Use the following document excerpts to answer the question. \
If the answer is not found, respond with \"I could not find an answer.\"";

/// Fallback phrase the model is instructed to use when the excerpts are
/// insufficient.
pub const FALLBACK_ANSWER: &str = "I could not find an answer.";

/// Build the user message: instruction, then ranked excerpts appended
/// greedily under `token_budget`, then the question.
///
/// Before each excerpt is appended, the token count of
/// (message so far + candidate excerpt + question suffix) is recomputed
/// under `model`'s vocabulary; the first candidate that would exceed the
/// budget stops inclusion, and no later-ranked excerpt is considered.
/// The budget only gates excerpts; the instruction and question are
/// never truncated, so a budget smaller than instruction+question is
/// exceeded by exactly that preamble.
pub fn build_query_message(
    tokenizer: &Tokenizer,
    query: &str,
    ranked_texts: &[String],
    model: &str,
    token_budget: usize,
) -> Result<String> {
    let question = format!("\n\nQuestion: {query}");
    let mut message = INSTRUCTION.to_string();

    for text in ranked_texts {
        let next_chunk = format!("\n\nExcerpt:\n\"\"\"\n{text}\n\"\"\"");
        let candidate_tokens =
            tokenizer.count(&format!("{message}{next_chunk}{question}"), model)?;
        if candidate_tokens > token_budget {
            log::debug!(
                "Token budget {} reached; dropping remaining excerpts",
                token_budget
            );
            break;
        }
        message.push_str(&next_chunk);
    }

    message.push_str(&question);
    Ok(message)
}
