//! Grounded-prompt assembly.
//!
//! Pure template work: number each retrieved chunk from 1, label it
//! with its company and filing type, append the question and the
//! instruction block that constrains the generator to the supplied
//! context. No randomness, no external calls: the prompt is fully
//! determined by the retrieval result and the question.

use std::fmt::Write;

use crate::models::ScoredChunk;

/// Build the generation prompt from retrieved chunks, preserving their
/// retrieval order.
///
/// With an empty retrieval the context section is empty and the
/// instruction block still directs the generator to say the context is
/// insufficient; empty retrieval is an answerable state, not an error.
pub fn build_prompt(question: &str, chunks: &[ScoredChunk]) -> String {
    let mut context = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let _ = write!(
            context,
            "\n--- Context {} ---\nCompany: {}\nFiling: {}\nContent: {}\n",
            i + 1,
            chunk.meta.ticker,
            chunk.meta.filing_type,
            chunk.text
        );
    }

    format!(
        "You are a financial analyst assistant. Answer the question based on the provided SEC filing excerpts.\n\
        \n\
        CONTEXT FROM SEC FILINGS:\n\
        {context}\n\
        \n\
        QUESTION: {question}\n\
        \n\
        INSTRUCTIONS:\n\
        1. Answer the question using ONLY the information from the context above\n\
        2. Be specific and cite which company and filing type you're referencing\n\
        3. If the context doesn't contain enough information, say so\n\
        4. Use numbers and facts from the filings when available\n\
        5. Keep your answer concise but informative\n\
        \n\
        ANSWER:"
    )
}
