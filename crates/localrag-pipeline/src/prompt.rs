use localrag_core::types::SearchResult;

/// Answer returned when retrieval finds nothing; the answer provider is not consulted.
pub const NO_RESULTS_ANSWER: &str = "I couldn't find any relevant information to answer your question.";

/// What [`format_fallback_answer`] returns for an empty result list.
pub const NO_INFORMATION_FALLBACK: &str = "No relevant information found.";

const FALLBACK_NOTE: &str =
    "Note: This is a basic summary. For a more coherent answer, please ensure your OpenAI API key is configured.";

/// `Source i (source):\ncontent` blocks, 1-based, separated by blank lines.
pub fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("Source {} ({}):\n{}", i + 1, r.passage.source, r.passage.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_prompt(question: &str, results: &[SearchResult]) -> String {
    format!(
        "Based on the following information, provide a comprehensive and accurate answer to the question.\n\
         \n\
         Context Information:\n\
         {context}\n\
         \n\
         Question: {question}\n\
         \n\
         Instructions:\n\
         - Use only the information provided in the context\n\
         - If the context doesn't contain enough information to fully answer the question, say so\n\
         - Provide a clear, well-structured answer\n\
         - Cite the sources when possible\n\
         \n\
         Answer:",
        context = build_context(results),
        question = question,
    )
}

/// Templated answer used when generation fails. Lists every result with its
/// source, so it never fails as long as something was retrieved.
pub fn format_fallback_answer(question: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_INFORMATION_FALLBACK.to_string();
    }
    let mut out = format!("Based on the available information, here's what I found about '{}':\n\n", question);
    for (i, r) in results.iter().enumerate() {
        out.push_str(&format!("{}. From {}:\n{}\n\n", i + 1, r.passage.source, r.passage.content));
    }
    out.push_str(FALLBACK_NOTE);
    out
}
